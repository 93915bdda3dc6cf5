//! Date and time rendering in CLDR-like English patterns.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::interpreter::StyleError;
use crate::types::{DateTimeValue, FormatStyle};

type Pattern = &'static [BorrowedFormatItem<'static>];

fn date_pattern(style: FormatStyle) -> Option<Pattern> {
    match style {
        FormatStyle::Full => Some(format_description!(
            "[weekday], [month repr:long] [day padding:none], [year]"
        )),
        FormatStyle::Long => Some(format_description!(
            "[month repr:long] [day padding:none], [year]"
        )),
        FormatStyle::Medium => Some(format_description!(
            "[month repr:short] [day padding:none], [year]"
        )),
        FormatStyle::Short => Some(format_description!(
            "[month padding:none]/[day padding:none]/[year repr:last_two]"
        )),
        FormatStyle::None => None,
    }
}

fn time_pattern(style: FormatStyle) -> Option<Pattern> {
    match style {
        FormatStyle::Full | FormatStyle::Long | FormatStyle::Medium => Some(format_description!(
            "[hour repr:12 padding:none]:[minute]:[second] [period]"
        )),
        FormatStyle::Short => Some(format_description!(
            "[hour repr:12 padding:none]:[minute] [period]"
        )),
        FormatStyle::None => None,
    }
}

fn format_error(message: impl ToString) -> StyleError {
    StyleError::ValueFormat {
        kind: "datetime",
        message: message.to_string(),
    }
}

fn apply(pattern: Pattern, moment: OffsetDateTime) -> Result<String, StyleError> {
    moment.format(pattern).map_err(format_error)
}

/// Zone designator: `GMT+01:00` for full time style, `GMT+1` otherwise.
fn zone_name(offset: UtcOffset, style: FormatStyle) -> String {
    let (hours, minutes, _) = offset.as_hms();
    let sign = if offset.is_negative() { '-' } else { '+' };
    let (hours, minutes) = (hours.unsigned_abs(), minutes.unsigned_abs());
    match style {
        FormatStyle::Full => format!("GMT{sign}{hours:02}:{minutes:02}"),
        _ if offset.is_utc() => "GMT".to_string(),
        _ if minutes == 0 => format!("GMT{sign}{hours}"),
        _ => format!("GMT{sign}{hours}:{minutes:02}"),
    }
}

/// Render a moment using its date and time styles.
///
/// ```
/// use ircstyle::service::format_datetime;
/// use ircstyle::types::{DateTimeValue, FormatStyle};
/// use time::UtcOffset;
///
/// let value = DateTimeValue::builder()
///     .timestamp(502_031_400)
///     .date_style(FormatStyle::Full)
///     .time_style(FormatStyle::Long)
///     .offset(UtcOffset::from_hms(1, 0, 0).unwrap())
///     .build();
/// assert_eq!(
///     format_datetime(&value).unwrap(),
///     "Thursday, November 28, 1985 at 2:10:00 PM GMT+1"
/// );
/// ```
pub fn format_datetime(value: &DateTimeValue) -> Result<String, StyleError> {
    let moment = OffsetDateTime::from_unix_timestamp(value.timestamp)
        .map_err(format_error)?
        .to_offset(value.offset);

    let date = date_pattern(value.date_style)
        .map(|pattern| apply(pattern, moment))
        .transpose()?;
    let time = time_pattern(value.time_style)
        .map(|pattern| apply(pattern, moment))
        .transpose()?
        .map(|time| match value.time_style {
            FormatStyle::Full | FormatStyle::Long => {
                format!("{time} {}", zone_name(value.offset, value.time_style))
            }
            _ => time,
        });

    Ok(match (date, time) {
        (Some(date), Some(time)) => {
            let glue = match value.date_style {
                FormatStyle::Full | FormatStyle::Long => " at ",
                _ => ", ",
            };
            format!("{date}{glue}{time}")
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(timestamp: i64, date_style: FormatStyle, time_style: FormatStyle) -> DateTimeValue {
        DateTimeValue::builder()
            .timestamp(timestamp)
            .date_style(date_style)
            .time_style(time_style)
            .build()
    }

    #[test]
    fn medium_styles_use_comma_glue() {
        let value = at(0, FormatStyle::Medium, FormatStyle::Medium);
        assert_eq!(format_datetime(&value).unwrap(), "Jan 1, 1970, 12:00:00 AM");
    }

    #[test]
    fn short_styles() {
        let value = at(502_031_400, FormatStyle::Short, FormatStyle::Short);
        assert_eq!(format_datetime(&value).unwrap(), "11/28/85, 1:10 PM");
    }

    #[test]
    fn single_component() {
        let date_only = at(0, FormatStyle::Long, FormatStyle::None);
        assert_eq!(format_datetime(&date_only).unwrap(), "January 1, 1970");
        let time_only = at(0, FormatStyle::None, FormatStyle::Full);
        assert_eq!(format_datetime(&time_only).unwrap(), "12:00:00 AM GMT+00:00");
        let nothing = at(0, FormatStyle::None, FormatStyle::None);
        assert_eq!(format_datetime(&nothing).unwrap(), "");
    }

    #[test]
    fn zone_names() {
        let half = UtcOffset::from_hms(5, 30, 0).unwrap();
        assert_eq!(zone_name(half, FormatStyle::Long), "GMT+5:30");
        let west = UtcOffset::from_hms(-8, 0, 0).unwrap();
        assert_eq!(zone_name(west, FormatStyle::Long), "GMT-8");
        assert_eq!(zone_name(west, FormatStyle::Full), "GMT-08:00");
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        let value = at(i64::MAX, FormatStyle::Medium, FormatStyle::None);
        assert!(format_datetime(&value).is_err());
    }
}
