use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use serde::{Deserialize, Serialize};
use time::UtcOffset;

/// A raw scalar extracted from a typed variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A value that knows what it is, so the locale formatting service can
/// render it appropriately (grouped digits, currency symbols, spelled-out
/// durations, ...).
///
/// # Example
///
/// ```
/// use ircstyle::{Currency, Scalar, TypedVariable};
///
/// let price = TypedVariable::Currency(Currency::new(12.5, "EUR"));
/// assert_eq!(price.raw_value(), Scalar::Float(12.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypedVariable {
    /// An integer, rendered as plain digits.
    Integer(i64),

    /// A floating-point number, rendered with locale digit grouping.
    Float(f64),

    /// A string, rendered verbatim.
    String(String),

    /// A monetary amount.
    Currency(Currency),

    /// A point in time.
    DateTime(DateTimeValue),

    /// A duration in seconds, rendered in words.
    Duration(u64),
}

impl TypedVariable {
    /// The raw scalar behind this variable.
    ///
    /// Currencies yield their amount, date/times their Unix timestamp and
    /// durations their number of seconds.
    pub fn raw_value(&self) -> Scalar {
        match self {
            TypedVariable::Integer(n) => Scalar::Integer(*n),
            TypedVariable::Float(f) => Scalar::Float(*f),
            TypedVariable::String(s) => Scalar::String(s.clone()),
            TypedVariable::Currency(c) => Scalar::Float(c.amount),
            TypedVariable::DateTime(d) => Scalar::Integer(d.timestamp),
            TypedVariable::Duration(secs) => {
                Scalar::Integer(i64::try_from(*secs).unwrap_or(i64::MAX))
            }
        }
    }

    /// A short name for the kind of variable, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedVariable::Integer(_) => "integer",
            TypedVariable::Float(_) => "float",
            TypedVariable::String(_) => "string",
            TypedVariable::Currency(_) => "currency",
            TypedVariable::DateTime(_) => "date/time",
            TypedVariable::Duration(_) => "duration",
        }
    }
}

/// A monetary amount with an optional ISO 4217 currency code.
///
/// Without a code, the locale formatting service picks the currency of
/// the rendering locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Currency {
    pub amount: f64,
    pub code: Option<String>,
}

impl Currency {
    pub fn new(amount: f64, code: impl Into<String>) -> Self {
        Self {
            amount,
            code: Some(code.into()),
        }
    }

    /// An amount in the rendering locale's own currency.
    pub fn local(amount: f64) -> Self {
        Self { amount, code: None }
    }
}

/// Length of a rendered date or time, following CLDR's four widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// `Thursday, November 28, 1985` / `2:10:00 PM GMT+01:00`
    Full,
    /// `November 28, 1985` / `2:10:00 PM GMT+1`
    Long,
    /// `Nov 28, 1985` / `2:10:00 PM`
    #[default]
    Medium,
    /// `11/28/85` / `2:10 PM`
    Short,
    /// Omit this part entirely.
    None,
}

/// A Unix timestamp with the styles and UTC offset used to display it.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct DateTimeValue {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,

    #[builder(default)]
    pub date_style: FormatStyle,

    #[builder(default)]
    pub time_style: FormatStyle,

    /// Offset the timestamp is displayed in.
    #[builder(default = UtcOffset::UTC)]
    pub offset: UtcOffset,
}
