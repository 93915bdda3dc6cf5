//! Spelled-out durations.

const UNITS: &[(u64, &str, &str)] = &[
    (604_800, "week", "weeks"),
    (86_400, "day", "days"),
    (3_600, "hour", "hours"),
    (60, "minute", "minutes"),
    (1, "second", "seconds"),
];

/// Spell out a number of seconds in English.
///
/// Zero components are skipped; the final two parts are joined with "and".
///
/// ```
/// use ircstyle::service::format_duration;
///
/// assert_eq!(format_duration(0), "0 seconds");
/// assert_eq!(format_duration(3661), "1 hour, 1 minute and 1 second");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut parts = Vec::new();
    for &(size, singular, plural) in UNITS {
        let amount = remaining.div_euclid(size);
        remaining = remaining.rem_euclid(size);
        match amount {
            0 => {}
            1 => parts.push(format!("1 {singular}")),
            n => parts.push(format!("{n} {plural}")),
        }
    }
    match parts.split_last() {
        None => "0 seconds".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}
