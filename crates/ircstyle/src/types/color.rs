use std::fmt::{Display, Formatter, Result as FmtResult};

/// Symbolic colour names and their palette index.
///
/// Several names alias the same index (`navy` and `blue` are both `02`).
const COLOR_NAMES: &[(&str, u8)] = &[
    ("white", 0),
    ("black", 1),
    ("blue", 2),
    ("navy", 2),
    ("green", 3),
    ("red", 4),
    ("brown", 5),
    ("maroon", 5),
    ("purple", 6),
    ("orange", 7),
    ("olive", 7),
    ("yellow", 8),
    ("light_green", 9),
    ("lime", 9),
    ("teal", 10),
    ("light_cyan", 11),
    ("cyan", 11),
    ("aqua", 11),
    ("light_blue", 12),
    ("royal", 12),
    ("pink", 13),
    ("light_purple", 13),
    ("fuchsia", 13),
    ("grey", 14),
    ("gray", 14),
    ("light_grey", 15),
    ("light_gray", 15),
    ("silver", 15),
];

/// A colour code as carried on the wire: two zero-padded decimal digits.
///
/// # Example
///
/// ```
/// use ircstyle::ColorCode;
///
/// assert_eq!(ColorCode::from_name("green").unwrap().to_string(), "03");
/// assert_eq!(ColorCode::from_name("Light-Blue").unwrap().to_string(), "12");
/// assert_eq!(ColorCode::new(7).unwrap().to_string(), "07");
/// assert!(ColorCode::new(100).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorCode(u8);

impl ColorCode {
    /// Largest code that still fits in two digits.
    pub const MAX: u8 = 99;

    /// Create a code from its numeric value, if it fits in two digits.
    pub fn new(code: u8) -> Option<Self> {
        (code <= Self::MAX).then_some(Self(code))
    }

    /// Look a symbolic name up in the colour table.
    ///
    /// Matching ignores case and treats spaces and hyphens as underscores,
    /// so `"Light Blue"`, `"light-blue"` and `"LIGHT_BLUE"` are equivalent.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize_name(name);
        COLOR_NAMES
            .iter()
            .find(|(known, _)| *known == normalized)
            .map(|&(_, code)| Self(code))
    }

    /// All symbolic names in the colour table.
    pub fn names() -> impl Iterator<Item = &'static str> {
        COLOR_NAMES.iter().map(|&(name, _)| name)
    }

    /// The numeric value of this code.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Display for ColorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:02}", self.0)
    }
}

/// Lowercase a colour name and map spaces and hyphens to underscores.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
