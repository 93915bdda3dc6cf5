//! IRC formatting control codes.

use crate::types::ColorCode;

/// Toggles bold text.
pub const BOLD: &str = "\x02";

/// Starts a colour sequence: `\x03FG`, `\x03FG,BG` or `\x03,BG`.
pub const COLOR: &str = "\x03";

/// Toggles underlined text.
pub const UNDERLINE: &str = "\x1F";

/// The sequence switching to the given colours.
///
/// `None` leaves a channel as it is; when both are `None` nothing is
/// emitted. A sequence naming a single channel is followed by a double
/// bold toggle, so digits in the text that follows cannot be read as part
/// of the code. [`normalize`](crate::interpreter::normalize) drops the
/// padding again where it is not needed.
pub fn color_sequence(fg: Option<ColorCode>, bg: Option<ColorCode>) -> Option<String> {
    match (fg, bg) {
        (Some(fg), Some(bg)) => Some(format!("{COLOR}{fg},{bg}")),
        (Some(fg), None) => Some(format!("{COLOR}{fg}{BOLD}{BOLD}")),
        (None, Some(bg)) => Some(format!("{COLOR},{bg}{BOLD}{BOLD}")),
        (None, None) => None,
    }
}
