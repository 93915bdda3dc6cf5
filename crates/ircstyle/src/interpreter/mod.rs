//! Rendering of parsed templates into IRC-formatted text.

mod codes;
mod context;
mod error;
mod normalize;
mod styler;

pub use codes::{BOLD, COLOR, UNDERLINE, color_sequence};
pub use context::{ScopedContext, StyleContext};
pub use error::{ErrorKind, StyleError, compute_suggestions};
pub use normalize::normalize;
pub use styler::Styler;
