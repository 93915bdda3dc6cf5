//! Markup parse errors.

use thiserror::Error;

/// A template that is not well-formed markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// A syntax error with location information.
    #[error("markup error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The template ended inside an element or entity.
    #[error("unexpected end of template at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// Elements nested deeper than the parser allows.
    #[error("elements nested deeper than {limit} levels at {line}:{column}")]
    NestingTooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}
