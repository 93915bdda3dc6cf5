//! Error types for template rendering.

use thiserror::Error;

use crate::markup::{Diagnostic, MarkupError};

/// Broad category of a [`StyleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An unrecognized character in a formula.
    Lexical,
    /// A token sequence that violates the formula grammar.
    Syntax,
    /// Arithmetic over incompatible operands, or counting a non-array.
    Type,
    /// A bad or missing markup attribute, unknown colour, missing plural
    /// case, or unsupported variable.
    InvalidArgument,
}

/// An error that aborted a render call.
///
/// Rendering never returns partial output: any of these errors discards
/// everything emitted so far.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Formula contains a character no token starts with.
    #[error("unexpected character '{character}' at offset {position} in formula")]
    Lexical { character: char, position: usize },

    /// Formula token does not fit the grammar at this point.
    #[error("syntax error at offset {position} in formula: unexpected {found}")]
    Syntax { found: String, position: usize },

    /// Formula nests parentheses deeper than the parser allows.
    #[error("formula nests parentheses deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Operands of incompatible kinds.
    #[error("type error: {message}")]
    Type { message: String },

    /// Formula references a name that is not in scope.
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    /// Variable name with characters outside `[A-Za-z0-9_.]`.
    #[error(
        "invalid variable name '{name}': names may only contain alphanumeric characters, \
         underscores and dots"
    )]
    InvalidVariableName { name: String },

    /// Required markup attribute is absent.
    #[error("<{element}> requires a '{attribute}' attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// `<color>` with neither `fg` nor `bg`.
    #[error("<color> requires an 'fg' attribute, a 'bg' attribute, or both")]
    MissingColor,

    /// Symbolic colour name absent from the colour table.
    #[error("unknown color '{name}'{}", format_suggestions(suggestions))]
    UnknownColor {
        name: String,
        suggestions: Vec<String>,
    },

    /// Numeric colour code that does not fit in two digits.
    #[error("color code '{code}' is out of range (0-99)")]
    InvalidColorCode { code: String },

    /// Plural form chosen for the count has no matching `<case>`.
    #[error("no <case> for plural form '{form}', available: {}", available.join(", "))]
    MissingPluralCase {
        form: String,
        available: Vec<String>,
    },

    /// The locale formatting service could not render a value.
    #[error("cannot format {kind} value: {message}")]
    ValueFormat { kind: &'static str, message: String },

    /// Locale tag the formatting service cannot use.
    #[error("invalid locale '{locale}': {message}")]
    InvalidLocale { locale: String, message: String },

    /// Template failed validation; diagnostics are the validator's own.
    #[error("template failed validation: {}", join_diagnostics(diagnostics))]
    InvalidMarkup { diagnostics: Vec<Diagnostic> },

    /// Template is not well-formed markup.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

impl StyleError {
    /// The broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StyleError::Lexical { .. } => ErrorKind::Lexical,
            StyleError::Syntax { .. } | StyleError::NestingTooDeep { .. } => ErrorKind::Syntax,
            StyleError::Type { .. } => ErrorKind::Type,
            StyleError::UndefinedVariable { .. }
            | StyleError::InvalidVariableName { .. }
            | StyleError::MissingAttribute { .. }
            | StyleError::MissingColor
            | StyleError::UnknownColor { .. }
            | StyleError::InvalidColorCode { .. }
            | StyleError::MissingPluralCase { .. }
            | StyleError::ValueFormat { .. }
            | StyleError::InvalidLocale { .. }
            | StyleError::InvalidMarkup { .. }
            | StyleError::Markup(_) => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        StyleError::Type {
            message: message.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Find the known names closest to `name`, best match first.
///
/// Uses Levenshtein distance with a cutoff of 1 for short names and 2 for
/// names longer than three characters. At most three suggestions are
/// returned.
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.chars().count() > 3 { 2 } else { 1 };
    let mut scored: Vec<(usize, &str)> = available
        .into_iter()
        .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
        .filter(|&(distance, _)| distance <= max_distance)
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
