//! Markup trees for styling templates.
//!
//! Templates are a small XML dialect (`<b>`, `<u>`, `<color>`, `<var>`,
//! `<for>`, `<plural>`/`<case>`). This module provides the tree the
//! interpreter walks, a parser producing that tree from template text, and
//! the validation seam used to reject trees that do not follow the schema.

pub mod ast;
mod error;
mod parser;
mod validate;

pub use ast::{Element, Node};
pub use error::MarkupError;
pub use parser::{MAX_DEPTH, parse_markup};
pub use validate::{Diagnostic, MarkupValidator, SchemaValidator, is_valid_variable_name};
