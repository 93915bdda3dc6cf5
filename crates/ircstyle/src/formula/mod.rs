//! Formulas embedded in `<var name="...">` and `<plural var="...">`.
//!
//! A formula is a tiny arithmetic language over named variables:
//!
//! ```text
//! Expr    := Term (('+' | '-') Term)*
//! Term    := '#' Primary | Primary
//! Primary := Number | Variable | '(' Expr ')'
//! ```
//!
//! `#` counts the entries of an array. Adding two arrays concatenates
//! them, so `#(a+b)` equals `#a+#b`. Variable names are opaque keys into
//! the scope; dots are part of the name, not a path.

mod lexer;
mod parser;
mod resolver;
mod scope;

pub use lexer::{Lexer, Number, Token, TokenKind};
pub use parser::Parser;
pub use resolver::{ScalarWrappers, count, resolve, wrap_scalar};
pub(crate) use resolver::wrap_variable;
pub use scope::Scope;

use crate::interpreter::StyleError;
use crate::types::Value;

/// Evaluate a formula against a scope.
///
/// # Example
///
/// ```
/// use ircstyle::formula::{Scope, evaluate};
/// use ircstyle::{Array, Value};
///
/// let mut scope = Scope::new();
/// scope.bind("foo", Array::from_values(1..=10));
/// scope.bind("bar", Array::from_values(1..=4));
///
/// assert_eq!(evaluate("41+1", &scope).unwrap(), Value::Integer(42));
/// assert_eq!(evaluate("#(foo+bar)", &scope).unwrap(), Value::Integer(14));
/// ```
pub fn evaluate(formula: &str, scope: &Scope<'_>) -> Result<Value, StyleError> {
    Parser::new(formula, scope).parse()
}
