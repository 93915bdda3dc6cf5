//! Recursive-descent formula evaluator.
//!
//! The parser pulls tokens from the lexer one at a time and reduces each
//! production to a [`Value`] as soon as it is recognized; no syntax tree
//! is kept.

use std::mem;

use crate::formula::Scope;
use crate::formula::lexer::{Lexer, Number, Token, TokenKind};
use crate::formula::resolver::{count, resolve};
use crate::interpreter::StyleError;
use crate::types::{Scalar, Value};

/// Maximum parenthesis nesting depth.
const MAX_NESTING: usize = 64;

/// Formula evaluator over a single formula string.
///
/// [`Parser::parse`] consumes the parser, so the result can only be taken
/// once the whole formula has been read.
pub struct Parser<'a, 's> {
    lexer: Lexer<'a>,
    lookahead: Token<'a>,
    scope: &'s Scope<'s>,
    depth: usize,
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
}

impl<'a, 's> Parser<'a, 's> {
    pub fn new(formula: &'a str, scope: &'s Scope<'s>) -> Self {
        let mut lexer = Lexer::new(formula);
        let lookahead = lexer.next_token();
        Self {
            lexer,
            lookahead,
            scope,
            depth: 0,
        }
    }

    /// Evaluate the whole formula.
    ///
    /// # Errors
    ///
    /// - [`StyleError::Lexical`] for characters outside the formula alphabet
    /// - [`StyleError::Syntax`] for tokens out of place, including trailing
    ///   input after a complete expression
    /// - [`StyleError::Type`] for arithmetic on incompatible operands
    /// - [`StyleError::UndefinedVariable`] for names not in scope
    pub fn parse(mut self) -> Result<Value, StyleError> {
        let value = self.expr()?;
        if self.lookahead.kind == TokenKind::EndOfInput {
            Ok(value)
        } else {
            Err(unexpected(&self.lookahead))
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let next = self.lexer.next_token();
        mem::replace(&mut self.lookahead, next)
    }

    /// `Expr := Term (('+' | '-') Term)*`
    fn expr(&mut self) -> Result<Value, StyleError> {
        let mut acc = self.term()?;
        loop {
            let op = match self.lookahead.kind {
                TokenKind::OpAdd => Op::Add,
                TokenKind::OpSub => Op::Sub,
                _ => return Ok(acc),
            };
            self.advance();
            let rhs = self.term()?;
            acc = combine(op, acc, rhs)?;
        }
    }

    /// `Term := '#' Primary | Primary`
    fn term(&mut self) -> Result<Value, StyleError> {
        if self.lookahead.kind == TokenKind::OpCount {
            self.advance();
            count(self.primary()?)
        } else {
            self.primary()
        }
    }

    /// `Primary := Number | Variable | '(' Expr ')'`
    fn primary(&mut self) -> Result<Value, StyleError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(Number::Integer(n)) => Ok(Value::Integer(n)),
            TokenKind::Number(Number::Real(n)) => Ok(Value::Real(n)),
            TokenKind::Variable(name) => resolve(name, self.scope),
            TokenKind::ParenOpen => {
                if self.depth >= MAX_NESTING {
                    return Err(StyleError::NestingTooDeep { limit: MAX_NESTING });
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                if self.lookahead.kind == TokenKind::ParenClose {
                    self.advance();
                    Ok(value)
                } else {
                    Err(unexpected(&self.lookahead))
                }
            }
            _ => Err(unexpected(&token)),
        }
    }
}

/// Error for a token that does not fit the grammar where it appears.
fn unexpected(token: &Token<'_>) -> StyleError {
    match token.kind {
        TokenKind::Error(character) => StyleError::Lexical {
            character,
            position: token.position,
        },
        ref kind => StyleError::Syntax {
            found: kind.to_string(),
            position: token.position,
        },
    }
}

/// Apply `+` or `-` to two operands.
///
/// Numbers combine arithmetically, promoting to real when either side is
/// real. Arrays only support `+`, which concatenates them.
fn combine(op: Op, lhs: Value, rhs: Value) -> Result<Value, StyleError> {
    match (op, lhs, rhs) {
        (Op::Add, Value::Array(a), Value::Array(b)) => Ok(Value::Array(a.merge(b))),
        (Op::Sub, Value::Array(_), Value::Array(_)) => {
            Err(StyleError::type_error("arrays cannot be subtracted"))
        }
        (_, Value::Array(_), _) | (_, _, Value::Array(_)) => Err(StyleError::type_error(
            "cannot combine an array with a number",
        )),
        (op, lhs, rhs) => match (numeric(&lhs)?, numeric(&rhs)?) {
            (Number::Integer(a), Number::Integer(b)) => {
                let result = match op {
                    Op::Add => a.checked_add(b),
                    Op::Sub => a.checked_sub(b),
                };
                result
                    .map(Value::Integer)
                    .ok_or_else(|| StyleError::type_error("integer overflow"))
            }
            (a, b) => {
                let (a, b) = (as_real(a), as_real(b));
                Ok(Value::Real(match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                }))
            }
        },
    }
}

/// Coerce a non-array operand to a number.
///
/// Typed variables contribute their raw value; strings must hold a number.
fn numeric(value: &Value) -> Result<Number, StyleError> {
    let scalar = match value {
        Value::Integer(n) => return Ok(Number::Integer(*n)),
        Value::Real(f) => return Ok(Number::Real(*f)),
        Value::String(s) => Scalar::String(s.clone()),
        Value::Typed(t) => t.raw_value(),
        Value::Array(_) => {
            return Err(StyleError::type_error("cannot combine an array with a number"));
        }
    };
    match scalar {
        Scalar::Integer(n) => Ok(Number::Integer(n)),
        Scalar::Float(f) => Ok(Number::Real(f)),
        Scalar::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Number::Integer)
                .or_else(|_| trimmed.parse::<f64>().map(Number::Real))
                .map_err(|_| StyleError::type_error(format!("'{s}' is not a number")))
        }
    }
}

fn as_real(n: Number) -> f64 {
    match n {
        Number::Integer(i) => i as f64,
        Number::Real(f) => f,
    }
}
