//! Pull-based formula tokenizer.
//!
//! Each call to [`Lexer::next_token`] scans one token from the cursor.
//! At every position the rules are tried in order:
//! 1. Single-character operators `( ) + - #`
//! 2. Real numbers: `\d*\.\d+` or `\d+\.\d*`
//! 3. Integers: `\d+`
//! 4. Spaces and tabs, which are skipped
//! 5. Variable names: `[A-Za-z0-9_.]+`
//!
//! Any other character yields an [`TokenKind::Error`] token.

use std::fmt::{Display, Formatter, Result as FmtResult};

use winnow::ascii::{digit0, digit1};
use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_while};

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// The kind and payload of a formula token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    Number(Number),
    /// Raw variable name text.
    Variable(&'a str),
    ParenOpen,
    ParenClose,
    OpAdd,
    OpSub,
    OpCount,
    EndOfInput,
    /// A character no rule accepts.
    Error(char),
}

impl Display for TokenKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TokenKind::Number(Number::Integer(n)) => write!(f, "number {n}"),
            TokenKind::Number(Number::Real(n)) => write!(f, "number {n}"),
            TokenKind::Variable(name) => write!(f, "variable '{name}'"),
            TokenKind::ParenOpen => f.write_str("'('"),
            TokenKind::ParenClose => f.write_str("')'"),
            TokenKind::OpAdd => f.write_str("'+'"),
            TokenKind::OpSub => f.write_str("'-'"),
            TokenKind::OpCount => f.write_str("'#'"),
            TokenKind::EndOfInput => f.write_str("end of formula"),
            TokenKind::Error(c) => write!(f, "character '{c}'"),
        }
    }
}

/// A token with its byte offset in the formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub position: usize,
}

/// Cursor over a formula, producing one token per call.
///
/// After the end of input, every call returns [`TokenKind::EndOfInput`].
/// As an iterator, the lexer yields the end-of-input token once and then
/// stops.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    remaining: &'a str,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            remaining: source,
            finished: false,
        }
    }

    /// Scan the next token and advance past it.
    pub fn next_token(&mut self) -> Token<'a> {
        let _ = blank(&mut self.remaining);
        let position = self.source.len() - self.remaining.len();
        let checkpoint = self.remaining;
        let kind = if self.remaining.is_empty() {
            TokenKind::EndOfInput
        } else if let Ok(kind) = token(&mut self.remaining) {
            kind
        } else {
            self.remaining = checkpoint;
            match any::<_, ErrMode<ContextError>>(&mut self.remaining) {
                Ok(c) => TokenKind::Error(c),
                Err(_) => TokenKind::EndOfInput,
            }
        };
        if kind == TokenKind::EndOfInput {
            self.finished = true;
        }
        Token { kind, position }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

/// Parse one token at the cursor.
fn token<'i>(input: &mut &'i str) -> ModalResult<TokenKind<'i>> {
    alt((operator, real, integer, variable)).parse_next(input)
}

/// Parse a single-character operator.
fn operator<'i>(input: &mut &'i str) -> ModalResult<TokenKind<'i>> {
    alt((
        '('.value(TokenKind::ParenOpen),
        ')'.value(TokenKind::ParenClose),
        '+'.value(TokenKind::OpAdd),
        '-'.value(TokenKind::OpSub),
        '#'.value(TokenKind::OpCount),
    ))
    .parse_next(input)
}

/// Parse a real number: `1.23`, `1.` or `.23`.
fn real<'i>(input: &mut &'i str) -> ModalResult<TokenKind<'i>> {
    alt(((digit0, '.', digit1), (digit1, '.', digit0)))
        .take()
        .try_map(str::parse::<f64>)
        .map(|n| TokenKind::Number(Number::Real(n)))
        .parse_next(input)
}

/// Parse an integer; literals too large for `i64` become reals.
fn integer<'i>(input: &mut &'i str) -> ModalResult<TokenKind<'i>> {
    digit1
        .map(|digits: &str| {
            let number = digits.parse::<i64>().map_or_else(
                |_| Number::Real(digits.parse::<f64>().unwrap_or(f64::INFINITY)),
                Number::Integer,
            );
            TokenKind::Number(number)
        })
        .parse_next(input)
}

/// Parse a variable name.
fn variable<'i>(input: &mut &'i str) -> ModalResult<TokenKind<'i>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        .map(TokenKind::Variable)
        .parse_next(input)
}

/// Skip spaces and tabs.
fn blank(input: &mut &str) -> ModalResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(formula: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(formula).map(|token| token.kind).collect()
    }

    #[test]
    fn reals_win_over_integers() {
        assert_eq!(
            kinds("1.5 .25 3."),
            vec![
                TokenKind::Number(Number::Real(1.5)),
                TokenKind::Number(Number::Real(0.25)),
                TokenKind::Number(Number::Real(3.0)),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn variables_may_contain_dots_and_digits() {
        assert_eq!(
            kinds("#user.names+x2"),
            vec![
                TokenKind::OpCount,
                TokenKind::Variable("user.names"),
                TokenKind::OpAdd,
                TokenKind::Variable("x2"),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn digits_then_letters_split_into_two_tokens() {
        assert_eq!(
            kinds("12ab"),
            vec![
                TokenKind::Number(Number::Integer(12)),
                TokenKind::Variable("ab"),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn unknown_characters_become_error_tokens() {
        let tokens: Vec<Token<'_>> = Lexer::new("a * b").collect();
        assert_eq!(tokens[1].kind, TokenKind::Error('*'));
        assert_eq!(tokens[1].position, 2);
    }

    #[test]
    fn oversized_integers_become_reals() {
        assert_eq!(
            kinds("99999999999999999999")[0],
            TokenKind::Number(Number::Real(1e20))
        );
    }

    #[test]
    fn end_of_input_repeats_when_pulled() {
        let mut lexer = Lexer::new(" ");
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next(), None);
    }
}
