//! Template markup parser using winnow.
//!
//! Parses the body of a template into a tree rooted at an implicit `msg`
//! element. Handles:
//! - Elements with single- or double-quoted attributes
//! - Self-closing elements (`<var name="x"/>`)
//! - Entity references: `&amp; &lt; &gt; &quot; &apos;`, `&#NN;`, `&#xHH;`

use winnow::combinator::{alt, cut_err, fail, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use super::ast::{Element, Node};
use super::error::MarkupError;

/// Name of the implicit root element wrapping every template.
pub const ROOT_ELEMENT: &str = "msg";

/// Maximum element nesting depth below the root.
pub const MAX_DEPTH: usize = 64;

const NESTING_LABEL: &str = "element nesting";

/// Parse template text into a tree rooted at a `msg` element.
///
/// # Example
///
/// ```
/// use ircstyle::markup::{Node, parse_markup};
///
/// let root = parse_markup("Hi <b>there</b> &amp; bye").unwrap();
/// assert_eq!(root.name, "msg");
/// assert_eq!(root.children.len(), 3);
/// assert_eq!(root.children[2], Node::Text(" & bye".into()));
/// ```
pub fn parse_markup(input: &str) -> Result<Element, MarkupError> {
    let mut remaining = input;
    match content(&mut remaining, 0) {
        Ok(children) if remaining.is_empty() => Ok(Element {
            name: ROOT_ELEMENT.to_string(),
            attributes: Vec::new(),
            children,
        }),
        Ok(_) => {
            let (line, column) = calculate_position(input, remaining);
            let message = if remaining.starts_with("</") {
                "closing tag without a matching opening tag".to_string()
            } else {
                format!(
                    "unexpected character: '{}'",
                    remaining.chars().next().unwrap_or('?')
                )
            };
            Err(MarkupError::Syntax {
                line,
                column,
                message,
            })
        }
        Err(e) => {
            let (line, column) = calculate_position(input, remaining);
            if is_nesting_error(&e) {
                return Err(MarkupError::NestingTooDeep {
                    line,
                    column,
                    limit: MAX_DEPTH,
                });
            }
            if remaining.is_empty() {
                return Err(MarkupError::UnexpectedEof { line, column });
            }
            let message = match e {
                ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.to_string(),
                ErrMode::Incomplete(_) => String::new(),
            };
            Err(MarkupError::Syntax {
                line,
                column,
                message: if message.is_empty() {
                    "malformed markup".to_string()
                } else {
                    message.replace('\n', "; ")
                },
            })
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, column)
}

fn is_nesting_error(error: &ErrMode<ContextError>) -> bool {
    match error {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx
            .context()
            .any(|c| matches!(c, StrContext::Label(label) if *label == NESTING_LABEL)),
        ErrMode::Incomplete(_) => false,
    }
}

/// Parse a run of nodes up to the next closing tag or end of input.
///
/// `depth` is the nesting depth of the enclosing element, 0 for the root.
fn content(input: &mut &str, depth: usize) -> ModalResult<Vec<Node>> {
    repeat(
        0..,
        alt((
            (|i: &mut &str| element(i, depth + 1)).map(Node::Element),
            text.map(Node::Text),
        )),
    )
    .parse_next(input)
}

/// Parse literal text, decoding entity references.
fn text(input: &mut &str) -> ModalResult<String> {
    let parts: Vec<String> = repeat(
        1..,
        alt((take_till(1.., ['<', '&']).map(str::to_string), entity)),
    )
    .parse_next(input)?;
    Ok(parts.concat())
}

/// Parse an entity reference: `&name;`
fn entity(input: &mut &str) -> ModalResult<String> {
    preceded(
        '&',
        cut_err(terminated(take_till(1.., [';', '&', '<', '\'', '"']), ';').verify_map(decode_entity)),
    )
    .context(StrContext::Label("entity reference"))
    .parse_next(input)
}

/// Decode the name between `&` and `;`.
fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// Parse an element: `<name attrs/>` or `<name attrs>content</name>`
fn element(input: &mut &str, depth: usize) -> ModalResult<Element> {
    let start = *input;
    let name = preceded('<', tag_name).parse_next(input)?;
    if depth > MAX_DEPTH {
        *input = start;
        cut_err(fail::<_, (), _>)
            .context(StrContext::Label(NESTING_LABEL))
            .parse_next(input)?;
    }
    let attributes = attributes(input)?;
    ws(input)?;
    let self_closing = cut_err(alt(("/>".value(true), '>'.value(false))))
        .context(StrContext::Label("tag"))
        .context(StrContext::Expected(StrContextValue::StringLiteral("/>")))
        .context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;

    let children = if self_closing {
        Vec::new()
    } else {
        let children = content(input, depth)?;
        cut_err(("</", name, ws, '>'))
            .context(StrContext::Label("closing tag"))
            .context(StrContext::Expected(StrContextValue::StringLiteral("</")))
            .parse_next(input)?;
        children
    };

    Ok(Element {
        name: name.to_string(),
        attributes,
        children,
    })
}

/// Parse the attributes of an opening tag, rejecting duplicates.
fn attributes(input: &mut &str) -> ModalResult<Vec<(String, String)>> {
    let attributes: Vec<(String, String)> =
        repeat(0.., preceded(ws1, attribute)).parse_next(input)?;
    let duplicated = attributes
        .iter()
        .enumerate()
        .any(|(i, (name, _))| attributes[..i].iter().any(|(prev, _)| prev == name));
    if duplicated {
        cut_err(fail::<_, (), _>)
            .context(StrContext::Label("attribute list: duplicate attribute name"))
            .parse_next(input)?;
    }
    Ok(attributes)
}

/// Parse a single attribute: `name="value"` or `name='value'`
fn attribute(input: &mut &str) -> ModalResult<(String, String)> {
    let name = tag_name(input)?;
    (ws, '=', ws).void().parse_next(input)?;
    let value = cut_err(quoted_value)
        .context(StrContext::Label("attribute value"))
        .parse_next(input)?;
    Ok((name.to_string(), value))
}

/// Parse a quoted attribute value, decoding entity references.
fn quoted_value(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let parts: Vec<String> = repeat(
        0..,
        alt((
            take_till(1.., move |c: char| c == quote || c == '&' || c == '<')
                .map(str::to_string),
            entity,
        )),
    )
    .parse_next(input)?;
    one_of(quote).parse_next(input)?;
    Ok(parts.concat())
}

/// Parse an element or attribute name.
fn tag_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., [' ', '\t', '\r', '\n'])
        .void()
        .parse_next(input)
}

/// Parse mandatory whitespace.
fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., [' ', '\t', '\r', '\n'])
        .void()
        .parse_next(input)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entity("amp").as_deref(), Some("&"));
        assert_eq!(decode_entity("#65").as_deref(), Some("A"));
        assert_eq!(decode_entity("#x263A").as_deref(), Some("\u{263A}"));
        assert_eq!(decode_entity("nbsp"), None);
        assert_eq!(decode_entity("#xZZ"), None);
    }

    #[test]
    fn nesting_limit_counts_elements_below_the_root() {
        let nested = |depth: usize| format!("{}x{}", "<b>".repeat(depth), "</b>".repeat(depth));
        assert!(parse_markup(&nested(MAX_DEPTH)).is_ok());
        assert!(matches!(
            parse_markup(&nested(MAX_DEPTH + 1)),
            Err(MarkupError::NestingTooDeep { line: 1, column, limit: MAX_DEPTH })
                if column == 3 * MAX_DEPTH + 1
        ));
    }

    #[test]
    fn position_counts_characters_not_bytes() {
        let input = "é\nab<";
        let remaining = &input[input.len() - 1..];
        assert_eq!(calculate_position(input, remaining), (2, 3));
    }
}
