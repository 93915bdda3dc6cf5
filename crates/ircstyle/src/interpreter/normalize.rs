//! Cleanup of redundant colour sequences.
//!
//! Rendering emits colour codes eagerly and pads single-channel codes with
//! a double bold toggle. This pass removes what a client would never need:
//!
//! 1. `\x03,` not followed by `0` or `1` is dropped.
//! 2. A colour sequence immediately overridden by another colour code is
//!    dropped, together with its padding.
//! 3. The padding after `\x03,` or `\x03NN,` is dropped when no digit
//!    follows it.
//! 4. The padding after `\x03NN` is dropped when no comma follows it.
//!
//! Rules are tried in this order at every colour code, scanning left to
//! right. Text produced by a rewrite is not scanned again within the same
//! pass.

const COLOR: u8 = 0x03;
const PADDING: &[u8] = b"\x02\x02";

/// A rewrite found at some offset: `len` bytes are replaced by their first
/// `keep` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rewrite {
    len: usize,
    keep: usize,
}

fn two_digits(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at..at + 2)
        .is_some_and(|digits| digits.iter().all(u8::is_ascii_digit))
}

/// Lengths an optional two-digit group at `at` may take, greedy first.
fn digit_options(bytes: &[u8], at: usize) -> &'static [usize] {
    if two_digits(bytes, at) { &[2, 0] } else { &[0] }
}

/// Lengths optional padding at `at` may take, greedy first.
fn padding_options(bytes: &[u8], at: usize) -> &'static [usize] {
    if bytes.get(at..at + 2) == Some(PADDING) {
        &[2, 0]
    } else {
        &[0]
    }
}

/// Rule 1: `\x03,` with neither `0` nor `1` after it.
fn empty_background(bytes: &[u8], start: usize) -> Option<Rewrite> {
    (bytes.get(start + 1) == Some(&b',') && !matches!(bytes.get(start + 2), Some(b'0' | b'1')))
        .then_some(Rewrite { len: 2, keep: 0 })
}

/// Rule 2: `\x03(NN)?,(NN)?(padding)?` directly followed by `\x03`.
fn overridden(bytes: &[u8], start: usize) -> Option<Rewrite> {
    digit_options(bytes, start + 1).iter().find_map(|&lead| {
        let comma = start + 1 + lead;
        if bytes.get(comma) != Some(&b',') {
            return None;
        }
        digit_options(bytes, comma + 1).iter().find_map(|&trail| {
            let padding = comma + 1 + trail;
            padding_options(bytes, padding).iter().find_map(|&pad| {
                let end = padding + pad;
                (bytes.get(end) == Some(&COLOR)).then_some(Rewrite {
                    len: end - start,
                    keep: 0,
                })
            })
        })
    })
}

/// Rule 3: `\x03(NN)?,` then padding, with no digit after it.
fn padded_comma(bytes: &[u8], start: usize) -> Option<Rewrite> {
    digit_options(bytes, start + 1).iter().find_map(|&lead| {
        let comma = start + 1 + lead;
        let end = comma + 1 + PADDING.len();
        (bytes.get(comma) == Some(&b',')
            && bytes.get(comma + 1..end) == Some(PADDING)
            && !bytes.get(end).is_some_and(u8::is_ascii_digit))
        .then_some(Rewrite {
            len: end - start,
            keep: comma + 1 - start,
        })
    })
}

/// Rule 4: `\x03NN` then padding, with no comma after it.
fn padded_foreground(bytes: &[u8], start: usize) -> Option<Rewrite> {
    (two_digits(bytes, start + 1)
        && bytes.get(start + 3..start + 5) == Some(PADDING)
        && bytes.get(start + 5) != Some(&b','))
    .then_some(Rewrite { len: 5, keep: 3 })
}

fn rewrite_at(bytes: &[u8], start: usize) -> Option<Rewrite> {
    empty_background(bytes, start)
        .or_else(|| overridden(bytes, start))
        .or_else(|| padded_comma(bytes, start))
        .or_else(|| padded_foreground(bytes, start))
}

/// One left-to-right pass over the text, or `None` if nothing matched.
fn normalize_pass(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut at = 0;
    while let Some(offset) = bytes[at..].iter().position(|&b| b == COLOR) {
        let start = at + offset;
        match rewrite_at(bytes, start) {
            Some(rewrite) => {
                out.push_str(&text[copied..start + rewrite.keep]);
                copied = start + rewrite.len;
                at = copied;
            }
            None => at = start + 1,
        }
    }
    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

/// Remove redundant colour sequences from rendered text.
///
/// Passes are repeated until nothing changes, so normalizing an already
/// normalized string returns it unchanged.
///
/// # Example
///
/// ```
/// use ircstyle::interpreter::normalize;
///
/// assert_eq!(normalize("\x0303\x02\x02Clicky"), "\x0303Clicky");
/// assert_eq!(normalize("\x0304,01\x0303,01x"), "\x0303,01x");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    while let Some(next) = normalize_pass(&current) {
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_bare_comma_before_non_binary_digit() {
        assert_eq!(normalize("a\x03,x"), "ax");
        assert_eq!(normalize("a\x03,2"), "a2");
        assert_eq!(normalize("a\x03,01b"), "a\x03,01b");
    }

    #[test]
    fn drops_overridden_sequences() {
        assert_eq!(normalize("\x0303,04\x0305"), "\x0305");
        assert_eq!(normalize("\x03,04\x02\x02\x03,05\x02\x02x"), "\x03,05\x02\x02x");
    }

    #[test]
    fn keeps_padding_before_digits() {
        assert_eq!(normalize("\x03,04\x02\x027"), "\x03,04\x02\x027");
        assert_eq!(normalize("\x0304\x02\x02,"), "\x0304\x02\x02,");
    }

    #[test]
    fn keeps_comma_group_when_padding_is_redundant() {
        assert_eq!(normalize("\x0303,\x02\x02x"), "\x0303,x");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(normalize("hello \x02world\x02"), "hello \x02world\x02");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn is_idempotent_on_chained_rewrites() {
        let once = normalize("\x03,\x03,x");
        assert_eq!(normalize(&once), once);
    }
}
