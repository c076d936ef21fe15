//! Token coercion: turns a scalar token into a typed value.

use std::borrow::Cow;

use crate::error::ErrorKind;
use crate::escape::decode_escapes;
use crate::lexer::TokenKind;

/// A scalar produced from one token.
///
/// Strings borrow from the source unless escapes had to be decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(Cow<'a, [u8]>),
}

/// Coerce the raw text of a token into a scalar.
///
/// Quoted strings are always strings. Unquoted text starting with a sign,
/// dot or digit is tried as a hex integer, decimal integer and float, in
/// that order; the first reading that covers the whole text wins. Atoms
/// are then matched against keywords, and anything left is a string.
pub fn coerce(text: &[u8], kind: TokenKind) -> Result<Scalar<'_>, ErrorKind> {
    match kind {
        TokenKind::String => return Ok(Scalar::String(Cow::Borrowed(text))),
        TokenKind::EscapedString => return Ok(Scalar::String(Cow::Owned(decode_escapes(text)?))),
        _ => {}
    }

    if let Some(number) = coerce_number(text) {
        return Ok(number);
    }

    if kind == TokenKind::Atom {
        if let Some(keyword) = keyword(text) {
            return Ok(keyword);
        }
    }

    Ok(Scalar::String(Cow::Borrowed(text)))
}

fn coerce_number(text: &[u8]) -> Option<Scalar<'_>> {
    let first = *text.first()?;
    if !matches!(first, b'+' | b'-' | b'.' | b'0'..=b'9') {
        return None;
    }

    if text.len() == 1 {
        return Some(if first.is_ascii_digit() {
            Scalar::Integer(i64::from(first - b'0'))
        } else {
            Scalar::String(Cow::Borrowed(text))
        });
    }

    if let Some(v) = parse_hex(text) {
        return Some(Scalar::Integer(v));
    }
    if let Some(v) = parse_decimal(text) {
        return Some(Scalar::Integer(v as i64));
    }
    parse_float(text).map(Scalar::Float)
}

/// `0x`/`0X` followed by at least one hex digit. Wraps on overflow.
fn parse_hex(text: &[u8]) -> Option<i64> {
    let digits = text
        .strip_prefix(b"0x")
        .or_else(|| text.strip_prefix(b"0X"))?;
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0i64, |acc, &c| {
        let d = (c as char).to_digit(16)?;
        Some(acc.wrapping_mul(16).wrapping_add(i64::from(d)))
    })
}

/// Unsigned decimal with an optional sign.
///
/// Overflow saturates to `u64::MAX`; a `-` sign negates with wrap-around.
/// The caller reinterprets the result as signed.
fn parse_decimal(text: &[u8]) -> Option<u64> {
    let (negative, digits) = match text.first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let magnitude = digits
        .iter()
        .try_fold(0u64, |acc, &c| {
            acc.checked_mul(10)?.checked_add(u64::from(c - b'0'))
        });
    Some(match magnitude {
        None => u64::MAX,
        Some(v) if negative => v.wrapping_neg(),
        Some(v) => v,
    })
}

fn parse_float(text: &[u8]) -> Option<f64> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

fn keyword(text: &[u8]) -> Option<Scalar<'static>> {
    match text {
        b"true" | b"yes" | b"on" => Some(Scalar::Bool(true)),
        b"false" | b"no" | b"off" => Some(Scalar::Bool(false)),
        b"nil" => Some(Scalar::Nil),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(text: &str) -> Scalar<'_> {
        coerce(text.as_bytes(), TokenKind::Atom).unwrap()
    }

    fn string(text: &str) -> Scalar<'static> {
        Scalar::String(Cow::Owned(text.as_bytes().to_vec()))
    }

    #[test]
    fn single_characters() {
        assert_eq!(atom("0"), Scalar::Integer(0));
        assert_eq!(atom("7"), Scalar::Integer(7));
        assert_eq!(atom("-"), string("-"));
        assert_eq!(atom("+"), string("+"));
        assert_eq!(atom("."), string("."));
    }

    #[test]
    fn decimal_integers() {
        assert_eq!(atom("42"), Scalar::Integer(42));
        assert_eq!(atom("-42"), Scalar::Integer(-42));
        assert_eq!(atom("+42"), Scalar::Integer(42));
        assert_eq!(atom("007"), Scalar::Integer(7));
    }

    #[test]
    fn large_integers_wrap() {
        assert_eq!(atom("9223372036854775807"), Scalar::Integer(i64::MAX));
        assert_eq!(atom("9223372036854775808"), Scalar::Integer(i64::MIN));
        assert_eq!(atom("18446744073709551615"), Scalar::Integer(-1));
        // Saturates before reinterpretation.
        assert_eq!(atom("99999999999999999999"), Scalar::Integer(-1));
        assert_eq!(atom("-9223372036854775808"), Scalar::Integer(i64::MIN));
    }

    #[test]
    fn hex_integers() {
        assert_eq!(atom("0x1F"), Scalar::Integer(31));
        assert_eq!(atom("0Xff"), Scalar::Integer(255));
        assert_eq!(atom("0xffffffffffffffff"), Scalar::Integer(-1));
        assert_eq!(atom("0x"), string("0x"));
        assert_eq!(atom("0xfg"), string("0xfg"));
    }

    #[test]
    fn floats() {
        assert_eq!(atom("1.5"), Scalar::Float(1.5));
        assert_eq!(atom("-0.25"), Scalar::Float(-0.25));
        assert_eq!(atom(".5"), Scalar::Float(0.5));
        assert_eq!(atom("1e3"), Scalar::Float(1000.0));
        assert_eq!(atom("-inf"), Scalar::Float(f64::NEG_INFINITY));
        assert!(matches!(atom("+nan"), Scalar::Float(f) if f.is_nan()));
    }

    #[test]
    fn partial_numbers_are_strings() {
        assert_eq!(atom("1.2.3"), string("1.2.3"));
        assert_eq!(atom("12abc"), string("12abc"));
        assert_eq!(atom("-x"), string("-x"));
    }

    #[test]
    fn keywords() {
        assert_eq!(atom("true"), Scalar::Bool(true));
        assert_eq!(atom("yes"), Scalar::Bool(true));
        assert_eq!(atom("on"), Scalar::Bool(true));
        assert_eq!(atom("false"), Scalar::Bool(false));
        assert_eq!(atom("no"), Scalar::Bool(false));
        assert_eq!(atom("off"), Scalar::Bool(false));
        assert_eq!(atom("nil"), Scalar::Nil);
        assert_eq!(atom("True"), string("True"));
        assert_eq!(atom("nile"), string("nile"));
    }

    #[test]
    fn quoted_text_is_never_coerced() {
        assert_eq!(coerce(b"42", TokenKind::String).unwrap(), string("42"));
        assert_eq!(coerce(b"true", TokenKind::String).unwrap(), string("true"));
        assert_eq!(
            coerce(br"say \'hi\'", TokenKind::EscapedString).unwrap(),
            string("say 'hi'")
        );
    }

    #[test]
    fn bad_escape_propagates() {
        assert_eq!(coerce(br"\q", TokenKind::EscapedString), Err(ErrorKind::InvalidEscape));
    }
}
