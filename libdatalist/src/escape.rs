//! Backslash escapes inside quoted strings.
//!
//! Supported escapes:
//! - `\n \r \t \a \b \v \' \"`
//! - `\NNN`: one to three decimal digits; a third digit is only taken while
//!   the value stays within a byte
//! - `\xH?`: a hex digit followed by one more character, which is always
//!   consumed and only contributes when it is a non-zero hex digit
//!   (so `\x40` decodes to byte 4)

use crate::error::ErrorKind;

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn digit_at(raw: &[u8], i: usize) -> Option<u32> {
    raw.get(i)
        .filter(|c| c.is_ascii_digit())
        .map(|c| u32::from(c - b'0'))
}

/// Decode the content of a quoted string. Input without backslashes comes
/// back unchanged.
pub fn decode_escapes(raw: &[u8]) -> Result<Vec<u8>, ErrorKind> {
    // Escapes never expand, so the raw length bounds the output.
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let c = raw[i];
        if c != b'\\' {
            out.push(c);
            i += 1;
            continue;
        }
        i += 1;
        let escaped = *raw.get(i).ok_or(ErrorKind::InvalidEscape)?;
        let byte = match escaped {
            b'0'..=b'9' => {
                let mut dec = u32::from(escaped - b'0');
                if let Some(d) = digit_at(raw, i + 1) {
                    dec = dec * 10 + d;
                    i += 1;
                }
                if let Some(d) = digit_at(raw, i + 1) {
                    let wide = dec * 10 + d;
                    if wide <= 255 {
                        dec = wide;
                        i += 1;
                    }
                }
                dec as u8
            }
            b'x' | b'X' => {
                if i + 2 >= raw.len() {
                    return Err(ErrorKind::InvalidEscape);
                }
                let mut hex = hex_value(raw[i + 1]).ok_or(ErrorKind::InvalidEscape)?;
                match hex_value(raw[i + 2]) {
                    Some(low) if low > 0 => hex = hex * 16 + low,
                    _ => {}
                }
                i += 2;
                hex
            }
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'a' => 0x07,
            b'b' => 0x08,
            b'v' => 0x0b,
            b'\'' => b'\'',
            b'"' => b'"',
            _ => return Err(ErrorKind::InvalidEscape),
        };
        out.push(byte);
        i += 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Vec<u8> {
        decode_escapes(raw.as_bytes()).unwrap()
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(decode("hello, world"), b"hello, world");
        assert_eq!(decode(""), b"");
    }

    #[test]
    fn single_character_escapes() {
        assert_eq!(decode(r#"\n\r\t\a\b\v\'\""#), b"\n\r\t\x07\x08\x0b'\"");
    }

    #[test]
    fn decimal_escapes() {
        assert_eq!(decode(r"\0"), b"\0");
        assert_eq!(decode(r"a\65b"), b"aAb");
        assert_eq!(decode(r"\255"), b"\xff");
        // A third digit that would overflow a byte is left as text.
        assert_eq!(decode(r"\256"), b"\x196");
        assert_eq!(decode(r"\1234"), b"\x7b4");
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(decode(r"\x41"), b"A");
        assert_eq!(decode(r"\Xff"), b"\xff");
        // Second character is swallowed even when it is not a hex digit.
        assert_eq!(decode(r"\x4g!"), b"\x04!");
    }

    #[test]
    fn hex_escape_drops_zero_second_digit() {
        // Compatibility behaviour: a trailing `0` digit does not contribute.
        assert_eq!(decode(r"\x40"), b"\x04");
        assert_eq!(decode(r"\xa0z"), b"\x0az");
    }

    #[test]
    fn hex_escape_needs_two_characters() {
        assert_eq!(decode_escapes(br"\x4"), Err(ErrorKind::InvalidEscape));
        assert_eq!(decode_escapes(br"\x"), Err(ErrorKind::InvalidEscape));
        assert_eq!(decode_escapes(br"\xg1"), Err(ErrorKind::InvalidEscape));
    }

    #[test]
    fn unknown_escapes_fail() {
        assert_eq!(decode_escapes(br"\q"), Err(ErrorKind::InvalidEscape));
        assert_eq!(decode_escapes(br"\\"), Err(ErrorKind::InvalidEscape));
        assert_eq!(decode_escapes(br"abc\"), Err(ErrorKind::InvalidEscape));
    }

    #[test]
    fn embedded_nul() {
        assert_eq!(decode(r"a\0b"), b"a\0b");
    }
}
