//! Error types for datalist parsing.

use thiserror::Error;

/// Result type for datalist parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }
}

/// The reason a parse failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Quoted string reaches end of input without its closing quote.
    #[error("Unterminated string")]
    UnterminatedString,

    /// Raw CR or LF inside a quoted string.
    #[error("Newline in quoted string")]
    NewlineInString,

    /// Unsupported escape character or malformed `\x` digits.
    #[error("Invalid escape sequence")]
    InvalidEscape,

    /// End of input while a bracket is still open.
    #[error("Not closed")]
    NotClosed,

    /// Closing bracket that does not match the open one.
    #[error("Invalid closed bracket")]
    InvalidClosedBracket,

    /// Keyed content where the next token cannot start an entry.
    #[error("Need key")]
    NeedKey,

    /// Key without a value after it.
    #[error("No value")]
    NoValue,

    /// Root entry using a different separator than the first one.
    #[error("Invalid separator")]
    InvalidSeparator,

    /// `:` or `=` where a value is expected.
    #[error("Invalid symbol")]
    InvalidSymbol,

    /// `##`/`**` run where a value is expected.
    #[error("Invalid layer symbol")]
    InvalidLayer,

    /// Bracket nesting beyond the configured limit.
    #[error("Too deep nesting of brackets")]
    TooDeep,
}

/// Error type for datalist parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}{} : {kind}", location_suffix(.filename))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Byte offset of the offending token.
    pub offset: usize,
    /// One-based line of the offending token.
    pub line: usize,
    /// Source name, when the caller supplied one.
    pub filename: Option<String>,
}

fn location_suffix(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!(" of <{}>", name),
        None => String::new(),
    }
}

impl ParseError {
    /// Create an error at a byte offset. The line is filled in by
    /// [`ParseError::with_location`].
    pub fn at(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            line: 0,
            filename: None,
        }
    }

    /// Resolve the line number against `source` and attach the filename.
    pub fn with_location(self, ctx: &ParseContext, source: &[u8]) -> Self {
        let end = self.offset.min(source.len());
        let line = 1 + source[..end].iter().filter(|&&b| b == b'\n').count();
        Self {
            line,
            filename: ctx.filename.clone(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_before_offset() {
        let source = b"a\nb\n\nc";
        let err =
            ParseError::at(ErrorKind::NoValue, 5).with_location(&ParseContext::default(), source);
        assert_eq!(err.line, 4);
        assert_eq!(err.to_string(), "Line 4 : No value");
    }

    #[test]
    fn includes_filename() {
        let ctx = ParseContext::new(Some("conf.dl"));
        let err = ParseError::at(ErrorKind::NotClosed, 0).with_location(&ctx, b"(");
        assert_eq!(err.to_string(), "Line 1 of <conf.dl> : Not closed");
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let ctx = ParseContext::default();
        let err = ParseError::at(ErrorKind::NotClosed, 99).with_location(&ctx, b"(\n");
        assert_eq!(err.line, 2);
    }
}
