//! Datalist parser implementation.
//!
//! Datalist is a compact, human-writable data format: nested lists, maps and
//! ordered pair lists of nil, booleans, integers, floats and strings, with
//! `--` line comments and an implicit bracket-less top level.
//!
//! ```text
//! name = "demo"
//! ports = (80 443)
//! routes = [ get: "/" post: "/submit" get: "/health" ]
//! limits = { depth = 256, strict = yes }
//! ```
//!
//! # Parsing Pipeline
//!
//! 1. **Lexer**: Splits the source bytes into bracket, symbol, layer, string
//!    and atom tokens, skipping whitespace, commas and comments.
//!
//! 2. **Coercion**: Turns scalar tokens into nil, booleans, integers, floats
//!    or strings, decoding backslash escapes in quoted strings.
//!
//! 3. **Structural Parser**: Recursively matches brackets and decides between
//!    positional and keyed content, handing containers to a [`ValueSink`].

mod coerce;
mod error;
mod escape;
mod lexer;
mod options;
mod parser;
mod sink;
mod value;

pub use coerce::{coerce, Scalar};
pub use error::{ErrorKind, ParseContext, ParseError, Result};
pub use escape::decode_escapes;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use options::{ParseOptions, MAX_DEPTH};
pub use sink::{TreeSink, ValueSink};
pub use value::Value;

/// Parse a datalist document from a string.
///
/// # Example
///
/// ```
/// use libdatalist::{parse, Value};
///
/// let value = parse("a=1 b=2").unwrap();
/// assert_eq!(value.get("b"), Some(&Value::Integer(2)));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a datalist document from raw bytes.
pub fn parse_bytes(input: &[u8]) -> Result<Value> {
    parse_with_options(input, &ParseOptions::default(), None)
}

/// Parse a datalist document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    parse_with_options(input.as_bytes(), &ParseOptions::default(), filename)
}

/// Parse a datalist document with explicit options.
pub fn parse_with_options(
    input: &[u8],
    options: &ParseOptions,
    filename: Option<&str>,
) -> Result<Value> {
    parse_into(input, options, filename, &mut TreeSink)
}

/// Parse a datalist document, building containers through `sink`.
///
/// Either the whole document parses and the root value is returned, or the
/// first error is; nothing built so far escapes on failure.
pub fn parse_into<S: ValueSink>(
    input: &[u8],
    options: &ParseOptions,
    filename: Option<&str>,
    sink: &mut S,
) -> Result<S::Value> {
    tracing::debug!(len = input.len(), max_depth = options.max_depth, "parsing");
    let ctx = ParseContext::new(filename);
    parser::Parser::new(input, sink, options.max_depth)
        .parse_document()
        .map_err(|err| {
            let err = err.with_location(&ctx, input);
            tracing::debug!(%err, "parse failed");
            err
        })
}
