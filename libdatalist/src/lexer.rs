//! Lexer
//!
//! Splits a byte buffer into classified tokens. Tokens are spans into the
//! source; nothing is copied. Whitespace, commas and `--` line comments are
//! skipped between tokens.

use crate::error::{ErrorKind, ParseError, Result};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `( ) [ ] { }`.
    Bracket,
    /// `:` or `=`.
    Symbol,
    /// Run of two or more `#` or `*`.
    Layer,
    /// Quoted text without backslashes.
    String,
    /// Quoted text containing at least one backslash.
    EscapedString,
    /// Anything else up to the next separator.
    Atom,
    /// End of input.
    Eof,
}

/// A token: kind plus byte span into the source.
///
/// For quoted strings the span covers the content only, not the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Raw bytes of this token.
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start..self.end]
    }

    /// First byte of the token, if any.
    pub fn first_byte(&self, source: &[u8]) -> Option<u8> {
        source.get(self.start).copied().filter(|_| self.start < self.end)
    }

    /// Level of a layer token: run length minus one, negated for `*` runs.
    pub fn layer_depth(&self, source: &[u8]) -> Option<i64> {
        if self.kind != TokenKind::Layer {
            return None;
        }
        let level = (self.end - self.start - 1) as i64;
        match self.first_byte(source) {
            Some(b'*') => Some(-level),
            _ => Some(level),
        }
    }
}

/// Bytes that end an atom.
fn is_separator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t'
            | b'\r'
            | b'\n'
            | b','
            | b'#'
            | b'*'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b'('
            | b')'
            | b':'
            | b'='
            | b'"'
            | b'\''
    )
}

/// Cursor over a source buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// The buffer being lexed.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Advance past the next token and return it.
    ///
    /// Returns an [`TokenKind::Eof`] token (empty span at the end of the
    /// buffer) once input is exhausted, and keeps returning it.
    pub fn next_token(&mut self) -> Result<Token> {
        while let Some(&c) = self.source.get(self.position) {
            // Comment detection peeks one byte; `get` makes the lookahead
            // at the last byte safe without a sentinel.
            if c == b'-' && self.source.get(self.position + 1) == Some(&b'-') {
                self.skip_line_comment();
                continue;
            }
            match c {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => self.position += 1,
                b'{' | b'}' | b'[' | b']' | b'(' | b')' => {
                    return Ok(self.single(TokenKind::Bracket));
                }
                b':' | b'=' => return Ok(self.single(TokenKind::Symbol)),
                b'#' | b'*' => return Ok(self.layer(c)),
                b'"' | b'\'' => return self.string(c),
                _ => return Ok(self.atom()),
            }
        }
        self.position = self.source.len();
        Ok(Token::new(TokenKind::Eof, self.position, self.position))
    }

    fn skip_line_comment(&mut self) {
        self.position = self.source[self.position..]
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .map_or(self.source.len(), |n| self.position + n);
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.position;
        self.position += 1;
        Token::new(kind, start, self.position)
    }

    fn layer(&mut self, c: u8) -> Token {
        let start = self.position;
        let run = self.source[start..].iter().take_while(|&&b| b == c).count();
        self.position = start + run;
        // A lone `#` or `*` is not a layer symbol.
        let kind = if run == 1 {
            TokenKind::Atom
        } else {
            TokenKind::Layer
        };
        Token::new(kind, start, self.position)
    }

    fn atom(&mut self) -> Token {
        let start = self.position;
        let len = self.source[start..]
            .iter()
            .position(|&b| is_separator(b))
            .unwrap_or(self.source.len() - start);
        self.position = start + len;
        Token::new(TokenKind::Atom, start, self.position)
    }

    fn string(&mut self, quote: u8) -> Result<Token> {
        let open = self.position;
        let start = open + 1;
        let mut kind = TokenKind::String;
        let mut i = start;
        while let Some(&c) = self.source.get(i) {
            match c {
                _ if c == quote => {
                    self.position = i + 1;
                    return Ok(Token::new(kind, start, i));
                }
                b'\r' | b'\n' => return Err(ParseError::at(ErrorKind::NewlineInString, open)),
                b'\\' => {
                    kind = TokenKind::EscapedString;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        Err(ParseError::at(ErrorKind::UnterminatedString, open))
    }
}

/// Lex a whole buffer, returning every token before end of input.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.kind == TokenKind::Eof {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source.as_bytes())
            .unwrap()
            .iter()
            .map(|t| {
                let text = String::from_utf8(t.text(source.as_bytes()).to_vec()).unwrap();
                (t.kind, text)
            })
            .collect()
    }

    #[test]
    fn classifies_brackets_symbols_atoms() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_text("{a=1, b:[x]}"),
            vec![
                (Bracket, "{".into()),
                (Atom, "a".into()),
                (Symbol, "=".into()),
                (Atom, "1".into()),
                (Atom, "b".into()),
                (Symbol, ":".into()),
                (Bracket, "[".into()),
                (Atom, "x".into()),
                (Bracket, "]".into()),
                (Bracket, "}".into()),
            ]
        );
    }

    #[test]
    fn skips_comments() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_text("a -- rest of line\nb--not a comment\n--"),
            vec![
                (Atom, "a".into()),
                (Atom, "b--not".into()),
                (Atom, "a".into()),
                (Atom, "comment".into()),
            ]
        );
    }

    #[test]
    fn single_dash_at_end_is_an_atom() {
        assert_eq!(kinds_and_text("-"), vec![(TokenKind::Atom, "-".into())]);
    }

    #[test]
    fn layer_runs() {
        let source = b"## *** # *";
        let tokens = tokenize(source).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Layer, TokenKind::Layer, TokenKind::Atom, TokenKind::Atom]
        );
        assert_eq!(tokens[0].layer_depth(source), Some(1));
        assert_eq!(tokens[1].layer_depth(source), Some(-2));
        assert_eq!(tokens[2].layer_depth(source), None);
    }

    #[test]
    fn layer_at_end_of_input() {
        let tokens = tokenize(b"a ##").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Layer);
        assert_eq!((tokens[1].start, tokens[1].end), (2, 4));
    }

    #[test]
    fn atoms_stop_at_hash_and_star() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_text("a#b c*d"),
            vec![
                (Atom, "a".into()),
                (Atom, "#".into()),
                (Atom, "b".into()),
                (Atom, "c".into()),
                (Atom, "*".into()),
                (Atom, "d".into()),
            ]
        );
    }

    #[test]
    fn strings_exclude_quotes() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_text(r#"'it''s' "a\"b" """#),
            vec![
                (String, "it".into()),
                (String, "s".into()),
                (EscapedString, r#"a\"b"#.into()),
                (String, "".into()),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize(b"x 'abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
        assert_eq!(err.offset, 2);
        let err = tokenize(br#""abc\""#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
    }

    #[test]
    fn newline_in_string() {
        let err = tokenize(b"\"ab\ncd\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NewlineInString);
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new(b"  ");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
