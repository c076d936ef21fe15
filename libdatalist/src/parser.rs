//! Structural parser
//!
//! Recursive descent over the token stream. Each bracket picks a form:
//! - `( … )`: positional values only
//! - `[ … ]`: `key: value` entries kept in order as a pair list, or
//!   positional values when the content does not start with `atom sep`
//! - `{ … }`: `key = value` entries written into a map (last write wins),
//!   or positional values
//!
//! The document root behaves like `[ … ]`/`{ … }` without brackets: its
//! first separator decides between a pair list (`:`) and a map (`=`), and
//! later entries must use the same separator. A root holding exactly one
//! positional value is that value.

use crate::coerce::coerce;
use crate::error::{ErrorKind, ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::sink::ValueSink;

/// Outcome of reading the first token(s) of a container.
enum Probe {
    /// An atom followed by a separator; the separator is the current token.
    Key(Token),
    /// An atom followed by something else, which is the current token.
    Bare(Token),
    /// The current token is not an atom.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyed {
    Map,
    Pairs,
}

enum Entries<M, P> {
    Map(M),
    Pairs(P),
}

pub(crate) struct Parser<'a, 's, S: ValueSink> {
    lexer: Lexer<'a>,
    token: Token,
    sink: &'s mut S,
    max_depth: usize,
}

impl<'a, 's, S: ValueSink> Parser<'a, 's, S> {
    pub(crate) fn new(source: &'a [u8], sink: &'s mut S, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(source),
            token: Token {
                kind: TokenKind::Eof,
                start: 0,
                end: 0,
            },
            sink,
            max_depth,
        }
    }

    /// Parse the whole document into a single root value.
    pub(crate) fn parse_document(mut self) -> Result<S::Value> {
        let mut bare = match self.probe()? {
            Probe::Key(key) => {
                let form = match self.current_byte() {
                    Some(b':') => Keyed::Pairs,
                    _ => Keyed::Map,
                };
                return self.parse_keyed(key, form, 0, None);
            }
            Probe::Bare(atom) => Some(atom),
            Probe::Other => None,
        };

        let Some(first) = self.next_positional(&mut bare, 0, None)? else {
            let list = self.sink.create_list();
            return Ok(self.sink.end_list(list));
        };
        let Some(second) = self.next_positional(&mut bare, 0, None)? else {
            return Ok(first);
        };
        let mut list = self.sink.create_list();
        self.sink.set_index(&mut list, 1, first);
        self.sink.set_index(&mut list, 2, second);
        self.fill_list(&mut list, 3, bare, 0, None)?;
        Ok(self.sink.end_list(list))
    }

    fn source(&self) -> &'a [u8] {
        self.lexer.source()
    }

    fn advance(&mut self) -> Result<Token> {
        self.token = self.lexer.next_token()?;
        Ok(self.token)
    }

    fn current_byte(&self) -> Option<u8> {
        self.token.first_byte(self.source())
    }

    fn at_bracket(&self, bracket: u8) -> bool {
        self.token.kind == TokenKind::Bracket && self.current_byte() == Some(bracket)
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::at(kind, self.token.start)
    }

    /// Read an atom and the token after it, to tell keyed content from
    /// positional content.
    fn probe(&mut self) -> Result<Probe> {
        let first = self.advance()?;
        if first.kind != TokenKind::Atom {
            return Ok(Probe::Other);
        }
        let next = self.advance()?;
        Ok(if next.kind == TokenKind::Symbol {
            Probe::Key(first)
        } else {
            Probe::Bare(first)
        })
    }

    /// Whether the current token ends the container closed by `close`
    /// (`None` for the document root, which ends at end of input).
    fn closes(&self, close: Option<u8>) -> Result<bool> {
        match self.token.kind {
            TokenKind::Eof if close.is_none() => Ok(true),
            TokenKind::Eof => Err(self.error(ErrorKind::NotClosed)),
            TokenKind::Bracket => match self.current_byte() {
                Some(b @ (b')' | b']' | b'}')) if Some(b) == close => Ok(true),
                Some(b')' | b']' | b'}') => Err(self.error(ErrorKind::InvalidClosedBracket)),
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }

    /// Turn the current token into a value, or `None` if it closes the
    /// container.
    fn parse_value(&mut self, depth: usize, close: Option<u8>) -> Result<Option<S::Value>> {
        if self.closes(close)? {
            return Ok(None);
        }
        let token = self.token;
        match token.kind {
            TokenKind::Bracket => self.parse_container(depth + 1).map(Some),
            TokenKind::Layer => Err(self.error(ErrorKind::InvalidLayer)),
            TokenKind::Symbol => Err(self.error(ErrorKind::InvalidSymbol)),
            _ => self.scalar(token).map(Some),
        }
    }

    fn scalar(&mut self, token: Token) -> Result<S::Value> {
        let scalar = coerce(token.text(self.source()), token.kind)
            .map_err(|kind| ParseError::at(kind, token.start))?;
        Ok(self.sink.scalar(scalar))
    }

    /// Parse the container opened by the current token, `depth` brackets deep.
    fn parse_container(&mut self, depth: usize) -> Result<S::Value> {
        if depth > self.max_depth {
            return Err(self.error(ErrorKind::TooDeep));
        }
        match self.current_byte() {
            Some(b'[') => self.parse_bracketed(Keyed::Pairs, depth, b']'),
            Some(b'{') => self.parse_bracketed(Keyed::Map, depth, b'}'),
            _ => {
                self.advance()?;
                self.parse_positional(None, depth, Some(b')'))
            }
        }
    }

    fn parse_bracketed(&mut self, form: Keyed, depth: usize, close: u8) -> Result<S::Value> {
        match self.probe()? {
            Probe::Key(key) => self.parse_keyed(key, form, depth, Some(close)),
            Probe::Bare(atom) => self.parse_positional(Some(atom), depth, Some(close)),
            Probe::Other if form == Keyed::Map && self.at_bracket(close) => {
                let map = self.sink.create_map();
                Ok(self.sink.end_map(map))
            }
            Probe::Other => self.parse_positional(None, depth, Some(close)),
        }
    }

    /// Keyed entries, starting with `key` whose separator is the current token.
    fn parse_keyed(
        &mut self,
        mut key: Token,
        form: Keyed,
        depth: usize,
        close: Option<u8>,
    ) -> Result<S::Value> {
        // Only the root pins its separator.
        let separator = match close {
            None => self.current_byte(),
            Some(_) => None,
        };
        let mut entries = match form {
            Keyed::Map => Entries::Map(self.sink.create_map()),
            Keyed::Pairs => Entries::Pairs(self.sink.create_pair_list()),
        };

        loop {
            self.advance()?;
            let value = match self.parse_value(depth, close)? {
                Some(value) => value,
                None => return Err(self.error(ErrorKind::NoValue)),
            };
            let name = key.text(self.source());
            match &mut entries {
                Entries::Map(map) => self.sink.set_key(map, name, value),
                Entries::Pairs(pairs) => self.sink.append_pair(pairs, name, value),
            }

            match self.probe()? {
                Probe::Key(next) => {
                    if separator.is_some() && self.current_byte() != separator {
                        return Err(self.error(ErrorKind::InvalidSeparator));
                    }
                    key = next;
                }
                Probe::Bare(atom) => return Err(ParseError::at(ErrorKind::NoValue, atom.start)),
                Probe::Other => {
                    if self.closes(close)? {
                        break;
                    }
                    return Err(self.error(ErrorKind::NeedKey));
                }
            }
        }

        Ok(match entries {
            Entries::Map(map) => self.sink.end_map(map),
            Entries::Pairs(pairs) => self.sink.end_pair_list(pairs),
        })
    }

    /// Positional values from the current token on. `bare` is an atom the
    /// probe already consumed, which comes first.
    fn parse_positional(
        &mut self,
        bare: Option<Token>,
        depth: usize,
        close: Option<u8>,
    ) -> Result<S::Value> {
        let mut list = self.sink.create_list();
        self.fill_list(&mut list, 1, bare, depth, close)?;
        Ok(self.sink.end_list(list))
    }

    fn fill_list(
        &mut self,
        list: &mut S::List,
        mut index: usize,
        mut bare: Option<Token>,
        depth: usize,
        close: Option<u8>,
    ) -> Result<()> {
        while let Some(value) = self.next_positional(&mut bare, depth, close)? {
            self.sink.set_index(list, index, value);
            index += 1;
        }
        Ok(())
    }

    fn next_positional(
        &mut self,
        bare: &mut Option<Token>,
        depth: usize,
        close: Option<u8>,
    ) -> Result<Option<S::Value>> {
        if let Some(atom) = bare.take() {
            return self.scalar(atom).map(Some);
        }
        let value = self.parse_value(depth, close)?;
        if value.is_some() {
            self.advance()?;
        }
        Ok(value)
    }
}
