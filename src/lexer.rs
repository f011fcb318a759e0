//! Scheme lexical scanner.
//!
//! [`Scanner`] pulls one [`Token`] at a time out of a source buffer. Token
//! text borrows from the buffer. Whitespace and comments are skipped, and
//! scanning stops at the first malformed token, which comes out as
//! [`TokenKind::Invalid`] with the reason available from [`Scanner::error`].

mod cursor;
mod number;
mod predicates;
mod token;

use tracing::{debug, trace};

use cursor::Cursor;
use number::{NumberScanner, Radix};
use predicates::*;

pub use token::{Position, Token, TokenKind};

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScanError {
    #[error("illegal character")]
    IllegalCharacter,
    #[error("invalid character after '.'")]
    InvalidAfterDot,
    #[error("invalid character after '{0}'")]
    InvalidAfterSign(char),
    #[error("expected delimiter or EOF")]
    ExpectedDelimiter,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unexpected EOF")]
    UnexpectedEof,
    #[error("invalid character")]
    InvalidCharacter,
    #[error("invalid # word")]
    InvalidHashWord,
    #[error("invalid character following #")]
    InvalidAfterHash,
    #[error("expected '('")]
    ExpectedOpenParen,
    #[error("invalid directive")]
    InvalidDirective,
    #[error("invalid prefix")]
    InvalidPrefix,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid fraction")]
    InvalidFraction,
    #[error("invalid exponent")]
    InvalidExponent,
    #[error("expected i")]
    ExpectedImaginaryUnit,
}

// Signed words that read as identifiers but are numbers.
const SIGNED_NUMBER_WORDS: [&str; 5] = ["i", "inf.0", "nan.0", "inf.0i", "nan.0i"];

/// Where the next pull resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// The previous token must be followed by a delimiter.
    Delimiter,
    /// `EndOfInput` or `Invalid` has been handed out.
    Exhausted,
}

#[derive(Debug)]
enum Step {
    Skip(State),
    Emit(TokenKind, State),
}

use Step::{Emit, Skip};

pub struct Scanner<'a> {
    name: Box<str>,
    cursor: Cursor<'a>,
    state: State,
    error: Option<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(name: impl Into<Box<str>>, source: &'a [u8]) -> Self {
        Self {
            name: name.into(),
            cursor: Cursor::new(source),
            state: State::Start,
            error: None,
        }
    }

    /// The source name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first error encountered, if any.
    pub fn error(&self) -> Option<ScanError> {
        self.error
    }

    /// The first error's message, or the empty string.
    pub fn error_message(&self) -> String {
        self.error.map(|e| e.to_string()).unwrap_or_default()
    }

    /// Scans the next token.
    ///
    /// Once `EndOfInput` or `Invalid` has been returned every further call
    /// returns an empty `EndOfInput` token at the position scanning stopped.
    pub fn next_token(&mut self) -> Token<'a> {
        loop {
            let step = match self.state {
                State::Start => self.scan_token(),
                State::Delimiter => self.check_delimiter(),
                State::Exhausted => return self.cursor.emit(TokenKind::EndOfInput),
            };
            match step {
                Ok(Skip(next)) => self.state = next,
                Ok(Emit(kind, next)) => {
                    self.state = next;
                    let token = self.cursor.emit(kind);
                    trace!(
                        source = %self.name,
                        kind = ?token.kind,
                        offset = token.position.offset,
                        "token"
                    );
                    return token;
                }
                Err(error) => {
                    self.state = State::Exhausted;
                    let token = self.cursor.emit(TokenKind::Invalid);
                    self.record(error, token.position);
                    return token;
                }
            }
        }
    }

    fn record(&mut self, error: ScanError, at: Position) {
        if self.error.is_some() {
            return;
        }
        debug!(source = %self.name, line = at.line, column = at.column, %error, "scan failed");
        self.error = Some(error);
    }

    fn scan_token(&mut self) -> Result<Step, ScanError> {
        let Some(c) = self.cursor.next() else {
            return Ok(Emit(TokenKind::EndOfInput, State::Exhausted));
        };
        match c {
            c if is_initial(c) => Ok(self.identifier()),
            c if is_whitespace(c) => {
                self.cursor.ignore();
                Ok(Skip(State::Start))
            }
            c if is_digit(c) => {
                self.cursor.backup();
                self.number(Radix::Decimal)
            }
            '|' => self.bar_identifier(),
            '(' => Ok(Emit(TokenKind::OpenParen, State::Start)),
            ')' => Ok(Emit(TokenKind::CloseParen, State::Start)),
            '\'' => Ok(Emit(TokenKind::Quote, State::Start)),
            '`' => Ok(Emit(TokenKind::Backquote, State::Start)),
            ',' => {
                let kind = if self.cursor.accept("@") {
                    TokenKind::CommaAt
                } else {
                    TokenKind::Comma
                };
                Ok(Emit(kind, State::Start))
            }
            ';' => {
                while !matches!(self.cursor.next(), Some('\n') | None) {}
                self.cursor.ignore();
                Ok(Skip(State::Start))
            }
            '#' => self.hash(),
            '"' => self.string(),
            '.' => self.dot(),
            '+' | '-' => self.sign(c),
            _ => Err(ScanError::IllegalCharacter),
        }
    }

    fn check_delimiter(&mut self) -> Result<Step, ScanError> {
        if is_delimiter(self.cursor.peek()) {
            Ok(Skip(State::Start))
        } else {
            Err(ScanError::ExpectedDelimiter)
        }
    }

    /// Scans the rest of an identifier whose first character(s) were consumed.
    fn identifier(&mut self) -> Step {
        self.cursor.accept_while(is_subsequent, None);
        let kind = match self.cursor.lit() {
            [b'+' | b'-', word @ ..] if is_signed_number_word(word) => TokenKind::Number,
            _ => TokenKind::Identifier,
        };
        Emit(kind, State::Delimiter)
    }

    fn number(&mut self, radix: Radix) -> Result<Step, ScanError> {
        NumberScanner::with_radix(radix).scan_complex(&mut self.cursor)?;
        Ok(Emit(TokenKind::Number, State::Delimiter))
    }

    // After a leading `.`.
    fn dot(&mut self) -> Result<Step, ScanError> {
        match self.cursor.next() {
            c if is_delimiter(c) => {
                self.cursor.backup();
                Ok(Emit(TokenKind::Dot, State::Start))
            }
            Some(c) if is_dot_subsequent(c) => Ok(self.identifier()),
            Some(c) if is_digit(c) => {
                self.cursor.rewind();
                self.number(Radix::Decimal)
            }
            _ => Err(ScanError::InvalidAfterDot),
        }
    }

    // After a leading `+` or `-`.
    fn sign(&mut self, sign: char) -> Result<Step, ScanError> {
        match self.cursor.next() {
            c if is_delimiter(c) => {
                self.cursor.backup();
                Ok(Emit(TokenKind::Identifier, State::Start))
            }
            Some('.') => match self.cursor.next() {
                Some(c) if is_digit(c) => {
                    self.cursor.rewind();
                    self.number(Radix::Decimal)
                }
                Some(c) if is_dot_subsequent(c) => Ok(self.identifier()),
                _ => Err(ScanError::InvalidAfterDot),
            },
            Some(c) if is_digit(c) => {
                self.cursor.rewind();
                self.number(Radix::Decimal)
            }
            Some(c) if is_sign_subsequent(c) => Ok(self.identifier()),
            _ => Err(ScanError::InvalidAfterSign(sign)),
        }
    }

    fn bar_identifier(&mut self) -> Result<Step, ScanError> {
        self.quoted('|', TokenKind::Identifier)
    }

    fn string(&mut self) -> Result<Step, ScanError> {
        self.quoted('"', TokenKind::String)
    }

    fn quoted(&mut self, delimiter: char, kind: TokenKind) -> Result<Step, ScanError> {
        loop {
            match self.cursor.next() {
                None => return Err(ScanError::UnexpectedEof),
                Some(c) if c == delimiter => return Ok(Emit(kind, State::Start)),
                Some('\\') => {
                    if !self.escape(delimiter) {
                        return Err(ScanError::InvalidEscape);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Consumes one escape sequence after its `\`, reporting whether it was
    /// well formed.
    fn escape(&mut self, delimiter: char) -> bool {
        match self.cursor.next() {
            Some('x') => {
                self.cursor.accept_while(is_hex_digit, None) > 0
                    && self.cursor.next() == Some(';')
            }
            Some('a' | 'b' | 't' | 'n' | 'r' | '\\') => true,
            Some(c) if c == delimiter => true,
            Some(' ' | '\t') => {
                self.cursor.accept_while(is_inline_whitespace, None);
                if self.cursor.next() != Some('\n') {
                    return false;
                }
                self.cursor.accept_while(is_inline_whitespace, None);
                true
            }
            Some('\n') => {
                self.cursor.accept_while(is_inline_whitespace, None);
                true
            }
            _ => false,
        }
    }

    fn hash(&mut self) -> Result<Step, ScanError> {
        match self.cursor.next() {
            None => Err(ScanError::UnexpectedEof),
            Some('|') => self.nested_comment(),
            Some('!') => self.directive(),
            Some('\\') => self.character(),
            Some('(') => Ok(Emit(TokenKind::OpenVector, State::Start)),
            Some(';') => Ok(Emit(TokenKind::CommentDatum, State::Start)),
            Some('x' | 'X' | 'd' | 'D' | 'b' | 'B' | 'o' | 'O' | 'i' | 'I' | 'e' | 'E') => {
                self.cursor.backup();
                number::scan_prefixed(&mut self.cursor)?;
                Ok(Emit(TokenKind::Number, State::Delimiter))
            }
            Some(c) if is_initial(c) => {
                self.cursor.accept_while(is_subsequent, None);
                let word = &self.cursor.lit()[1..];
                match word.to_ascii_lowercase().as_slice() {
                    b"t" | b"true" | b"f" | b"false" => {
                        Ok(Emit(TokenKind::Boolean, State::Delimiter))
                    }
                    b"u8" => match self.cursor.next() {
                        Some('(') => Ok(Emit(TokenKind::OpenByteVector, State::Start)),
                        _ => Err(ScanError::ExpectedOpenParen),
                    },
                    _ => Err(ScanError::InvalidHashWord),
                }
            }
            Some(_) => Err(ScanError::InvalidAfterHash),
        }
    }

    /// Skips a `#| ... |#` comment, which may nest.
    ///
    /// Pairs are recognized one character at a time, so the `|` closing one
    /// pair can't also open another: `#||#` is a complete comment.
    fn nested_comment(&mut self) -> Result<Step, ScanError> {
        #[derive(PartialEq)]
        enum Half {
            Neither,
            Hash,
            Bar,
        }

        let mut depth = 1usize;
        let mut half = Half::Neither;
        while depth > 0 {
            half = match self.cursor.next() {
                None => return Err(ScanError::UnexpectedEof),
                Some('#') if half == Half::Bar => {
                    depth -= 1;
                    Half::Neither
                }
                Some('#') => Half::Hash,
                Some('|') if half == Half::Hash => {
                    depth += 1;
                    Half::Neither
                }
                Some('|') => Half::Bar,
                Some(_) => Half::Neither,
            };
        }
        self.cursor.ignore();
        Ok(Skip(State::Start))
    }

    fn directive(&mut self) -> Result<Step, ScanError> {
        match self.cursor.next() {
            Some(c) if is_initial(c) => {
                self.cursor.accept_while(is_subsequent, None);
                Ok(Emit(TokenKind::Directive, State::Delimiter))
            }
            _ => Err(ScanError::InvalidDirective),
        }
    }

    // After `#\`.
    fn character(&mut self) -> Result<Step, ScanError> {
        let Some(c) = self.cursor.next() else {
            return Err(ScanError::UnexpectedEof);
        };
        match self.cursor.next() {
            d if is_delimiter(d) => {
                self.cursor.backup();
                return Ok(Emit(TokenKind::Character, State::Start));
            }
            Some(d) if matches!(c, 'x' | 'X') && is_hex_digit(d) => {
                self.cursor.accept_while(is_hex_digit, None);
            }
            // Named character, e.g. `#\space`.
            Some(d) if is_initial(c) && is_subsequent(d) => {
                self.cursor.accept_while(is_subsequent, None);
            }
            _ => return Err(ScanError::InvalidCharacter),
        }
        Ok(Emit(TokenKind::Character, State::Delimiter))
    }
}

fn is_signed_number_word(word: &[u8]) -> bool {
    SIGNED_NUMBER_WORDS
        .iter()
        .any(|w| word.eq_ignore_ascii_case(w.as_bytes()))
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    /// Yields tokens up to and including `EndOfInput` or `Invalid`.
    fn next(&mut self) -> Option<Token<'a>> {
        if self.state == State::Exhausted {
            return None;
        }
        Some(self.next_token())
    }
}
