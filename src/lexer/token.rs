use std::fmt;

/// Where a token starts in its source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset from the start of the buffer.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Invalid,
    EndOfInput,
    CommentDatum,
    Identifier,
    OpenParen,
    CloseParen,
    Quote,
    Backquote,
    Comma,
    CommaAt,
    Dot,
    Number,
    String,
    OpenVector,
    OpenByteVector,
    Boolean,
    Directive,
    Character,
}

impl TokenKind {
    /// Whether no further tokens follow one of this kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Invalid | Self::EndOfInput)
    }
}

/// Tokens borrow their text from the buffer they were scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exactly the bytes matched for this token.
    pub text: &'a [u8],
    pub position: Position,
}

impl<'a> Token<'a> {
    /// Byte range of the token within its source.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.position.offset..self.position.offset + self.text.len()
    }

    /// The token text, if it is valid UTF-8 (it always is unless the source wasn't).
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.text).ok()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(
            f,
            "[{}..{}] {} {:?} {:?}",
            span.start,
            span.end,
            self.position,
            self.kind,
            String::from_utf8_lossy(self.text)
        )
    }
}
