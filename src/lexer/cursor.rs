use super::token::{Position, Token, TokenKind};

/// Character cursor over a source buffer.
///
/// Everything consumed since the last mark belongs to the token being scanned;
/// [`Cursor::emit`] turns it into a token and [`Cursor::ignore`] drops it.
/// `backup` undoes exactly one `next`, end of input included.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a [u8],
    pos: Position,
    prev: Position,
    mark: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: Position::START,
            prev: Position::START,
            mark: Position::START,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn next(&mut self) -> Option<char> {
        self.prev = self.pos;
        let rest = self.source.get(self.pos.offset..).filter(|r| !r.is_empty())?;
        let (c, width) = decode(rest);
        self.pos.offset += width;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    pub fn backup(&mut self) {
        self.pos = self.prev;
    }

    pub fn peek(&mut self) -> Option<char> {
        let c = self.next();
        self.backup();
        c
    }

    /// Returns to the start of the current token.
    pub fn rewind(&mut self) {
        self.pos = self.mark;
        self.prev = self.mark;
    }

    /// Returns to a position taken from [`Cursor::position`] within the
    /// current token.
    pub fn reset(&mut self, to: Position) {
        debug_assert!(self.mark.offset <= to.offset && to.offset <= self.pos.offset);
        self.pos = to;
        self.prev = to;
    }

    pub fn ignore(&mut self) {
        self.mark = self.pos;
    }

    pub fn emit(&mut self, kind: TokenKind) -> Token<'a> {
        let token = Token {
            kind,
            text: self.lit(),
            position: self.mark,
        };
        self.mark = self.pos;
        token
    }

    /// Bytes consumed since the mark.
    pub fn lit(&self) -> &'a [u8] {
        &self.source[self.mark.offset..self.pos.offset]
    }

    /// Consumes the next character if it is one of `set`.
    pub fn accept(&mut self, set: &str) -> bool {
        match self.next() {
            Some(c) if set.contains(c) => true,
            _ => {
                self.backup();
                false
            }
        }
    }

    /// Consumes the longest run (at most `max`, if given) of characters
    /// matching `pred` and returns its length.
    pub fn accept_while(&mut self, pred: impl Fn(char) -> bool, max: Option<usize>) -> usize {
        let mut count = 0;
        while max.map_or(true, |max| count < max) {
            match self.next() {
                Some(c) if pred(c) => count += 1,
                _ => {
                    self.backup();
                    break;
                }
            }
        }
        count
    }

    /// Consumes as much of `seq` as matches (ignoring ASCII case) and returns
    /// how many characters matched.
    pub fn accept_seq_ci(&mut self, seq: &str) -> usize {
        for (matched, expected) in seq.chars().enumerate() {
            match self.next() {
                Some(c) if c.eq_ignore_ascii_case(&expected) => {}
                _ => {
                    self.backup();
                    return matched;
                }
            }
        }
        seq.chars().count()
    }
}

// Invalid UTF-8 decodes to U+FFFD, one maximal invalid sequence at a time.
fn decode(rest: &[u8]) -> (char, usize) {
    let window = &rest[..rest.len().min(4)];
    match window.utf8_chunks().next() {
        Some(chunk) => match chunk.valid().chars().next() {
            Some(c) => (c, c.len_utf8()),
            None => (char::REPLACEMENT_CHARACTER, chunk.invalid().len().max(1)),
        },
        None => (char::REPLACEMENT_CHARACTER, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn tracks_lines_and_columns() {
        let mut cursor = Cursor::new(b"a\nbc");
        check!(cursor.next() == Some('a'));
        check!(cursor.next() == Some('\n'));
        check!(cursor.position() == Position { offset: 2, line: 2, column: 1 });
        check!(cursor.next() == Some('b'));
        check!(cursor.position() == Position { offset: 3, line: 2, column: 2 });
        cursor.backup();
        check!(cursor.position() == Position { offset: 2, line: 2, column: 1 });
    }

    #[test]
    fn backup_at_end_of_input_is_harmless() {
        let mut cursor = Cursor::new(b"x");
        check!(cursor.next() == Some('x'));
        check!(cursor.next() == None);
        cursor.backup();
        check!(cursor.position().offset == 1);
        check!(cursor.peek() == None);
    }

    #[test]
    fn emit_and_ignore_move_the_mark() {
        let mut cursor = Cursor::new(b"  ab c");
        cursor.accept_while(|c| c == ' ', None);
        cursor.ignore();
        cursor.accept_while(|c| c.is_ascii_alphabetic(), None);
        let token = cursor.emit(TokenKind::Identifier);
        check!(token.text == b"ab");
        check!(token.position == Position { offset: 2, line: 1, column: 3 });
        check!(cursor.lit().is_empty());
    }

    #[test]
    fn bounded_munch() {
        let mut cursor = Cursor::new(b"aaaa");
        check!(cursor.accept_while(|c| c == 'a', Some(3)) == 3);
        check!(cursor.accept_while(|c| c == 'a', None) == 1);
    }

    #[test]
    fn case_insensitive_sequence() {
        let mut cursor = Cursor::new(b"InF.0");
        check!(cursor.accept_seq_ci("inf.0") == 5);
        let mut cursor = Cursor::new(b"in2");
        check!(cursor.accept_seq_ci("inf.0") == 2);
        check!(cursor.peek() == Some('2'));
    }

    #[test]
    fn rewind_returns_to_mark() {
        let mut cursor = Cursor::new(b"+.5");
        check!(cursor.accept("+-"));
        check!(cursor.accept("."));
        cursor.rewind();
        check!(cursor.lit().is_empty());
        check!(cursor.next() == Some('+'));
    }

    #[test]
    fn reset_undoes_more_than_one_character() {
        let mut cursor = Cursor::new(b"1.e");
        check!(cursor.accept("1"));
        let before_dot = cursor.position();
        check!(cursor.accept("."));
        check!(!cursor.accept("0123456789"));
        cursor.reset(before_dot);
        check!(cursor.lit() == b"1");
        check!(cursor.next() == Some('.'));
    }

    #[test]
    fn decodes_utf8_and_replaces_garbage() {
        let mut cursor = Cursor::new("λ".as_bytes());
        check!(cursor.next() == Some('λ'));
        check!(cursor.position() == Position { offset: 2, line: 1, column: 2 });

        let mut cursor = Cursor::new(&[0xff, b'a']);
        let_assert!(Some(c) = cursor.next());
        check!(c == char::REPLACEMENT_CHARACTER);
        check!(cursor.next() == Some('a'));
    }
}
