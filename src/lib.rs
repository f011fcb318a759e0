//! Lexical scanner for R7RS-style Scheme source text.

pub mod lexer;

pub use lexer::{Position, ScanError, Scanner, Token, TokenKind};
