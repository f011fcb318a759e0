//! Character classes of the lexical grammar.
//!
//! Only the ASCII classes the grammar names are recognized; anything else is
//! neither a letter nor a digit.

/// Whitespace, `|`, `(`, `)`, `"`, `;` or end of input (`None`).
pub fn is_delimiter(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => is_whitespace(c) || matches!(c, '|' | '(' | ')' | '"' | ';'),
    }
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

pub fn is_inline_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_special_initial(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '%' | '&' | '*' | '/' | ':' | '<' | '=' | '>' | '?' | '^' | '_' | '~'
    )
}

pub fn is_initial(c: char) -> bool {
    is_letter(c) || is_special_initial(c)
}

pub fn is_special_subsequent(c: char) -> bool {
    matches!(c, '+' | '-' | '.' | '@')
}

pub fn is_subsequent(c: char) -> bool {
    is_initial(c) || is_digit(c) || is_special_subsequent(c)
}

pub fn is_sign_subsequent(c: char) -> bool {
    is_initial(c) || matches!(c, '+' | '-' | '@')
}

pub fn is_dot_subsequent(c: char) -> bool {
    is_sign_subsequent(c) || c == '.'
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

pub fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}
