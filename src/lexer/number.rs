//! Numeric literal sub-scanner.
//!
//! Recognizes the radix-qualified number grammar:
//!
//! ```text
//! uinteger     := digit+
//! ureal        := uinteger ["/" uinteger] | decimal          (decimal only in radix 10)
//! decimal      := (uinteger ["." digit*] | "." digit+) [("e"|"E") ["+"|"-"] digit+]
//! real         := ["+"|"-"] ureal | ("+"|"-") ("inf.0"|"nan.0")
//! complex      := real
//!               | real "@" real
//!               | real ("+"|"-") [ureal | "inf.0" | "nan.0"] "i"
//!               | real "i"
//!               | ("+"|"-") "i"
//! ```
//!
//! The scanner only recognizes literals; the value is never computed.

use super::cursor::Cursor;
use super::predicates::{is_binary_digit, is_digit, is_hex_digit, is_octal_digit};
use super::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    /// Maps a prefix designator (`b`, `o`, `d`, `x`, any case) to its radix.
    pub fn from_designator(designator: char) -> Option<Self> {
        match designator.to_ascii_lowercase() {
            'b' => Some(Self::Binary),
            'o' => Some(Self::Octal),
            'd' => Some(Self::Decimal),
            'x' => Some(Self::Hexadecimal),
            _ => None,
        }
    }

    pub fn is_digit(self, c: char) -> bool {
        match self {
            Self::Binary => is_binary_digit(c),
            Self::Octal => is_octal_digit(c),
            Self::Decimal => is_digit(c),
            Self::Hexadecimal => is_hex_digit(c),
        }
    }
}

/// Scans the `#`-prefixed form of a number, the cursor sitting just past the
/// first `#`. Radix and exactness may each be given once, in either order.
pub fn scan_prefixed(cursor: &mut Cursor<'_>) -> Result<(), ScanError> {
    let mut designator = None;
    let mut exact_marked = false;
    loop {
        match cursor.next().map(|c| c.to_ascii_lowercase()) {
            Some(d @ ('b' | 'o' | 'd' | 'x')) if designator.is_none() => designator = Some(d),
            Some('e' | 'i') if !exact_marked => exact_marked = true,
            _ => return Err(ScanError::InvalidPrefix),
        }
        if !cursor.accept("#") {
            break;
        }
    }
    NumberScanner::new(designator.unwrap_or('d')).scan_complex(cursor)
}

/// One literal's worth of scanning state.
///
/// The first failure noted while scanning is the one reported; later
/// productions give up as soon as one has been noted.
#[derive(Debug)]
pub struct NumberScanner {
    radix: Radix,
    failure: Option<ScanError>,
}

impl NumberScanner {
    /// # Panics
    ///
    /// If `designator` is not one of `b o d x`. Callers only pass designators
    /// they have already matched.
    #[track_caller]
    pub fn new(designator: char) -> Self {
        match Radix::from_designator(designator) {
            Some(radix) => Self::with_radix(radix),
            None => panic!("invalid radix designator {designator:?}"),
        }
    }

    pub fn with_radix(radix: Radix) -> Self {
        Self {
            radix,
            failure: None,
        }
    }

    fn fail(&mut self, error: ScanError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Scans a complete literal. The caller still has to check for a
    /// delimiter afterwards.
    pub fn scan_complex(mut self, cursor: &mut Cursor<'_>) -> Result<(), ScanError> {
        let (mut matched, unit) = self.real_or_unit(cursor);
        if matched {
            match cursor.next() {
                Some('+' | '-') => {
                    if self.ureal(cursor) {
                        return self.imaginary_unit(cursor);
                    }
                    let (infnan, unit) = self.uinfnan_or_unit(cursor);
                    if infnan {
                        return self.imaginary_unit(cursor);
                    }
                    matched = unit;
                }
                Some('@') => matched = self.real(cursor),
                Some('i' | 'I') => {}
                _ => cursor.backup(),
            }
        }
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        if !matched && !unit {
            return Err(ScanError::InvalidNumber);
        }
        Ok(())
    }

    fn imaginary_unit(&self, cursor: &mut Cursor<'_>) -> Result<(), ScanError> {
        match cursor.next() {
            Some('i' | 'I') => Ok(()),
            _ => Err(ScanError::ExpectedImaginaryUnit),
        }
    }

    fn real(&mut self, cursor: &mut Cursor<'_>) -> bool {
        self.real_or_unit(cursor).0
    }

    /// Returns `(matched a real, matched a bare signed i)`.
    fn real_or_unit(&mut self, cursor: &mut Cursor<'_>) -> (bool, bool) {
        if cursor.accept("+-") {
            if self.ureal(cursor) {
                return (true, false);
            }
            return self.uinfnan_or_unit(cursor);
        }
        (self.ureal(cursor), false)
    }

    /// Returns `(matched inf.0 or nan.0, matched just i)`. Any other partial
    /// match of `inf.0` or `nan.0` is neither.
    fn uinfnan_or_unit(&mut self, cursor: &mut Cursor<'_>) -> (bool, bool) {
        if self.failed() {
            return (false, false);
        }
        match cursor.accept_seq_ci("inf.0") {
            0 => (cursor.accept_seq_ci("nan.0") == 5, false),
            1 => (false, true),
            5 => (true, false),
            _ => (false, false),
        }
    }

    fn uinteger(&self, cursor: &mut Cursor<'_>) -> bool {
        let radix = self.radix;
        cursor.accept_while(|c| radix.is_digit(c), None) > 0
    }

    fn ureal(&mut self, cursor: &mut Cursor<'_>) -> bool {
        if self.failed() {
            return false;
        }
        let numerator = self.uinteger(cursor);
        match cursor.next() {
            Some('/') if numerator => {
                if !self.uinteger(cursor) {
                    self.fail(ScanError::InvalidFraction);
                    return false;
                }
                true
            }
            Some('.' | 'e' | 'E') => {
                cursor.backup();
                self.decimal(cursor, numerator)
            }
            _ => {
                cursor.backup();
                numerator
            }
        }
    }

    fn decimal(&mut self, cursor: &mut Cursor<'_>, leading_digits: bool) -> bool {
        if self.failed() || self.radix != Radix::Decimal {
            return false;
        }
        let before_dot = cursor.position();
        let fraction_digits = cursor.accept(".") && self.uinteger(cursor);
        if !leading_digits && !fraction_digits {
            // A lone `.` is no magnitude; leave it for whoever comes next.
            cursor.reset(before_dot);
            return false;
        }
        if !cursor.accept("eE") {
            return true;
        }
        cursor.accept("+-");
        if cursor.accept_while(is_digit, None) == 0 {
            self.fail(ScanError::InvalidExponent);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::predicates::is_delimiter;
    use super::*;
    use assert2::check;

    /// Scans `text` as a literal of the given radix, followed by the
    /// delimiter check. Returns the error message (empty on success) and how
    /// many bytes were consumed.
    fn scan(text: &str, radix: char) -> (String, usize) {
        let mut cursor = Cursor::new(text.as_bytes());
        let result = NumberScanner::new(radix)
            .scan_complex(&mut cursor)
            .and_then(|()| {
                if is_delimiter(cursor.peek()) {
                    Ok(())
                } else {
                    Err(ScanError::ExpectedDelimiter)
                }
            });
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        (message, cursor.position().offset)
    }

    macro_rules! verify {
        ($text:literal in $radix:literal) => {
            let (message, consumed) = scan($text, $radix);
            check!(message == "", "{} (radix {})", $text, $radix);
            check!(consumed == $text.len(), "{} not consumed", $text);
        };
        ($text:literal in $radix:literal fails $message:literal) => {
            let (message, _) = scan($text, $radix);
            check!(message == $message, "{} (radix {})", $text, $radix);
        };
    }

    #[test]
    fn unsigned_integers() {
        verify!("1234" in 'd');
        verify!("3417" in 'o');
        verify!("10011" in 'b');
        verify!("1bfA78" in 'x');
        verify!("12a34" in 'd' fails "expected delimiter or EOF");
        verify!("12384" in 'o' fails "expected delimiter or EOF");
        verify!("1012" in 'b' fails "expected delimiter or EOF");
        verify!("1bfg78" in 'x' fails "expected delimiter or EOF");
    }

    #[test]
    fn rationals() {
        verify!("123/456" in 'd');
        verify!("-10/11" in 'b');
        verify!("12/89" in 'o' fails "invalid fraction");
        verify!("/12" in 'd' fails "invalid number");
        verify!("12/" in 'd' fails "invalid fraction");
    }

    #[test]
    fn decimals() {
        verify!("3.1416" in 'd');
        verify!(".35e10" in 'd');
        verify!("1." in 'd');
        verify!("1e6" in 'd');
        verify!("-1E+6" in 'd');
        verify!("2.5e-3" in 'd');
        verify!("." in 'd' fails "invalid number");
        verify!(".e5" in 'd' fails "invalid number");
        verify!("1.2Exx" in 'd' fails "invalid exponent");
        verify!("1e" in 'd' fails "invalid exponent");
        verify!("1.1" in 'b' fails "invalid number");
        verify!("7.0" in 'o' fails "invalid number");
    }

    #[test]
    fn infinities_and_nans() {
        verify!("+nan.0" in 'x');
        verify!("-inf.0" in 'b');
        verify!("+INF.0" in 'd');
        verify!("+in2" in 'd' fails "invalid number");
        verify!("-na" in 'd' fails "invalid number");
        verify!("inf.0" in 'd' fails "invalid number");
    }

    #[test]
    fn complex_numbers() {
        verify!("12+4i" in 'o');
        verify!("ff-12abi" in 'x');
        verify!("-10/11+11/100i" in 'b');
        verify!("+i" in 'd');
        verify!("-I" in 'd');
        verify!("2i" in 'd');
        verify!("-2/3@-3.56" in 'd');
        verify!("+inf.0i" in 'd');
        verify!("2/3+inf.0i" in 'd');
        verify!("1.5-nan.0i" in 'd');
        verify!("5-i" in 'd');
        verify!("1@+inf.0" in 'd');
        verify!("5+3" in 'd' fails "expected i");
        verify!("5+" in 'd' fails "invalid number");
        verify!("1@x" in 'd' fails "invalid number");
    }

    #[test]
    fn dot_without_digits_is_no_magnitude() {
        verify!("+.i" in 'd' fails "invalid number");
        verify!("5+.i" in 'd' fails "invalid number");
        verify!("1+.inf.0i" in 'd' fails "invalid number");
        verify!("1-.e2i" in 'd' fails "invalid number");
        verify!("1@." in 'd' fails "invalid number");
        verify!("1@.e1" in 'd' fails "invalid number");
        verify!("-." in 'd' fails "invalid number");
        verify!("5+.5i" in 'd');
        verify!("1@.5" in 'd');
    }

    #[test]
    fn first_failure_wins() {
        verify!("+1/x" in 'd' fails "invalid fraction");
        verify!("1e-x/3" in 'd' fails "invalid exponent");
        // Without the noted fraction failure the trailing `i` would match as a unit.
        verify!("1+2/i" in 'd' fails "invalid fraction");
    }

    #[test]
    fn prefixes() {
        fn prefixed(text: &str) -> Result<(), ScanError> {
            let mut cursor = Cursor::new(text.as_bytes());
            scan_prefixed(&mut cursor)
        }

        check!(prefixed("x#Iff") == Ok(()));
        check!(prefixed("e#B101") == Ok(()));
        check!(prefixed("i12") == Ok(()));
        check!(prefixed("d1.5") == Ok(()));
        check!(prefixed("b#x10") == Err(ScanError::InvalidPrefix));
        check!(prefixed("e#i1") == Err(ScanError::InvalidPrefix));
        check!(prefixed("x#z1") == Err(ScanError::InvalidPrefix));
        check!(prefixed("b1.1") == Err(ScanError::InvalidNumber));
        check!(prefixed("d+.i") == Err(ScanError::InvalidNumber));
        check!(prefixed("x+.i") == Err(ScanError::InvalidNumber));
    }

    #[test]
    #[should_panic(expected = "invalid radix designator")]
    fn unknown_radix_designator_panics() {
        let _ = NumberScanner::new('q');
    }
}
