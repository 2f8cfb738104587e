//! Byte-level text scanning.
//!
//! Every read goes through [`Cursor`], which reports end of input as `None`
//! instead of relying on trailing padding. Numeric scanners return a
//! [`Scanned`] value carrying the parsed value, the bytes consumed and the
//! number of digits seen, so "no number here" is never confused with "0".

/// ASCII whitespace recognised by the OBJ scanner.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Result of scanning a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scanned<T> {
    pub value: T,
    /// Bytes consumed, including a sign with no digits after it
    pub consumed: usize,
    /// Digits consumed (integer and fraction)
    pub digits: usize,
}

impl<T> Scanned<T> {
    /// True if at least one digit was consumed.
    #[inline]
    pub fn is_number(&self) -> bool {
        self.digits > 0
    }
}

/// Scan an optional `+`/`-` sign. Returns (negative, bytes consumed).
fn scan_sign(bytes: &[u8]) -> (bool, usize) {
    match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    }
}

/// Scan a maximal run of ASCII digits, feeding each into `push`.
fn scan_digits(bytes: &[u8], mut push: impl FnMut(u8)) -> usize {
    let run = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    for &b in &bytes[..run] {
        push(b - b'0');
    }
    run
}

/// Scan a signed decimal integer at the start of `bytes`.
///
/// The value saturates instead of overflowing on absurdly long digit runs.
pub fn scan_int(bytes: &[u8]) -> Scanned<i64> {
    let (negative, mut consumed) = scan_sign(bytes);
    let mut value: i64 = 0;
    let digits = scan_digits(&bytes[consumed..], |d| {
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    });
    consumed += digits;

    Scanned {
        value: if negative { -value } else { value },
        consumed,
        digits,
    }
}

/// Scan a signed decimal float (`[+-]digits[.digits]`) at the start of `bytes`.
///
/// The fraction is accumulated as `digits / 10^n`. Exponents are not part of
/// the accepted syntax.
pub fn scan_float(bytes: &[u8]) -> Scanned<f32> {
    let (negative, mut consumed) = scan_sign(bytes);

    let mut whole = 0.0f64;
    let mut digits = scan_digits(&bytes[consumed..], |d| {
        whole = whole * 10.0 + f64::from(d);
    });
    consumed += digits;

    let mut value = whole;
    if bytes.get(consumed) == Some(&b'.') {
        consumed += 1;
        let mut fraction = 0.0f64;
        let mut scale = 1.0f64;
        let fraction_digits = scan_digits(&bytes[consumed..], |d| {
            fraction = fraction * 10.0 + f64::from(d);
            scale *= 10.0;
        });
        consumed += fraction_digits;
        digits += fraction_digits;
        value += fraction / scale;
    }

    Scanned {
        value: if negative { -value as f32 } else { value as f32 },
        consumed,
        digits,
    }
}

/// Bounds-checked forward cursor over a byte buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current byte, or `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Unread remainder of the buffer.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.pos..).unwrap_or(&[])
    }

    /// Advance by up to `n` bytes, stopping at end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    /// True if the remainder starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    /// Skip to the next whitespace byte (or end of input).
    pub fn skip_token(&mut self) {
        while self.peek().is_some_and(|b| !is_whitespace(b)) {
            self.pos += 1;
        }
    }

    pub fn scan_int(&mut self) -> Scanned<i64> {
        let scanned = scan_int(self.remaining());
        self.pos += scanned.consumed;
        scanned
    }

    pub fn scan_float(&mut self) -> Scanned<f32> {
        let scanned = scan_float(self.remaining());
        self.pos += scanned.consumed;
        scanned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        for b in [b' ', b'\t', b'\r', b'\n'] {
            assert!(is_whitespace(b));
        }
        assert!(!is_whitespace(b'/'));
        assert!(!is_whitespace(0));
    }

    #[test]
    fn test_scan_int() {
        assert_eq!(
            scan_int(b"123/4"),
            Scanned {
                value: 123,
                consumed: 3,
                digits: 3
            }
        );
        assert_eq!(scan_int(b"-7 ").value, -7);
        assert_eq!(scan_int(b"+42").value, 42);
    }

    #[test]
    fn test_scan_int_distinguishes_zero_from_nothing() {
        let zero = scan_int(b"0");
        assert!(zero.is_number());
        assert_eq!((zero.value, zero.consumed), (0, 1));

        let nothing = scan_int(b"abc");
        assert!(!nothing.is_number());
        assert_eq!(nothing.consumed, 0);

        let bare_sign = scan_int(b"- 1");
        assert!(!bare_sign.is_number());
        assert_eq!(bare_sign.consumed, 1);
    }

    #[test]
    fn test_scan_int_at_end_of_buffer() {
        let scanned = scan_int(b"");
        assert_eq!(scanned.consumed, 0);
        assert!(!scanned.is_number());

        // No trailing byte after the literal
        assert_eq!(scan_int(b"-15").value, -15);
    }

    #[test]
    fn test_scan_int_saturates() {
        let scanned = scan_int(b"99999999999999999999999");
        assert_eq!(scanned.value, i64::MAX);
        assert_eq!(scanned.digits, 23);
    }

    #[test]
    fn test_scan_float() {
        let scanned = scan_float(b"-0.184875 ");
        assert!((scanned.value + 0.184875).abs() < 1e-7);
        assert_eq!(scanned.consumed, 9);
        assert_eq!(scanned.digits, 7);

        assert_eq!(scan_float(b"2").value, 2.0);
        assert_eq!(scan_float(b"+1.5").value, 1.5);
        assert_eq!(scan_float(b".25").value, 0.25);
        assert_eq!(scan_float(b"3.").value, 3.0);
    }

    #[test]
    fn test_scan_float_stops_at_exponent() {
        let scanned = scan_float(b"1.5e3");
        assert_eq!(scanned.value, 1.5);
        assert_eq!(scanned.consumed, 3);
    }

    #[test]
    fn test_scan_float_nothing() {
        let scanned = scan_float(b"x");
        assert!(!scanned.is_number());
        assert_eq!(scanned.value, 0.0);
    }

    #[test]
    fn test_cursor_is_bounds_checked() {
        let mut cursor = Cursor::new(b"  12");
        cursor.skip_whitespace();
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.scan_int().value, 12);
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);

        // Scanning past the end yields nothing rather than reading out of bounds
        assert!(!cursor.scan_int().is_number());
        cursor.advance(10);
        assert!(cursor.is_eof());
        assert!(cursor.remaining().is_empty());
    }

    #[test]
    fn test_cursor_skip_token() {
        let mut cursor = Cursor::new(b"3/1/2 4");
        assert_eq!(cursor.scan_int().value, 3);
        cursor.skip_token();
        cursor.skip_whitespace();
        assert!(cursor.starts_with(b"4"));
    }
}
