//! Fixed-point decoding of measurement fields.
//!
//! Values are decoded straight from the mapped bytes into tenths
//! (real value × 10) so accumulation never touches floating point and no
//! intermediate string is built.
//!
//! Two entry points share the same accepted grammar, `-?DIGITS(.DIGIT)?`:
//! - [`parse_tenths`] never fails. It stops at the first byte it does not
//!   expect and returns whatever it accumulated so far.
//! - [`parse_tenths_strict`] rejects anything outside the grammar.

use crate::errors::ValueError;

/// Decode a measurement into tenths, best effort.
///
/// Only the first fractional digit is used; extra fractional digits and any
/// stray bytes after the numeral are ignored. A field with no digits decodes
/// to `0`. Arithmetic wraps instead of panicking, so pathological digit runs
/// produce a meaningless value rather than a crash.
#[inline]
pub fn parse_tenths(field: &[u8]) -> i64 {
    let (negative, digits) = match field.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some(_) => (false, field),
        None => return 0,
    };

    let mut whole: i64 = 0;
    let mut tenths: i64 = 0;
    let mut i = 0;
    while i < digits.len() {
        match digits[i] {
            d @ b'0'..=b'9' => {
                whole = whole.wrapping_mul(10).wrapping_add((d - b'0') as i64);
                i += 1;
            }
            b'.' => {
                if let Some(d @ b'0'..=b'9') = digits.get(i + 1).copied() {
                    tenths = (d - b'0') as i64;
                }
                break;
            }
            _ => break,
        }
    }

    let out = whole.wrapping_mul(10).wrapping_add(tenths);
    if negative {
        out.wrapping_neg()
    } else {
        out
    }
}

/// Decode a measurement into tenths, rejecting malformed input.
///
/// A single trailing `\r` is tolerated so CRLF files parse in both modes.
/// `index` in [`ValueError::UnexpectedByte`] is relative to `field`.
pub fn parse_tenths_strict(field: &[u8]) -> Result<i64, ValueError> {
    let field = field.strip_suffix(b"\r").unwrap_or(field);
    let (negative, start) = match field.first() {
        Some(b'-') => (true, 1),
        Some(_) => (false, 0),
        None => return Err(ValueError::Empty),
    };

    let mut whole: i64 = 0;
    let mut int_digits = 0usize;
    let mut i = start;
    while let Some(&b) = field.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        whole = whole
            .checked_mul(10)
            .and_then(|w| w.checked_add((b - b'0') as i64))
            .ok_or(ValueError::Overflow)?;
        int_digits += 1;
        i += 1;
    }
    if int_digits == 0 {
        return match field.get(i) {
            Some(&byte) => Err(ValueError::UnexpectedByte { index: i, byte }),
            None => Err(ValueError::Empty),
        };
    }

    let mut tenths: i64 = 0;
    match field.get(i) {
        None => {}
        Some(b'.') => {
            match field.get(i + 1) {
                Some(&d) if d.is_ascii_digit() => tenths = (d - b'0') as i64,
                Some(&byte) => return Err(ValueError::UnexpectedByte { index: i + 1, byte }),
                None => return Err(ValueError::MissingFractionDigit),
            }
            match field.get(i + 2) {
                None => {}
                Some(d) if d.is_ascii_digit() => return Err(ValueError::TooManyFractionDigits),
                Some(&byte) => return Err(ValueError::UnexpectedByte { index: i + 2, byte }),
            }
        }
        Some(&byte) => return Err(ValueError::UnexpectedByte { index: i, byte }),
    }

    let out = whole
        .checked_mul(10)
        .and_then(|w| w.checked_add(tenths))
        .ok_or(ValueError::Overflow)?;
    Ok(if negative { -out } else { out })
}
