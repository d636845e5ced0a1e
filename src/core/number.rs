//! Decimal integer and fixed-precision float formatting
//!
//! Hand-rolled formatters writing straight into a [`Buffer`], avoiding
//! the allocation and trait machinery of `format!`. Integers are
//! rendered right-to-left two digits at a time from a digit-pair table;
//! floats round with precomputed half-ULP constants instead of repeated
//! multiplication.

use super::buffer::{Buffer, WriteGuard};

/// "00".."99" packed as byte pairs.
pub(crate) const DIGIT_PAIRS: &[u8; 200] =
    b"0001020304050607080910111213141516171819\
      2021222324252627282930313233343536373839\
      4041424344454647484950515253545556575859\
      6061626364656667686970717273747576777879\
      8081828384858687888990919293949596979899";

/// Maximum precision accepted by [`append_f64`].
pub const MAX_PRECISION: usize = 12;

const POW10: [f64; 13] = [
    1.0,
    10.0,
    100.0,
    1_000.0,
    10_000.0,
    100_000.0,
    1_000_000.0,
    10_000_000.0,
    100_000_000.0,
    1_000_000_000.0,
    10_000_000_000.0,
    100_000_000_000.0,
    1_000_000_000_000.0,
];

/// Half of one unit in the last place at each precision, used for
/// round-half-away-from-zero before truncation.
const HALF_ULP: [f64; 13] = [
    0.5,
    0.05,
    0.005,
    0.0005,
    0.000_05,
    0.000_005,
    0.000_000_5,
    0.000_000_05,
    0.000_000_005,
    0.000_000_000_5,
    0.000_000_000_05,
    0.000_000_000_005,
    0.000_000_000_000_5,
];

/// One representable unit at each precision.
const UNIT: [f64; 13] = [
    1.0,
    0.1,
    0.01,
    0.001,
    0.000_1,
    0.000_01,
    0.000_001,
    0.000_000_1,
    0.000_000_01,
    0.000_000_001,
    0.000_000_000_1,
    0.000_000_000_01,
    0.000_000_000_001,
];

/// Write the decimal form of `v` right-to-left into `scratch`, returning
/// the start index of the written digits (digits occupy
/// `scratch[start..]`).
///
/// When `negative` is set, `v` must be the two's-complement bit pattern
/// of the signed value; negation happens in unsigned arithmetic so the
/// full `i64` range, `i64::MIN` included, formats without overflow. Zero
/// formats as `"0"`.
pub fn write_decimal(scratch: &mut [u8], mut v: u64, negative: bool) -> usize {
    let mut pos = scratch.len();
    if negative {
        v = v.wrapping_neg();
    }
    while v >= 10 {
        let idx = ((v % 100) * 2) as usize;
        v /= 100;
        pos -= 1;
        scratch[pos] = DIGIT_PAIRS[idx + 1];
        pos -= 1;
        scratch[pos] = DIGIT_PAIRS[idx];
    }
    if v != 0 || pos == scratch.len() {
        pos -= 1;
        scratch[pos] = b'0' + v as u8;
    }
    if negative {
        pos -= 1;
        scratch[pos] = b'-';
    }
    pos
}

/// Append the decimal form of a signed 64-bit integer.
pub fn append_i64(buf: &mut Buffer, v: i64) {
    let mut scratch = [0u8; 24];
    let pos = write_decimal(&mut scratch, v as u64, v < 0);
    WriteGuard::new(buf, 24).append(&scratch[pos..]);
}

/// Append the decimal form of an unsigned 64-bit integer.
pub fn append_u64(buf: &mut Buffer, v: u64) {
    let mut scratch = [0u8; 24];
    let pos = write_decimal(&mut scratch, v, false);
    WriteGuard::new(buf, 24).append(&scratch[pos..]);
}

/// Fractional part for `0 <= v < 1`: multiply by 10^p, truncate,
/// left-pad with zeros to width `p`, optionally trim trailing zeros but
/// never below one digit.
fn append_fraction(g: &mut WriteGuard<'_>, v: f64, p: usize, trim: bool) {
    let frac = (v * POW10[p]) as u64;
    if frac == 0 && trim {
        g.push(b'0');
        return;
    }
    let scratch = g.scratch();
    let pos = write_decimal(&mut scratch[..p], frac, false);
    let mut width = p;
    if trim {
        while scratch[width - 1] == b'0' {
            width -= 1;
        }
    }
    for b in &mut scratch[..pos] {
        *b = b'0';
    }
    g.consume(width);
}

/// Append a finite float with `p` fractional digits (`0 <= p <= 12`).
///
/// NaN renders as the quoted sentinel `"-"`. `trim` strips trailing
/// fraction zeros, keeping at least one digit. The integer part of `v`
/// must fit in `i64`; that is a caller contract, not checked here.
pub fn append_f64(buf: &mut Buffer, v: f64, p: usize, trim: bool) {
    if v.is_nan() {
        WriteGuard::new(buf, 3).append(b"\"-\"");
        return;
    }
    let v = if v > 0.0 { v + HALF_ULP[p] } else { v - HALF_ULP[p] };
    let int_part = v as i64;
    if p == 0 {
        append_i64(buf, int_part);
        return;
    }
    if int_part == 0 && v <= -UNIT[p] {
        // Sign must survive rounding toward zero.
        let mut g = WriteGuard::new(buf, 24);
        g.append(b"-0.");
        append_fraction(&mut g, (v - int_part as f64).abs(), p, trim);
    } else {
        append_i64(buf, int_part);
        let mut g = WriteGuard::new(buf, 24);
        g.push(b'.');
        append_fraction(&mut g, (v - int_part as f64).abs(), p, trim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt_i64(v: i64) -> String {
        let mut buf = Buffer::new();
        append_i64(&mut buf, v);
        String::from_utf8(buf.as_bytes().to_vec()).unwrap()
    }

    fn fmt_u64(v: u64) -> String {
        let mut buf = Buffer::new();
        append_u64(&mut buf, v);
        String::from_utf8(buf.as_bytes().to_vec()).unwrap()
    }

    fn fmt_f64(v: f64, p: usize, trim: bool) -> String {
        let mut buf = Buffer::new();
        append_f64(&mut buf, v, p, trim);
        String::from_utf8(buf.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_integer_basics() {
        assert_eq!(fmt_i64(0), "0");
        assert_eq!(fmt_i64(7), "7");
        assert_eq!(fmt_i64(-7), "-7");
        assert_eq!(fmt_i64(42), "42");
        assert_eq!(fmt_i64(-100), "-100");
        assert_eq!(fmt_i64(1234567890), "1234567890");
    }

    #[test]
    fn test_integer_extremes() {
        assert_eq!(fmt_i64(i64::MAX), "9223372036854775807");
        assert_eq!(fmt_i64(i64::MIN), "-9223372036854775808");
        assert_eq!(fmt_u64(u64::MAX), "18446744073709551615");
        assert_eq!(fmt_u64(0), "0");
    }

    #[test]
    fn test_integer_matches_std() {
        for v in [
            1_i64, -1, 9, 10, 11, 99, 100, 101, 999, 1000, -999, -1000, 65535, -65536,
        ] {
            assert_eq!(fmt_i64(v), v.to_string());
        }
    }

    #[test]
    fn test_float_nan() {
        assert_eq!(fmt_f64(f64::NAN, 6, true), "\"-\"");
        assert_eq!(fmt_f64(f64::NAN, 0, false), "\"-\"");
    }

    #[test]
    fn test_float_precision_zero() {
        assert_eq!(fmt_f64(1.4, 0, false), "1");
        assert_eq!(fmt_f64(1.5, 0, false), "2");
        assert_eq!(fmt_f64(-1.5, 0, false), "-2");
        assert_eq!(fmt_f64(0.0, 0, false), "0");
    }

    #[test]
    fn test_float_padding_and_width() {
        assert_eq!(fmt_f64(1.005, 3, false), "1.005");
        assert_eq!(fmt_f64(1.05, 3, false), "1.050");
        assert_eq!(fmt_f64(2.0, 4, false), "2.0000");
        // Exactly p digits pre-trim.
        for p in 1..=MAX_PRECISION {
            let s = fmt_f64(3.25, p, false);
            let frac = s.split('.').nth(1).unwrap();
            assert_eq!(frac.len(), p, "precision {}: {}", p, s);
        }
    }

    #[test]
    fn test_float_trim() {
        assert_eq!(fmt_f64(2.0, 6, true), "2.0");
        assert_eq!(fmt_f64(2.5, 6, true), "2.5");
        assert_eq!(fmt_f64(2.500001, 6, true), "2.500001");
        assert_eq!(fmt_f64(-3.1400, 6, true), "-3.14");
    }

    #[test]
    fn test_float_rounding_half_away_from_zero() {
        assert_eq!(fmt_f64(0.125, 2, false), "0.13");
        assert_eq!(fmt_f64(-0.125, 2, false), "-0.13");
        assert_eq!(fmt_f64(1.9999, 3, false), "2.000");
    }

    #[test]
    fn test_float_negative_zero_crossing() {
        // Integer part rounds to zero but the value is a real negative.
        assert_eq!(fmt_f64(-0.5, 1, false), "-0.5");
        assert_eq!(fmt_f64(-0.25, 2, true), "-0.25");
        // Too small to represent at this precision: sign dropped.
        assert_eq!(fmt_f64(-0.004, 2, true), "0.0");
    }

    #[test]
    fn test_fraction_all_zero_with_trim() {
        assert_eq!(fmt_f64(5.0, 12, true), "5.0");
        assert_eq!(fmt_f64(-5.0, 12, true), "-5.0");
    }
}
