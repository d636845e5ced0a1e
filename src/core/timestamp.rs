//! Timestamp rendering with a per-thread second cache
//!
//! Renders epoch nanoseconds as `"YYYY-MM-DDTHH:MM:SS.NNNNNNNNN+08:00"`
//! (quoted, fixed UTC+8 offset, nanosecond precision) using an explicit
//! proleptic-Gregorian calendar computation, so no OS timezone lookup
//! happens on the logging path. The quoted prefix up to the decimal
//! point is cached per thread for the duration of the current calendar
//! second; within a cached second only the nanosecond digits and the
//! fixed offset suffix are re-rendered.

use super::buffer::{Buffer, WriteGuard};
use super::number::{write_decimal, DIGIT_PAIRS};
use std::cell::RefCell;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Fixed output offset, in hours east of UTC.
const TZ_OFFSET_HOURS: u64 = 8;

/// Cached quoted prefix `"YYYY-MM-DDTHH:MM:SS.` valid for one calendar
/// second, `[begin, end)` in epoch nanoseconds.
struct SecondCache {
    begin: u64,
    end: u64,
    prefix: [u8; 21],
}

thread_local! {
    static SECOND_CACHE: RefCell<SecondCache> = const {
        RefCell::new(SecondCache {
            begin: 0,
            end: 0,
            prefix: [0; 21],
        })
    };
}

impl SecondCache {
    /// Recompute the prefix for the second containing `nanos`.
    fn refresh(&mut self, nanos: u64) {
        self.begin = nanos - nanos % NANOS_PER_SEC;
        self.end = self.begin + NANOS_PER_SEC;

        let t = nanos / NANOS_PER_SEC;
        let second = t % 60;
        let t = t / 60;
        let minute = t % 60;
        let t = t / 60 + TZ_OFFSET_HOURS;
        let hour = t % 24;
        let days = t / 24;

        // Civil-from-days: shift the epoch from 1970-01-01 to 0000-03-01
        // so leap days land at the end of the cycle.
        // ref: https://howardhinnant.github.io/date_algorithms.html#civil_from_days
        let z = days + 719_468;
        let era = z / 146_097;
        let doe = z % 146_097; // [0, 146096]
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // [0, 399]
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
        let mp = (5 * doy + 2) / 153; // [0, 11]
        let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
        let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
        let year = y + u64::from(m <= 2);

        let p = &mut self.prefix;
        p[0] = b'"';
        write_decimal(&mut p[1..5], year, false);
        p[5] = b'-';
        p[6] = DIGIT_PAIRS[(m * 2) as usize];
        p[7] = DIGIT_PAIRS[(m * 2 + 1) as usize];
        p[8] = b'-';
        p[9] = DIGIT_PAIRS[(d * 2) as usize];
        p[10] = DIGIT_PAIRS[(d * 2 + 1) as usize];
        p[11] = b'T';
        p[12] = DIGIT_PAIRS[(hour * 2) as usize];
        p[13] = DIGIT_PAIRS[(hour * 2 + 1) as usize];
        p[14] = b':';
        p[15] = DIGIT_PAIRS[(minute * 2) as usize];
        p[16] = DIGIT_PAIRS[(minute * 2 + 1) as usize];
        p[17] = b':';
        p[18] = DIGIT_PAIRS[(second * 2) as usize];
        p[19] = DIGIT_PAIRS[(second * 2 + 1) as usize];
        p[20] = b'.';
    }
}

/// Append the quoted timestamp for `nanos` nanoseconds since the Unix
/// epoch.
pub fn append_timestamp(buf: &mut Buffer, nanos: u64) {
    SECOND_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if nanos < cache.begin || cache.end <= nanos {
            cache.refresh(nanos);
        }
        let mut g = WriteGuard::new(buf, 48);
        let scratch = g.scratch();
        scratch[..21].copy_from_slice(&cache.prefix);
        let pos = write_decimal(&mut scratch[21..30], nanos - cache.begin, false);
        for b in &mut scratch[21..21 + pos] {
            *b = b'0';
        }
        scratch[30..37].copy_from_slice(b"+08:00\"");
        g.consume(37);
    });
}
