//! Static value-formatting dispatch
//!
//! [`LogValue`] is the closed capability set of loggable types. Dispatch
//! is resolved at compile time; passing an unsupported type is a compile
//! error, never a runtime failure. Supporting a new type means
//! implementing `LogValue` for it.

use super::buffer::{Buffer, WriteGuard};
use super::number::{append_f64, append_i64, append_u64, MAX_PRECISION};
use super::string::{append_quoted, append_str};
use super::timestamp::append_timestamp;
use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// A value that can be appended to a record as JSON.
pub trait LogValue {
    fn append_to(&self, buf: &mut Buffer);
}

impl<V: LogValue + ?Sized> LogValue for &V {
    fn append_to(&self, buf: &mut Buffer) {
        (**self).append_to(buf);
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(impl LogValue for $t {
            fn append_to(&self, buf: &mut Buffer) {
                append_i64(buf, i64::from(*self));
            }
        })*
    };
}

impl_signed!(i8, i16, i32, i64);

impl LogValue for isize {
    fn append_to(&self, buf: &mut Buffer) {
        append_i64(buf, *self as i64);
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(impl LogValue for $t {
            fn append_to(&self, buf: &mut Buffer) {
                append_u64(buf, u64::from(*self));
            }
        })*
    };
}

impl_unsigned!(u8, u16, u32, u64);

impl LogValue for usize {
    fn append_to(&self, buf: &mut Buffer) {
        append_u64(buf, *self as u64);
    }
}

impl LogValue for bool {
    fn append_to(&self, buf: &mut Buffer) {
        let mut g = WriteGuard::new(buf, 5);
        g.append(if *self { b"true" } else { b"false" });
    }
}

impl LogValue for f64 {
    fn append_to(&self, buf: &mut Buffer) {
        append_f64(buf, *self, MAX_PRECISION, true);
    }
}

impl LogValue for f32 {
    fn append_to(&self, buf: &mut Buffer) {
        append_f64(buf, f64::from(*self), MAX_PRECISION, true);
    }
}

impl LogValue for char {
    fn append_to(&self, buf: &mut Buffer) {
        let mut utf8 = [0u8; 4];
        append_quoted(buf, self.encode_utf8(&mut utf8).as_bytes());
    }
}

impl LogValue for str {
    fn append_to(&self, buf: &mut Buffer) {
        append_str(buf, self);
    }
}

impl LogValue for String {
    fn append_to(&self, buf: &mut Buffer) {
        append_str(buf, self);
    }
}

impl<V: LogValue> LogValue for Option<V> {
    fn append_to(&self, buf: &mut Buffer) {
        match self {
            Some(v) => v.append_to(buf),
            None => buf.append(b"null"),
        }
    }
}

impl LogValue for SystemTime {
    fn append_to(&self, buf: &mut Buffer) {
        let nanos = self
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        append_timestamp(buf, nanos);
    }
}

impl LogValue for DateTime<Utc> {
    fn append_to(&self, buf: &mut Buffer) {
        let nanos = self.timestamp_nanos_opt().unwrap_or_default().max(0) as u64;
        append_timestamp(buf, nanos);
    }
}

/// Pre-escaped JSON fragment, copied verbatim except that newline bytes
/// are stripped to keep the record on a single line. No escaping and no
/// validation; the caller guarantees valid JSON.
pub struct RawJson<T>(pub T);

impl<T: AsRef<[u8]>> LogValue for RawJson<T> {
    fn append_to(&self, buf: &mut Buffer) {
        let raw = self.0.as_ref();
        let mut g = WriteGuard::new(buf, raw.len());
        let scratch = g.scratch();
        let mut dst = 0;
        for &b in raw {
            if b != b'\n' {
                scratch[dst] = b;
                dst += 1;
            }
        }
        g.consume(dst);
    }
}
