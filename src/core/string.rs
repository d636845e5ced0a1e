//! JSON string escaping
//!
//! Table-driven escaper producing quoted JSON strings. A 256-entry flag
//! table classifies each byte as pass-through or as an index into the
//! escape-sequence table, so the common unescaped byte costs one lookup
//! and one store.

use super::buffer::{Buffer, WriteGuard};

/// Escape sequences, indexed by the non-zero entries of `ESCAPE_FLAG`.
/// Control bytes get `\uXXXX` except the five short forms; `"` and `\`
/// get backslash escapes.
static ESCAPE_TABLE: [&[u8]; 35] = [
    b"",
    b"\\u0000", b"\\u0001", b"\\u0002", b"\\u0003", b"\\u0004", b"\\u0005", b"\\u0006",
    b"\\u0007", b"\\b", b"\\t", b"\\n", b"\\u000B", b"\\f", b"\\r", b"\\u000E", b"\\u000F",
    b"\\u0010", b"\\u0011", b"\\u0012", b"\\u0013", b"\\u0014", b"\\u0015", b"\\u0016",
    b"\\u0017", b"\\u0018", b"\\u0019", b"\\u001A", b"\\u001B", b"\\u001C", b"\\u001D",
    b"\\u001E", b"\\u001F", b"\\\"", b"\\\\",
];

/// Zero means pass through; anything else indexes `ESCAPE_TABLE`.
static ESCAPE_FLAG: [u8; 256] = {
    let mut flags = [0u8; 256];
    let mut b = 0;
    while b < 0x20 {
        flags[b] = b as u8 + 1;
        b += 1;
    }
    flags[b'"' as usize] = 33;
    flags[b'\\' as usize] = 34;
    flags
};

/// Worst case is six output bytes per input byte (`\uXXXX`).
const MAX_ESCAPE_LEN: usize = 6;

/// Streaming block size; bounds peak over-reservation for long input.
const BLOCK: usize = 32;

/// Append `s` as a quoted JSON string in a single pass.
///
/// Reserves the worst case (`6 × len + 2`) once. An embedded `0x00` byte
/// ends the string early, matching the streaming entry point, where NUL
/// is the natural terminator; the two paths produce identical bytes for
/// matching content.
pub fn append_quoted(buf: &mut Buffer, s: &[u8]) {
    let mut g = WriteGuard::new(buf, s.len() * MAX_ESCAPE_LEN + 2);
    let scratch = g.scratch();
    scratch[0] = b'"';
    let mut dst = 1;
    for &c in s {
        if c == 0 {
            break;
        }
        let flag = ESCAPE_FLAG[c as usize];
        if flag != 0 {
            let esc = ESCAPE_TABLE[flag as usize];
            scratch[dst..dst + esc.len()].copy_from_slice(esc);
            dst += esc.len();
        } else {
            scratch[dst] = c;
            dst += 1;
        }
    }
    scratch[dst] = b'"';
    g.consume(dst + 1);
}

/// Append a byte stream of unknown length as a quoted JSON string.
///
/// Processes fixed-size blocks, topping the reservation back up after
/// each one, so arbitrarily long input never holds more than one block's
/// worth of over-reservation. A `0x00` byte terminates the stream.
pub fn append_quoted_streaming<I>(buf: &mut Buffer, bytes: I)
where
    I: IntoIterator<Item = u8>,
{
    let mut g = WriteGuard::new(buf, 2 + BLOCK * MAX_ESCAPE_LEN);
    g.push(b'"');
    let mut src = bytes.into_iter();
    let mut done = false;
    while !done {
        let scratch = g.scratch();
        let mut dst = 0;
        let mut i = 0;
        while i < BLOCK {
            let c = match src.next() {
                Some(0) | None => {
                    done = true;
                    break;
                }
                Some(c) => c,
            };
            let flag = ESCAPE_FLAG[c as usize];
            if flag != 0 {
                let esc = ESCAPE_TABLE[flag as usize];
                scratch[dst..dst + esc.len()].copy_from_slice(esc);
                dst += esc.len();
            } else {
                scratch[dst] = c;
                dst += 1;
            }
            i += 1;
        }
        g.consume(dst);
        g.reserve(dst);
    }
    g.push(b'"');
}

/// Quoted-and-escaped form of a UTF-8 string.
pub fn append_str(buf: &mut Buffer, s: &str) {
    append_quoted(buf, s.as_bytes());
}
