//! Growable output buffer with a reserve/commit write protocol
//!
//! Writers obtain a [`WriteGuard`], reserve worst-case space up front,
//! write variable-length content directly into the reserved region, then
//! commit only the bytes actually used. Dropping the guard returns any
//! reservation the writer never consumed, so capacity is not promised
//! away permanently.

/// Owned byte buffer tracking committed content and outstanding
/// reservations separately.
///
/// Invariant: `len <= reserved <= capacity`. `len` is the logical end of
/// committed content; `reserved` additionally counts bytes promised to a
/// live [`WriteGuard`].
pub struct Buffer {
    data: Box<[u8]>,
    len: usize,
    reserved: usize,
}

impl Buffer {
    /// Create an empty buffer with no backing storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Box::new([]),
            len: 0,
            reserved: 0,
        }
    }

    /// Committed content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Committed length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the last `n` committed bytes.
    pub fn shrink(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.len -= n;
        self.reserved -= n;
    }

    /// Reserve, write, and commit in one call for known-length content.
    pub fn append(&mut self, bytes: &[u8]) {
        WriteGuard::new(self, bytes.len()).append(bytes);
    }

    /// Deep copy of the committed bytes only, sized exactly to fit.
    /// Outstanding reservations are not carried over.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let data: Box<[u8]> = self.as_bytes().into();
        Self {
            len: data.len(),
            reserved: data.len(),
            data,
        }
    }

    /// Grow backing storage to at least `2 × reserved`, preserving
    /// committed content.
    fn grow(&mut self) {
        let new_cap = self.reserved * 2;
        let mut data = vec![0u8; new_cap].into_boxed_slice();
        data[..self.len].copy_from_slice(&self.data[..self.len]);
        self.data = data;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive write cursor over a [`Buffer`].
///
/// Holds the buffer mutably for its whole lifetime, so there can only be
/// one live writer. Tracks the bytes this guard reserved but has not yet
/// committed; on drop, that amount is handed back to the buffer without
/// touching committed content.
pub struct WriteGuard<'a> {
    buf: &'a mut Buffer,
    pending: usize,
}

impl<'a> WriteGuard<'a> {
    /// Open a guard with an initial reservation of `n` bytes.
    pub fn new(buf: &'a mut Buffer, n: usize) -> Self {
        let mut guard = Self { buf, pending: 0 };
        guard.reserve(n);
        guard
    }

    /// Bytes reserved by this guard and not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending
    }

    /// Guarantee `n` more writable bytes past the committed end, growing
    /// the buffer if its capacity is insufficient.
    pub fn reserve(&mut self, n: usize) {
        self.pending += n;
        self.buf.reserved += n;
        if self.buf.reserved > self.buf.data.len() {
            self.buf.grow();
        }
    }

    /// Writable view of this guard's reserved region. Valid until the
    /// next `reserve` or `consume`.
    pub fn scratch(&mut self) -> &mut [u8] {
        let start = self.buf.len;
        &mut self.buf.data[start..start + self.pending]
    }

    /// Commit `n` bytes previously written into `scratch`.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.pending);
        self.buf.len += n;
        self.pending -= n;
    }

    /// Write one byte and commit it.
    pub fn push(&mut self, b: u8) {
        debug_assert!(self.pending >= 1);
        self.buf.data[self.buf.len] = b;
        self.buf.len += 1;
        self.pending -= 1;
    }

    /// Write `bytes` and commit them.
    pub fn append(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.pending);
        let start = self.buf.len;
        self.buf.data[start..start + bytes.len()].copy_from_slice(bytes);
        self.buf.len += bytes.len();
        self.pending -= bytes.len();
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        // Unused reservation goes back; committed bytes stay.
        self.buf.reserved -= self.pending;
    }
}
