use log::trace;

use crate::internal::error::{Error, Result};

/// Sticky decode status.
///
/// Once a cursor leaves `Good` it stays there; only a transaction rollback
/// can restore an earlier status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Good,
    /// A read needed more bytes than remained.
    OutOfBound,
    /// A higher-level check rejected the data.
    Corrupted,
}

/// A bounds-checked read cursor over a byte range.
///
/// `pos` only moves forward, never past `end`, and never moves at all once
/// the status is not `Good`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    start: usize,
    pos: usize,
    end: usize,
    status: Status,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over the whole slice.
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, start: 0, pos: 0, end: data.len(), status: Status::Good }
    }

    /// Creates a cursor over `data[begin..end]`.
    pub fn from_range(data: &'a [u8], begin: usize, end: usize) -> Result<Self> {
        if begin > end {
            return Err(Error::InvalidArgumentError(format!(
                "begin ({}) is past end ({})",
                begin, end
            )));
        }
        if end > data.len() {
            return Err(Error::InvalidArgumentError(format!(
                "end ({}) is past the buffer length ({})",
                end,
                data.len()
            )));
        }
        Ok(Cursor { data, start: begin, pos: begin, end, status: Status::Good })
    }

    /// Creates a cursor over `size` bytes starting at `begin`.
    pub fn from_size(data: &'a [u8], begin: usize, size: usize) -> Result<Self> {
        let end = begin.checked_add(size).ok_or_else(|| {
            Error::InvalidArgumentError(format!("begin ({}) + size ({}) overflows", begin, size))
        })?;
        Self::from_range(data, begin, end)
    }

    /// Bytes left between the read position and the end, saturated to `u32`.
    pub fn available(&self) -> u32 {
        u32::try_from(self.remaining_len()).unwrap_or(u32::MAX)
    }

    pub fn remaining_len(&self) -> usize {
        self.end - self.pos
    }

    /// The unread part of the range.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..self.end]
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.end
    }

    pub fn is_good(&self) -> bool {
        self.status == Status::Good
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Bytes consumed since construction.
    pub fn position(&self) -> usize {
        self.pos - self.start
    }

    /// Moves forward by `n` bytes, or latches `OutOfBound` without moving.
    pub fn skip(&mut self, n: usize) -> bool {
        self.take(n).is_some()
    }

    /// Consumes exactly `n` bytes.
    ///
    /// Returns `None` without consuming anything when the status is not
    /// `Good` or fewer than `n` bytes remain (the latter latches `OutOfBound`).
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if !self.is_good() {
            return None;
        }
        if n > self.remaining_len() {
            trace!(
                "cursor out of bound at {}: need {} bytes, {} available",
                self.position(),
                n,
                self.remaining_len()
            );
            self.status = Status::OutOfBound;
            return None;
        }
        let span = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(span)
    }

    /// Latches a failure status. Has no effect once the cursor already failed.
    pub fn fail(&mut self, status: Status) {
        if self.is_good() && status != Status::Good {
            trace!("cursor latched {:?} at {}", status, self.position());
            self.status = status;
        }
    }

    /// Absolute read offset into the backing slice.
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    /// Restores a previously observed `(status, offset)` pair.
    pub(crate) fn restore(&mut self, status: Status, offset: usize) {
        debug_assert!(offset >= self.start && offset <= self.end);
        self.status = status;
        self.pos = offset;
    }
}
