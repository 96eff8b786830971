use crate::codec::encode::Output;
use crate::internal::config::StreamConfig;
use crate::internal::error::{Error, Result};

/// Binary output stream writing into a caller-owned buffer.
///
/// Bytes are written starting at the offset given at construction: existing
/// bytes at that position are overwritten and the buffer is extended past
/// its end. Ownership stays with the caller, so there is no `take`.
///
/// Overwritten bytes are remembered so that a failed `insert` can restore the
/// caller's buffer exactly.
#[derive(Debug)]
pub struct BorrowedEncoder<'a> {
    buf: &'a mut Vec<u8>,
    start: usize,
    offset: usize,
    original_len: usize,
    /// Caller bytes in `start..min(offset, original_len)` before we wrote over them.
    overwritten: Vec<u8>,
    config: StreamConfig,
}

impl<'a> BorrowedEncoder<'a> {
    /// Fails with `InvalidArgumentError` if `offset` lies past the end of `buf`.
    pub fn new(buf: &'a mut Vec<u8>, offset: usize, config: StreamConfig) -> Result<Self> {
        if offset > buf.len() {
            return Err(Error::InvalidArgumentError(format!(
                "start offset ({}) is past the buffer length ({})",
                offset,
                buf.len()
            )));
        }
        let original_len = buf.len();
        Ok(BorrowedEncoder { buf, start: offset, offset, original_len, overwritten: Vec::new(), config })
    }

    /// Appends at the current end of `buf`.
    pub fn appending(buf: &'a mut Vec<u8>, config: StreamConfig) -> Self {
        let offset = buf.len();
        BorrowedEncoder { buf, start: offset, offset, original_len: offset, overwritten: Vec::new(), config }
    }

    /// Bytes written through this encoder.
    pub fn written(&self) -> usize {
        self.offset - self.start
    }
}

impl Output for BorrowedEncoder<'_> {
    fn config(&self) -> StreamConfig {
        self.config
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        let overlap = (self.buf.len() - self.offset).min(bytes.len());
        let target = self.offset..self.offset + overlap;
        self.overwritten.extend_from_slice(&self.buf[target.clone()]);
        self.buf[target].copy_from_slice(&bytes[..overlap]);
        self.buf.extend_from_slice(&bytes[overlap..]);
        self.offset += bytes.len();
    }

    fn truncate_to(&mut self, offset: usize) {
        let offset = offset.max(self.start);
        if offset >= self.offset {
            return;
        }
        let restore_end = self.offset.min(self.original_len);
        if offset < restore_end {
            let saved = &self.overwritten[offset - self.start..restore_end - self.start];
            self.buf[offset..restore_end].copy_from_slice(saved);
        }
        self.overwritten.truncate(offset.min(self.original_len) - self.start);
        self.buf.truncate(offset.max(self.original_len));
        self.offset = offset;
    }
}
