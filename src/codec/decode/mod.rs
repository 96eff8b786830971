//! Type-directed decoding on top of [`Cursor`].
//!
//! Short reads never return an error: they latch the sticky [`Status`] and
//! every later extraction becomes a no-op, so a record can be decoded field by
//! field and checked once at the end. Hard errors (`Err`) are reserved for
//! size-limit violations in strict mode and for extension-level failures.

pub mod basic;
pub mod cursor;

use bytes::Bytes;
use log::{debug, warn};

use crate::codec::scalar::{decode_scalar, Scalar};
use crate::codec::types::{Kind, Value};
use crate::codec::Unpack;
use crate::internal::config::{DecodeMode, StreamConfig};
use crate::internal::error::{Error, Result};

pub use cursor::{Cursor, Status};

/// Decoder state saved by `start_transaction`.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    status: Status,
    offset: usize,
    expected_size: Option<u32>,
}

/// Binary input stream.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
    config: StreamConfig,
    transactions: Vec<Checkpoint>,
    expected_size: Option<u32>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over the whole slice with the default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::from_cursor(Cursor::new(data), StreamConfig::default())
    }

    pub fn with_config(data: &'a [u8], config: StreamConfig) -> Self {
        Self::from_cursor(Cursor::new(data), config)
    }

    /// Creates a decoder over `data[begin..end]`.
    ///
    /// Fails with `InvalidArgumentError` when `begin > end` or `end` lies past the slice.
    pub fn from_range(data: &'a [u8], begin: usize, end: usize) -> Result<Self> {
        Ok(Self::from_cursor(Cursor::from_range(data, begin, end)?, StreamConfig::default()))
    }

    /// Creates a decoder over `size` bytes starting at `begin`.
    pub fn from_size(data: &'a [u8], begin: usize, size: usize) -> Result<Self> {
        Ok(Self::from_cursor(Cursor::from_size(data, begin, size)?, StreamConfig::default()))
    }

    pub fn from_cursor(cursor: Cursor<'a>, config: StreamConfig) -> Self {
        Decoder { cursor, config, transactions: Vec::new(), expected_size: None }
    }

    /// Replaces the configuration.
    pub fn configure(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    pub fn available(&self) -> u32 {
        self.cursor.available()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    pub fn is_good(&self) -> bool {
        self.cursor.is_good()
    }

    /// True while there is data left and nothing has failed.
    pub fn ok(&self) -> bool {
        !self.is_exhausted() && self.is_good()
    }

    pub fn status(&self) -> Status {
        self.cursor.status()
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.cursor.remaining()
    }

    /// Skips `n` bytes. Latches `OutOfBound` without moving if fewer remain.
    pub fn skip(&mut self, n: usize) -> &mut Self {
        self.cursor.skip(n);
        self
    }

    /// Latches `Corrupted`. Meant for extensions that detect impossible data.
    pub fn mark_corrupted(&mut self) {
        self.cursor.fail(Status::Corrupted);
    }

    /// Rewinds to `position` (as returned by [`Decoder::position`]) and
    /// latches `Corrupted`.
    ///
    /// Used by extensions that read a value successfully but find it invalid.
    pub fn reject_since(&mut self, position: usize) {
        let current = self.position();
        if position <= current {
            let offset = self.cursor.offset() - (current - position);
            self.rewind(offset);
        }
        self.mark_corrupted();
    }

    /// Reads one fixed-width value in the configured byte order.
    pub fn read_scalar<T: Scalar>(&mut self) -> Option<T> {
        let endian = self.config.endian;
        self.cursor.take(T::SIZE).map(|raw| decode_scalar(raw, endian))
    }

    /// Reads exactly `n` raw bytes.
    pub fn read_span(&mut self, n: usize) -> Option<&'a [u8]> {
        self.cursor.take(n)
    }

    /// Declares the size of the next variable-length field.
    ///
    /// The next prefixed read consumes the hint instead of a length prefix.
    /// An extract skipped because the stream already failed drops it too.
    pub fn expect_size(&mut self, size: u32) -> &mut Self {
        self.expected_size = Some(size);
        self
    }

    /// Length of the next variable-length field: the hint if one was set,
    /// otherwise a u32 prefix from the stream.
    pub fn read_length(&mut self) -> Option<usize> {
        let hint = self.expected_size.take();
        if !self.is_good() {
            return None;
        }
        match hint {
            Some(size) => Some(size as usize),
            None => self.read_scalar::<u32>().map(|len| len as usize),
        }
    }

    /// Reads a length-prefixed span (or a span of the hinted size).
    ///
    /// Nothing is consumed when the body is truncated.
    pub fn read_prefixed(&mut self) -> Option<&'a [u8]> {
        let mark = self.cursor.offset();
        let len = self.read_length()?;
        match self.cursor.take(len) {
            Some(span) => Some(span),
            None => {
                self.rewind(mark);
                None
            }
        }
    }

    /// Decodes one value of the given kind.
    pub fn read_value(&mut self, kind: Kind) -> Option<Value> {
        match kind {
            Kind::Bool => self.read_scalar::<u8>().map(|b| Value::Bool(b != 0)),
            Kind::U8 => self.read_scalar().map(Value::U8),
            Kind::I8 => self.read_scalar().map(Value::I8),
            Kind::U16 => self.read_scalar().map(Value::U16),
            Kind::I16 => self.read_scalar().map(Value::I16),
            Kind::U32 => self.read_scalar().map(Value::U32),
            Kind::I32 => self.read_scalar().map(Value::I32),
            Kind::U64 => self.read_scalar().map(Value::U64),
            Kind::I64 => self.read_scalar().map(Value::I64),
            Kind::U128 => self.read_scalar().map(Value::U128),
            Kind::I128 => self.read_scalar().map(Value::I128),
            Kind::F32 => self.read_scalar().map(Value::F32),
            Kind::F64 => self.read_scalar().map(Value::F64),
            Kind::Fixed(n) => self
                .read_span(n)
                .map(|span| Value::Fixed(Bytes::copy_from_slice(span))),
            Kind::Prefixed => self
                .read_prefixed()
                .map(|span| Value::Prefixed(Bytes::copy_from_slice(span))),
        }
    }

    /// Decodes into `dst`. A no-op when the status is not `Good`.
    ///
    /// `dst` is left untouched unless the whole value was read.
    pub fn extract<T: Unpack + ?Sized>(&mut self, dst: &mut T) -> Result<&mut Self> {
        if self.is_good() {
            dst.unpack_from(self)?;
        } else {
            self.expected_size = None;
        }
        Ok(self)
    }

    /// Decodes a value of type `T`, or `None` if the stream failed.
    pub fn get<T: Unpack + Default>(&mut self) -> Result<Option<T>> {
        if !self.is_good() {
            self.expected_size = None;
            return Ok(None);
        }
        let mut value = T::default();
        value.unpack_from(self)?;
        Ok(self.is_good().then_some(value))
    }

    /// Decodes a variable-length value whose size is known from elsewhere.
    pub fn extract_sized<T: Unpack + ?Sized>(&mut self, dst: &mut T, size: u32) -> Result<&mut Self> {
        self.expect_size(size);
        let outcome = self.extract(dst).map(|_| ());
        self.expected_size = None;
        outcome?;
        Ok(self)
    }

    /// Decodes a length-prefixed field into a fixed-capacity buffer.
    ///
    /// Returns the number of bytes written. When the declared length exceeds
    /// `dst.len()` nothing is consumed and, depending on the mode, either
    /// `Error::SizeLimitError` is returned (strict) or `OutOfBound` is latched (lenient).
    pub fn extract_prefixed_into(&mut self, dst: &mut [u8]) -> Result<usize> {
        let mark = self.cursor.offset();
        let Some(len) = self.read_length() else {
            return Ok(0);
        };
        if len > dst.len() {
            self.rewind(mark);
            return match self.config.mode {
                DecodeMode::Strict => Err(Error::size_limit(len, dst.len())),
                DecodeMode::Lenient => {
                    self.cursor.fail(Status::OutOfBound);
                    Ok(0)
                }
            };
        }
        match self.cursor.take(len) {
            Some(span) => {
                dst[..len].copy_from_slice(span);
                Ok(len)
            }
            None => {
                self.rewind(mark);
                Ok(0)
            }
        }
    }

    /// Decodes a u32 element count followed by that many elements.
    ///
    /// On failure nothing is consumed and `dst` is untouched.
    pub fn extract_seq<T: Unpack + Default>(&mut self, dst: &mut Vec<T>) -> Result<&mut Self> {
        let mark = self.cursor.offset();
        let Some(count) = self.read_length() else {
            return Ok(self);
        };
        // the count comes off the wire, so it only bounds the loop
        let mut items = Vec::with_capacity(count.min(self.cursor.remaining_len()));
        for _ in 0..count {
            let mut item = T::default();
            if let Err(e) = item.unpack_from(self) {
                self.rewind(mark);
                return Err(e);
            }
            if !self.is_good() {
                self.rewind(mark);
                return Ok(self);
            }
            items.push(item);
        }
        *dst = items;
        Ok(self)
    }

    /// Saves the current `(status, position)` pair.
    pub fn start_transaction(&mut self) {
        self.transactions.push(Checkpoint {
            status: self.cursor.status(),
            offset: self.cursor.offset(),
            expected_size: self.expected_size,
        });
    }

    /// Closes the innermost transaction.
    ///
    /// Keeps the progress and returns `true` if the status is still `Good`;
    /// otherwise restores the saved state (status, position and size hint)
    /// and returns `false`.
    pub fn commit_transaction(&mut self) -> bool {
        let Some(checkpoint) = self.transactions.pop() else {
            warn!("commit_transaction without a matching start_transaction");
            return self.is_good();
        };
        if self.is_good() {
            return true;
        }
        debug!(
            "rolling back transaction: {:?} at {} -> {:?} at {}",
            self.cursor.status(),
            self.cursor.offset(),
            checkpoint.status,
            checkpoint.offset
        );
        self.roll_back(checkpoint);
        false
    }

    /// Number of open transactions.
    pub fn transaction_depth(&self) -> usize {
        self.transactions.len()
    }

    /// Runs `f` inside a transaction.
    ///
    /// Returns `Ok(false)` after a rollback; an `Err` from `f` also rolls back
    /// and is passed through.
    pub fn transaction<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start_transaction();
        match f(self) {
            Ok(()) => Ok(self.commit_transaction()),
            Err(e) => {
                if let Some(checkpoint) = self.transactions.pop() {
                    self.roll_back(checkpoint);
                }
                Err(e)
            }
        }
    }

    /// Decodes a composite value all-or-nothing.
    ///
    /// Like [`Decoder::transaction`], a failure inside `f` puts the position
    /// back where it was, but the failure status stays latched so that
    /// batch-style callers still see it. Returns whether `f` succeeded.
    pub fn atomic<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start_transaction();
        if let Err(e) = f(self) {
            if let Some(checkpoint) = self.transactions.pop() {
                self.roll_back(checkpoint);
            }
            return Err(e);
        }
        let status = self.cursor.status();
        let committed = self.commit_transaction();
        if !committed {
            self.cursor.fail(status);
        }
        Ok(committed)
    }

    fn roll_back(&mut self, checkpoint: Checkpoint) {
        self.cursor.restore(checkpoint.status, checkpoint.offset);
        self.expected_size = checkpoint.expected_size;
    }

    /// Moves the read position back to `offset` keeping the current status.
    pub(crate) fn rewind(&mut self, offset: usize) {
        let status = self.cursor.status();
        self.cursor.restore(status, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::endian::Endian;

    #[test]
    fn test_read_scalars_in_both_orders() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut big = Decoder::with_config(&data, StreamConfig::big());
        assert_eq!(big.read_scalar::<u16>(), Some(0x0102));
        assert_eq!(big.read_scalar::<u16>(), Some(0x0304));

        let mut little = Decoder::with_config(&data, StreamConfig::new(Endian::Little));
        assert_eq!(little.read_scalar::<u32>(), Some(0x0403_0201));
        assert!(little.is_exhausted());
        assert!(!little.ok());
    }

    #[test]
    fn test_short_read_latches() {
        let data = [0xaa, 0xbb, 0xcc];
        let mut dec = Decoder::new(&data);
        assert_eq!(dec.read_scalar::<u32>(), None);
        assert_eq!(dec.status(), Status::OutOfBound);
        assert_eq!(dec.position(), 0);
        assert_eq!(dec.read_scalar::<u8>(), None);
        assert_eq!(dec.available(), 3);
    }

    #[test]
    fn test_read_value_dispatch() {
        let data = [0x01, 0xff, 0x00, 0x00, 0x00, 0x02, b'h', b'i', 0x7f];
        let mut dec = Decoder::new(&data);
        assert_eq!(dec.read_value(Kind::Bool), Some(Value::Bool(true)));
        assert_eq!(dec.read_value(Kind::I8), Some(Value::I8(-1)));
        assert_eq!(
            dec.read_value(Kind::Prefixed),
            Some(Value::Prefixed(Bytes::from_static(b"hi")))
        );
        assert_eq!(dec.read_value(Kind::Fixed(1)), Some(Value::Fixed(Bytes::from_static(&[0x7f]))));
        assert!(dec.is_exhausted());
        assert!(dec.is_good());
    }

    #[test]
    fn test_truncated_prefixed_consumes_nothing() {
        // declares 5 bytes, carries 2
        let data = [0x00, 0x00, 0x00, 0x05, b'a', b'b'];
        let mut dec = Decoder::new(&data);
        assert_eq!(dec.read_prefixed(), None);
        assert_eq!(dec.status(), Status::OutOfBound);
        assert_eq!(dec.position(), 0);
    }

    #[test]
    fn test_expected_size_is_one_shot() {
        let data = b"abcd\x00\x00\x00\x01z";
        let mut dec = Decoder::new(data);
        dec.expect_size(4);
        assert_eq!(dec.read_prefixed(), Some(&b"abcd"[..]));
        assert_eq!(dec.read_prefixed(), Some(&b"z"[..]));
        assert!(dec.is_exhausted());
    }

    #[test]
    fn test_extract_prefixed_into_strict() {
        let data = [0x00, 0x00, 0x00, 0x04, 1, 2, 3, 4];
        let mut small = [0u8; 2];
        let mut dec = Decoder::new(&data);
        let err = dec.extract_prefixed_into(&mut small).unwrap_err();
        assert!(matches!(err, Error::SizeLimitError { declared: 4, capacity: 2 }));
        assert!(dec.is_good());
        assert_eq!(dec.position(), 0);

        let mut large = [0u8; 8];
        assert_eq!(dec.extract_prefixed_into(&mut large).unwrap(), 4);
        assert_eq!(&large[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_extract_prefixed_into_lenient() {
        let data = [0x00, 0x00, 0x00, 0x04, 1, 2, 3, 4];
        let mut small = [0u8; 2];
        let config = StreamConfig::default().with_mode(DecodeMode::Lenient);
        let mut dec = Decoder::with_config(&data, config);
        assert_eq!(dec.extract_prefixed_into(&mut small).unwrap(), 0);
        assert_eq!(dec.status(), Status::OutOfBound);
        assert_eq!(dec.position(), 0);
        assert_eq!(small, [0, 0]);
    }

    #[test]
    fn test_transaction_rollback_and_commit() {
        let data = [0x00, 0x01, 0x00];
        let mut dec = Decoder::new(&data);

        dec.start_transaction();
        assert_eq!(dec.read_scalar::<u16>(), Some(1));
        assert_eq!(dec.read_scalar::<u16>(), None);
        assert!(!dec.commit_transaction());
        assert!(dec.is_good());
        assert_eq!(dec.position(), 0);

        dec.start_transaction();
        assert_eq!(dec.read_scalar::<u16>(), Some(1));
        assert!(dec.commit_transaction());
        assert_eq!(dec.position(), 2);
        assert_eq!(dec.transaction_depth(), 0);
    }

    #[test]
    fn test_nested_transactions() {
        let data = [1u8, 2, 3];
        let mut dec = Decoder::new(&data);
        dec.start_transaction();
        dec.skip(1);
        dec.start_transaction();
        dec.skip(5);
        assert!(!dec.commit_transaction());
        assert_eq!(dec.position(), 1);
        assert!(dec.commit_transaction());
        assert_eq!(dec.position(), 1);
    }

    #[test]
    fn test_unmatched_commit_is_harmless() {
        let mut dec = Decoder::new(&[]);
        assert!(dec.commit_transaction());
        dec.skip(1);
        assert!(!dec.commit_transaction());
        assert_eq!(dec.status(), Status::OutOfBound);
    }

    #[test]
    fn test_transaction_closure() {
        let data = [0u8, 1, 2, 3];
        let mut dec = Decoder::new(&data);
        let committed = dec
            .transaction(|d| {
                d.skip(2).skip(4);
                Ok(())
            })
            .unwrap();
        assert!(!committed);
        assert_eq!(dec.position(), 0);

        let err = dec.transaction(|d| {
            d.skip(1);
            Err(Error::CodecError("rejected".to_string()))
        });
        assert!(err.is_err());
        assert_eq!(dec.position(), 0);
        assert_eq!(dec.transaction_depth(), 0);
    }

    #[test]
    fn test_from_range_rejects_reversed_bounds() {
        let data = [0u8; 4];
        assert!(matches!(Decoder::from_range(&data, 3, 1), Err(Error::InvalidArgumentError(_))));
        let dec = Decoder::from_size(&data, 1, 2).unwrap();
        assert_eq!(dec.available(), 2);
    }

    #[test]
    fn test_atomic_keeps_failure_status() {
        let data = [0u8, 1, 2];
        let mut dec = Decoder::new(&data);
        let done = dec
            .atomic(|d| {
                d.skip(2).skip(2);
                Ok(())
            })
            .unwrap();
        assert!(!done);
        assert_eq!(dec.position(), 0);
        assert_eq!(dec.status(), Status::OutOfBound);
        assert_eq!(dec.transaction_depth(), 0);
    }

    #[test]
    fn test_reject_since() {
        let mut dec = Decoder::new(&[1, 2, 3, 4]);
        dec.skip(1);
        let start = dec.position();
        dec.skip(2);
        dec.reject_since(start);
        assert_eq!(dec.status(), Status::Corrupted);
        assert_eq!(dec.position(), 1);
    }

    #[test]
    fn test_rollback_discards_hint_set_inside_transaction() {
        let data = b"\x00\x00\x00\x02Hi";
        let mut dec = Decoder::new(data);
        dec.start_transaction();
        dec.skip(100);
        dec.expect_size(1);
        let mut text = String::new();
        dec.extract(&mut text).unwrap();
        assert!(!dec.commit_transaction());

        dec.extract(&mut text).unwrap();
        assert_eq!(text, "Hi");
        assert!(dec.is_good());
        assert!(dec.is_exhausted());
    }

    #[test]
    fn test_rollback_restores_pending_hint() {
        let data = b"abcd";
        let mut dec = Decoder::new(data);
        dec.expect_size(3);
        dec.start_transaction();
        assert_eq!(dec.read_prefixed(), Some(&b"abc"[..]));
        dec.skip(5);
        assert!(!dec.commit_transaction());
        assert_eq!(dec.position(), 0);
        assert_eq!(dec.read_prefixed(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_mark_corrupted() {
        let mut dec = Decoder::new(&[1, 2]);
        dec.mark_corrupted();
        assert_eq!(dec.status(), Status::Corrupted);
        assert_eq!(dec.read_scalar::<u8>(), None);
    }
}
