// Encode module: binary output streams

pub mod basic;
pub mod borrowed;

use bytes::{BufMut, Bytes};

use crate::codec::scalar::{encode_scalar, Scalar};
use crate::codec::types::Value;
use crate::codec::Pack;
use crate::internal::config::StreamConfig;
use crate::internal::error::{Error, Result};

pub use borrowed::BorrowedEncoder;

/// Common interface of the owning [`Encoder`] and the [`BorrowedEncoder`].
///
/// Every write appends exactly the serialized length of the value and moves
/// `offset()` forward by the same amount. A failed `insert` or `put_seq`
/// leaves the output as it was before the call.
pub trait Output {
    fn config(&self) -> StreamConfig;

    /// Where the next byte will be written.
    fn offset(&self) -> usize;

    /// Writes raw bytes at `offset()`.
    fn put_slice(&mut self, bytes: &[u8]);

    /// Discards everything written at or after `offset`, which must be a
    /// value previously returned by `offset()`.
    fn truncate_to(&mut self, offset: usize);

    /// Writes a raw span verbatim (no length prefix).
    fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self
    where
        Self: Sized,
    {
        self.put_slice(bytes);
        self
    }

    /// Writes one fixed-width value in the configured byte order.
    fn put_scalar<T: Scalar>(&mut self, value: T) -> &mut Self
    where
        Self: Sized,
    {
        let (scratch, len) = encode_scalar(value, self.config().endian);
        self.put_slice(&scratch[..len]);
        self
    }

    /// Writes a u32 length followed by the bytes.
    fn put_prefixed(&mut self, bytes: &[u8]) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let len = u32::try_from(bytes.len())
            .map_err(|_| Error::size_limit(bytes.len(), u32::MAX as usize))?;
        self.put_scalar(len);
        self.put_slice(bytes);
        Ok(self)
    }

    /// Writes a u32 element count followed by each element.
    fn put_seq<T: Pack>(&mut self, items: &[T]) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let count = u32::try_from(items.len())
            .map_err(|_| Error::size_limit(items.len(), u32::MAX as usize))?;
        let mark = self.offset();
        self.put_scalar(count);
        for item in items {
            if let Err(e) = item.pack_into(self) {
                self.truncate_to(mark);
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Encodes one tagged value.
    fn write_value(&mut self, value: &Value) -> Result<&mut Self>
    where
        Self: Sized,
    {
        match value {
            Value::Bool(v) => self.put_scalar(u8::from(*v)),
            Value::U8(v) => self.put_scalar(*v),
            Value::I8(v) => self.put_scalar(*v),
            Value::U16(v) => self.put_scalar(*v),
            Value::I16(v) => self.put_scalar(*v),
            Value::U32(v) => self.put_scalar(*v),
            Value::I32(v) => self.put_scalar(*v),
            Value::U64(v) => self.put_scalar(*v),
            Value::I64(v) => self.put_scalar(*v),
            Value::U128(v) => self.put_scalar(*v),
            Value::I128(v) => self.put_scalar(*v),
            Value::F32(v) => self.put_scalar(*v),
            Value::F64(v) => self.put_scalar(*v),
            Value::Fixed(bytes) => self.put_bytes(bytes),
            Value::Prefixed(bytes) => self.put_prefixed(bytes)?,
        };
        Ok(self)
    }

    /// Packs any [`Pack`] value; chainable with `?`.
    fn insert<T: Pack + ?Sized>(&mut self, value: &T) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let mark = self.offset();
        if let Err(e) = value.pack_into(self) {
            self.truncate_to(mark);
            return Err(e);
        }
        Ok(self)
    }
}

/// Binary output stream that owns its buffer.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    buf: Vec<u8>,
    config: StreamConfig,
}

impl Encoder {
    /// Creates an empty encoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(capacity, StreamConfig::default())
    }

    pub fn with_config(capacity: usize, config: StreamConfig) -> Self {
        Encoder { buf: Vec::with_capacity(capacity), config }
    }

    /// Hands the encoded bytes to the caller and starts over with an empty buffer.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Consumes the encoder, returning the bytes as a shared buffer.
    pub fn freeze(self) -> Bytes {
        Bytes::from(self.buf)
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Output for Encoder {
    fn config(&self) -> StreamConfig {
        self.config
    }

    fn offset(&self) -> usize {
        self.buf.len()
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        BufMut::put_slice(&mut self.buf, bytes);
    }

    fn truncate_to(&mut self, offset: usize) {
        self.buf.truncate(offset);
    }
}
