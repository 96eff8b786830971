use thiserror::Error;
use std::io;

/// Unified error type for the binstream library.
///
/// Only hard failures are reported through this type. Running out of input
/// while decoding is not an error here; it latches the decoder's
/// [`Status`](crate::codec::decode::Status) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A constructor precondition was violated (bad range, bad offset).
    #[error("Invalid Argument: {0}")]
    InvalidArgumentError(String),

    /// A declared size does not fit the destination or the length prefix.
    #[error("Size Limit Exceeded: declared {declared} bytes, capacity {capacity} bytes")]
    SizeLimitError { declared: u64, capacity: u64 },

    /// Error related to data outside the stream itself (layouts, identifier text).
    #[error("Codec Error: {0}")]
    CodecError(String),

    /// Error raised by an underlying reader or file.
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),
}

/// A specialized `Result` type for binstream operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a [`Error::SizeLimitError`] from any pair of lengths.
    pub fn size_limit(declared: usize, capacity: usize) -> Self {
        Error::SizeLimitError { declared: declared as u64, capacity: capacity as u64 }
    }

    /// Returns `Ok(())` when `declared` fits into `capacity`.
    pub fn ensure_fits(declared: usize, capacity: usize) -> Result<()> {
        if declared > capacity {
            return Err(Error::size_limit(declared, capacity));
        }
        Ok(())
    }
}
