//! binstream: an endianness-aware, type-directed binary stream codec.
//!
//! An [`Encoder`] packs values into a byte buffer; a [`Decoder`] reads them
//! back. Decoding failures caused by short input are sticky: after the first
//! one every extraction is a no-op, and the caller checks
//! [`Decoder::is_good`] once at the end or rolls back a transaction.
//!
//! ```
//! use binstream::{Decoder, Encoder, Output};
//!
//! let mut enc = Encoder::with_capacity(16);
//! enc.insert(&42u16).unwrap().insert("Hello").unwrap();
//! let bytes = enc.take();
//!
//! let mut dec = Decoder::new(&bytes);
//! let (mut n, mut s) = (0u16, String::new());
//! dec.extract(&mut n).unwrap().extract(&mut s).unwrap();
//! assert!(dec.is_good());
//! assert_eq!((n, s.as_str()), (42, "Hello"));
//! ```

pub mod codec;
pub mod composite;
pub mod internal;

pub use codec::decode::{Cursor, Decoder, Status};
pub use codec::encode::{BorrowedEncoder, Encoder, Output};
pub use codec::endian::{to_native_order, to_network_order, ByteSwap, Endian};
pub use codec::types::{Kind, Value};
pub use codec::{Pack, Raw, Unpack};
pub use internal::config::{DecodeMode, StreamConfig};
pub use internal::error::{Error, Result};
