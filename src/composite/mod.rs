//! Wire formats for values defined outside the stream core.
//!
//! Each type plugs into the streams through [`Pack`](crate::codec::Pack) and
//! [`Unpack`](crate::codec::Unpack); decoding is all-or-nothing per value.

pub mod digest;
pub mod ident;
pub mod path;
pub mod time;

pub use digest::{sha256, sha256_reader, Sha256Digest};
pub use ident::Uid128;
