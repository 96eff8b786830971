// Codec module: byte order, wire kinds, and the binary input/output streams

pub mod decode;
pub mod encode;
pub mod endian;
pub mod scalar;
pub mod types;

use crate::codec::decode::Decoder;
use crate::codec::encode::Output;
use crate::internal::error::Result;

/// Values that can be written to a binary output stream.
///
/// A `Pack` implementation must write exactly the bytes the matching
/// [`Unpack`] implementation consumes.
pub trait Pack {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()>;
}

/// Values that can be read back from a binary input stream.
///
/// Implementations leave `self` untouched when the read fails, and a
/// multi-field implementation must not leave the decoder half-way through
/// the value: use [`Decoder::atomic`] or [`Decoder::reject_since`].
/// Only hard failures are returned as `Err`.
pub trait Unpack {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()>;
}

/// Raw byte span written verbatim, without a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raw<'a>(pub &'a [u8]);

/// Declares a fieldless enum that travels as its integral representation.
///
/// Unknown discriminants latch `Corrupted` on decode.
///
/// ```
/// binstream::wire_enum! {
///     pub enum Color: u8 {
///         Red = 1,
///         Green = 2,
///     }
/// }
///
/// use binstream::codec::encode::{Encoder, Output};
/// let mut enc = Encoder::new();
/// enc.insert(&Color::Green).unwrap();
/// assert_eq!(enc.as_slice(), &[2]);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr($repr)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Maps a raw discriminant back to a variant.
            #[allow(dead_code)]
            pub fn from_repr(raw: $repr) -> ::std::option::Option<Self> {
                $(
                    if raw == $value {
                        return ::std::option::Option::Some($name::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::codec::Pack for $name {
            fn pack_into<O: $crate::codec::encode::Output>(
                &self,
                out: &mut O,
            ) -> $crate::internal::error::Result<()> {
                $crate::codec::Pack::pack_into(&(*self as $repr), out)
            }
        }

        impl $crate::codec::Unpack for $name {
            fn unpack_from(
                &mut self,
                dec: &mut $crate::codec::decode::Decoder<'_>,
            ) -> $crate::internal::error::Result<()> {
                let start = dec.position();
                if let ::std::option::Option::Some(raw) = dec.get::<$repr>()? {
                    match $name::from_repr(raw) {
                        ::std::option::Option::Some(value) => *self = value,
                        ::std::option::Option::None => dec.reject_since(start),
                    }
                }
                Ok(())
            }
        }
    };
}
