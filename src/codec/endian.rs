//! Byte-order primitives.
//!
//! Four byte orders are recognised: `Little`, `Big`, and the aliases
//! [`Endian::NATIVE`] (whatever the target uses) and [`Endian::NETWORK`]
//! (always big-endian).

use crate::internal::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Byte order of multi-byte values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;

    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    pub const NETWORK: Endian = Endian::Big;

    /// Whether values in this order can be used without swapping.
    pub fn is_native(self) -> bool {
        self == Endian::NATIVE
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => write!(f, "little"),
            Endian::Big => write!(f, "big"),
        }
    }
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            "native" => Ok(Endian::NATIVE),
            "network" => Ok(Endian::NETWORK),
            other => Err(Error::CodecError(format!("Unknown endianness: {}", other))),
        }
    }
}

/// Fixed-width arithmetic values whose bytes can be reversed.
pub trait ByteSwap: Copy {
    /// Reverses the byte order using the compiler intrinsic.
    fn byte_swap(self) -> Self;

    /// Reverses the byte order with plain shifts and masks.
    ///
    /// Always yields the same result as [`ByteSwap::byte_swap`].
    fn byte_swap_portable(self) -> Self;
}

macro_rules! impl_byte_swap_int {
    ($($t:ty => $u:ty),* $(,)?) => {$(
        impl ByteSwap for $t {
            #[inline]
            fn byte_swap(self) -> Self {
                self.swap_bytes()
            }

            fn byte_swap_portable(self) -> Self {
                // wrapping shifts keep the single-byte case from overflowing
                let mut rest = self as $u;
                let mut out: $u = 0;
                for _ in 0..std::mem::size_of::<$u>() {
                    out = out.wrapping_shl(8) | (rest & 0xff);
                    rest = rest.wrapping_shr(8);
                }
                out as $t
            }
        }
    )*};
}

impl_byte_swap_int!(
    u8 => u8, u16 => u16, u32 => u32, u64 => u64, u128 => u128,
    i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128,
);

impl ByteSwap for f32 {
    #[inline]
    fn byte_swap(self) -> Self {
        f32::from_bits(self.to_bits().byte_swap())
    }

    fn byte_swap_portable(self) -> Self {
        f32::from_bits(self.to_bits().byte_swap_portable())
    }
}

impl ByteSwap for f64 {
    #[inline]
    fn byte_swap(self) -> Self {
        f64::from_bits(self.to_bits().byte_swap())
    }

    fn byte_swap_portable(self) -> Self {
        f64::from_bits(self.to_bits().byte_swap_portable())
    }
}

/// Converts a value between two byte orders.
#[inline]
pub fn convert<T: ByteSwap>(value: T, from: Endian, to: Endian) -> T {
    if from == to {
        value
    } else {
        value.byte_swap()
    }
}

/// Converts a network-order (big-endian) value into native order.
#[inline]
pub fn to_native_order<T: ByteSwap>(value: T) -> T {
    convert(value, Endian::NETWORK, Endian::NATIVE)
}

/// Converts a native-order value into network order (big-endian).
#[inline]
pub fn to_network_order<T: ByteSwap>(value: T) -> T {
    convert(value, Endian::NATIVE, Endian::NETWORK)
}
