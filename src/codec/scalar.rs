use byteorder::{ByteOrder, NativeEndian};

use crate::codec::endian::{convert, ByteSwap, Endian};

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width arithmetic types that travel on the wire as `SIZE` raw bytes.
///
/// Implemented for every integer width up to 128 bits and for `f32`/`f64`
/// (which travel as the bits of the same-width unsigned integer).
pub trait Scalar: ByteSwap + sealed::Sealed {
    const SIZE: usize;

    /// Reads a value stored in native byte order. `buf` holds exactly `SIZE` bytes.
    fn read_ne(buf: &[u8]) -> Self;

    /// Writes the value in native byte order. `buf` holds exactly `SIZE` bytes.
    fn write_ne(self, buf: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($t:ty, $read:ident, $write:ident);* $(;)?) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            #[inline]
            fn read_ne(buf: &[u8]) -> Self {
                NativeEndian::$read(buf)
            }

            #[inline]
            fn write_ne(self, buf: &mut [u8]) {
                NativeEndian::$write(buf, self)
            }
        }
    )*};
}

impl_scalar! {
    u16, read_u16, write_u16;
    u32, read_u32, write_u32;
    u64, read_u64, write_u64;
    u128, read_u128, write_u128;
    i16, read_i16, write_i16;
    i32, read_i32, write_i32;
    i64, read_i64, write_i64;
    i128, read_i128, write_i128;
    f32, read_f32, write_f32;
    f64, read_f64, write_f64;
}

// byteorder has no single-byte slice helpers
impl sealed::Sealed for u8 {}
impl sealed::Sealed for i8 {}

impl Scalar for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn read_ne(buf: &[u8]) -> Self {
        buf[0]
    }

    #[inline]
    fn write_ne(self, buf: &mut [u8]) {
        buf[0] = self;
    }
}

impl Scalar for i8 {
    const SIZE: usize = 1;

    #[inline]
    fn read_ne(buf: &[u8]) -> Self {
        buf[0] as i8
    }

    #[inline]
    fn write_ne(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }
}

/// Largest `Scalar::SIZE`.
pub const MAX_SCALAR_SIZE: usize = 16;

/// Interprets `buf` as a value stored in `endian` order.
#[inline]
pub fn decode_scalar<T: Scalar>(buf: &[u8], endian: Endian) -> T {
    convert(T::read_ne(buf), Endian::NATIVE, endian)
}

/// Serializes `value` in `endian` order. Returns the scratch array and the used length.
#[inline]
pub fn encode_scalar<T: Scalar>(value: T, endian: Endian) -> ([u8; MAX_SCALAR_SIZE], usize) {
    let mut scratch = [0u8; MAX_SCALAR_SIZE];
    convert(value, Endian::NATIVE, endian).write_ne(&mut scratch[..T::SIZE]);
    (scratch, T::SIZE)
}
