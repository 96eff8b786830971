use bytes::Bytes;

use crate::codec::decode::Decoder;
use crate::codec::types::{Kind, Value};
use crate::codec::Unpack;
use crate::internal::error::Result;

macro_rules! impl_unpack_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl Unpack for $t {
            fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
                if let Some(Value::$variant(v)) = dec.read_value(Kind::$variant) {
                    *self = v;
                }
                Ok(())
            }
        }
    )*};
}

impl_unpack_scalar!(
    bool => Bool,
    u8 => U8, i8 => I8,
    u16 => U16, i16 => I16,
    u32 => U32, i32 => I32,
    u64 => U64, i64 => I64,
    u128 => U128, i128 => I128,
    f32 => F32, f64 => F64,
);

/// Length-prefixed (or size-hinted) UTF-8. Invalid UTF-8 latches `Corrupted`.
impl Unpack for String {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let start = dec.position();
        let Some(span) = dec.read_prefixed() else {
            return Ok(());
        };
        match std::str::from_utf8(span) {
            Ok(text) => {
                self.clear();
                self.push_str(text);
            }
            Err(_) => dec.reject_since(start),
        }
        Ok(())
    }
}

impl Unpack for Vec<u8> {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if let Some(span) = dec.read_prefixed() {
            self.clear();
            self.extend_from_slice(span);
        }
        Ok(())
    }
}

impl Unpack for Bytes {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if let Some(span) = dec.read_prefixed() {
            *self = Bytes::copy_from_slice(span);
        }
        Ok(())
    }
}

/// Exactly N raw bytes, no prefix.
impl<const N: usize> Unpack for [u8; N] {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if let Some(span) = dec.read_span(N) {
            self.copy_from_slice(span);
        }
        Ok(())
    }
}

macro_rules! impl_unpack_tuple {
    ($($name:ident . $idx:tt),+) => {
        /// Decoded all-or-nothing: on failure the position is restored and
        /// the failure stays latched.
        impl<$($name: Unpack + Default),+> Unpack for ($($name,)+) {
            fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
                let mut staged: ($($name,)+) = Default::default();
                let committed = dec.atomic(|d| {
                    $( d.extract(&mut staged.$idx)?; )+
                    Ok(())
                })?;
                if committed {
                    *self = staged;
                }
                Ok(())
            }
        }
    };
}

impl_unpack_tuple!(A.0, B.1);
impl_unpack_tuple!(A.0, B.1, C.2);
impl_unpack_tuple!(A.0, B.1, C.2, D.3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::Status;
    use crate::internal::config::StreamConfig;

    #[test]
    fn test_unpack_scalars_chain() {
        let data = [0x01, 0x61, 0xd6, 0x2a, 0x00, 0x80, 0xff, 0xff];
        let mut dec = Decoder::with_config(&data, StreamConfig::little());
        let (mut b, mut c, mut i, mut u, mut s, mut w) = (false, 0u8, 0i8, 0u8, 0i16, 0u16);
        dec.extract(&mut b)
            .unwrap()
            .extract(&mut c)
            .unwrap()
            .extract(&mut i)
            .unwrap()
            .extract(&mut u)
            .unwrap()
            .extract(&mut s)
            .unwrap()
            .extract(&mut w)
            .unwrap();
        assert!(b);
        assert_eq!(c, b'a');
        assert_eq!(i, -42);
        assert_eq!(u, 42);
        assert_eq!(s, i16::MIN);
        assert_eq!(w, u16::MAX);
        assert!(dec.is_exhausted());
    }

    #[test]
    fn test_failed_extract_leaves_destination() {
        let data = [0x12];
        let mut dec = Decoder::new(&data);
        let mut value = 7u32;
        dec.extract(&mut value).unwrap();
        assert_eq!(value, 7);
        assert_eq!(dec.status(), Status::OutOfBound);

        let mut byte = 9u8;
        dec.extract(&mut byte).unwrap();
        assert_eq!(byte, 9);
        assert_eq!(dec.position(), 0);
    }

    #[test]
    fn test_nonzero_bool_is_true() {
        let mut dec = Decoder::new(&[0x00, 0x02]);
        assert_eq!(dec.get::<bool>().unwrap(), Some(false));
        assert_eq!(dec.get::<bool>().unwrap(), Some(true));
        assert_eq!(dec.get::<bool>().unwrap(), None);
    }

    #[test]
    fn test_unpack_string() {
        let data = b"\x00\x00\x00\x05Hello";
        let mut dec = Decoder::new(data);
        assert_eq!(dec.get::<String>().unwrap().as_deref(), Some("Hello"));
        assert!(dec.is_exhausted());
    }

    #[test]
    fn test_unpack_invalid_utf8() {
        let data = [0x00, 0x00, 0x00, 0x02, 0xff, 0xfe];
        let mut dec = Decoder::new(&data);
        let mut text = String::from("keep");
        dec.extract(&mut text).unwrap();
        assert_eq!(text, "keep");
        assert_eq!(dec.status(), Status::Corrupted);
        assert_eq!(dec.position(), 0);
    }

    #[test]
    fn test_unpack_sized_string() {
        let data = b"Hello world";
        let mut dec = Decoder::new(data);
        let mut text = String::new();
        dec.extract_sized(&mut text, 5).unwrap();
        assert_eq!(text, "Hello");
        assert_eq!(dec.position(), 5);
    }

    #[test]
    fn test_unpack_fixed_array() {
        let data = [1u8, 2, 3, 4, 5];
        let mut dec = Decoder::new(&data);
        let mut head = [0u8; 3];
        let mut tail = [0u8; 3];
        dec.extract(&mut head).unwrap().extract(&mut tail).unwrap();
        assert_eq!(head, [1, 2, 3]);
        assert_eq!(tail, [0, 0, 0]);
        assert_eq!(dec.position(), 3);
    }

    #[test]
    fn test_unpack_bytes_and_vec() {
        let data = [0x00, 0x00, 0x00, 0x01, 0xaa, 0x00, 0x00, 0x00, 0x00];
        let mut dec = Decoder::new(&data);
        assert_eq!(dec.get::<Vec<u8>>().unwrap(), Some(vec![0xaa]));
        assert_eq!(dec.get::<Bytes>().unwrap(), Some(Bytes::new()));
        assert!(dec.is_exhausted());
    }

    #[test]
    fn test_unpack_tuple_is_atomic() {
        let data = [0x00, 0x07, 0x01];
        let mut dec = Decoder::new(&data);
        let mut pair = (0u16, 0u16);
        dec.extract(&mut pair).unwrap();
        assert_eq!(pair, (0, 0));
        assert_eq!(dec.status(), Status::OutOfBound);
        assert_eq!(dec.position(), 0);

        let mut dec = Decoder::new(&data);
        let mut pair = (0u16, 0u8);
        dec.extract(&mut pair).unwrap();
        assert_eq!(pair, (7, 1));
    }
}
