use bytes::Bytes;

use crate::codec::encode::Output;
use crate::codec::types::Value;
use crate::codec::{Pack, Raw};
use crate::internal::error::Result;

macro_rules! impl_pack_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl Pack for $t {
            fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
                out.write_value(&Value::$variant(*self))?;
                Ok(())
            }
        }
    )*};
}

impl_pack_scalar!(
    bool => Bool,
    u8 => U8, i8 => I8,
    u16 => U16, i16 => I16,
    u32 => U32, i32 => I32,
    u64 => U64, i64 => I64,
    u128 => U128, i128 => I128,
    f32 => F32, f64 => F64,
);

/// u32 length prefix + UTF-8 bytes.
impl Pack for str {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_prefixed(self.as_bytes())?;
        Ok(())
    }
}

impl Pack for String {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        self.as_str().pack_into(out)
    }
}

/// u32 length prefix + raw bytes.
impl Pack for [u8] {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_prefixed(self)?;
        Ok(())
    }
}

impl Pack for Vec<u8> {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        self.as_slice().pack_into(out)
    }
}

impl Pack for Bytes {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        self.as_ref().pack_into(out)
    }
}

/// Exactly N raw bytes, no prefix.
impl<const N: usize> Pack for [u8; N] {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_bytes(self);
        Ok(())
    }
}

impl Pack for Raw<'_> {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_bytes(self.0);
        Ok(())
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        (**self).pack_into(out)
    }
}

macro_rules! impl_pack_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: Pack),+> Pack for ($($name,)+) {
            fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
                let mark = out.offset();
                $(
                    if let Err(e) = self.$idx.pack_into(out) {
                        out.truncate_to(mark);
                        return Err(e);
                    }
                )+
                Ok(())
            }
        }
    };
}

impl_pack_tuple!(A.0, B.1);
impl_pack_tuple!(A.0, B.1, C.2);
impl_pack_tuple!(A.0, B.1, C.2, D.3);
