use std::path::{Path, PathBuf};

use crate::codec::decode::Decoder;
use crate::codec::encode::Output;
use crate::codec::{Pack, Unpack};
use crate::internal::error::{Error, Result};

/// u16 length + UTF-8 bytes. A path that is not valid UTF-8 is rejected.
impl Pack for Path {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        let text = self.to_str().ok_or_else(|| {
            Error::CodecError(format!("path is not valid UTF-8: {}", self.display()))
        })?;
        let len = u16::try_from(text.len())
            .map_err(|_| Error::size_limit(text.len(), u16::MAX as usize))?;
        out.put_scalar(len).put_bytes(text.as_bytes());
        Ok(())
    }
}

impl Pack for PathBuf {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        self.as_path().pack_into(out)
    }
}

impl Unpack for PathBuf {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let mut decoded = None;
        dec.atomic(|d| {
            let start = d.position();
            let Some(len) = d.get::<u16>()? else {
                return Ok(());
            };
            let Some(span) = d.read_span(len as usize) else {
                return Ok(());
            };
            match std::str::from_utf8(span) {
                Ok(text) => decoded = Some(PathBuf::from(text)),
                Err(_) => d.reject_since(start),
            }
            Ok(())
        })?;
        if let Some(path) = decoded {
            *self = path;
        }
        Ok(())
    }
}
