use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::ops::Index;

use crate::codec::decode::Decoder;
use crate::codec::encode::Output;
use crate::codec::{Pack, Unpack};
use crate::internal::error::Result;

pub const DIGEST_LEN: usize = 32;

/// A SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sha256Digest([u8; DIGEST_LEN]);

impl Sha256Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Sha256Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn len(&self) -> usize {
        DIGEST_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<usize> for Sha256Digest {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Hashes a byte slice.
pub fn sha256(data: &[u8]) -> Sha256Digest {
    Sha256Digest(Sha256::digest(data).into())
}

/// Hashes everything a reader yields.
pub fn sha256_reader<R: Read>(mut reader: R) -> Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => hasher.update(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Sha256Digest(hasher.finalize().into()))
}

/// 32 raw bytes, no prefix.
impl Pack for Sha256Digest {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        self.0.pack_into(out)
    }
}

impl Unpack for Sha256Digest {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        self.0.unpack_from(dec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode::Encoder;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_known_digests() {
        assert_eq!(sha256(b"").to_string(), EMPTY);
        assert_eq!(sha256(b"abc").to_string(), ABC);
        assert_eq!(sha256(b"abc")[0], 0xba);
    }

    #[test]
    fn test_reader_matches_slice() {
        let data = vec![0x5au8; 20_000];
        let from_reader = sha256_reader(data.as_slice()).unwrap();
        assert_eq!(from_reader, sha256(&data));
    }

    #[test]
    fn test_digest_wire_layout() {
        let digest = sha256(b"abc");
        let mut enc = Encoder::new();
        enc.insert(&digest).unwrap();
        assert_eq!(enc.as_slice(), digest.as_bytes());
        let bytes = enc.take();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.get::<Sha256Digest>().unwrap(), Some(digest));
    }
}
