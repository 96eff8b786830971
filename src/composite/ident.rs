use rand_core::{OsRng, RngCore};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::decode::Decoder;
use crate::codec::encode::Output;
use crate::codec::{Pack, Unpack};
use crate::internal::error::{Error, Result};

const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// A 128-bit identifier stored as two 64-bit halves.
///
/// Covers both random UUIDs (version 4) and ULIDs (48-bit millisecond
/// timestamp followed by 80 random bits); the layout on the wire is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uid128 {
    hi: u64,
    lo: u64,
}

impl Uid128 {
    pub const fn from_parts(hi: u64, lo: u64) -> Self {
        Uid128 { hi, lo }
    }

    pub const fn nil() -> Self {
        Uid128 { hi: 0, lo: 0 }
    }

    pub const fn hi(&self) -> u64 {
        self.hi
    }

    pub const fn lo(&self) -> u64 {
        self.lo
    }

    pub fn is_nil(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self::from_u128(u128::from_be_bytes(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        self.as_u128().to_be_bytes()
    }

    pub fn from_u128(value: u128) -> Self {
        Uid128 { hi: (value >> 64) as u64, lo: value as u64 }
    }

    pub fn as_u128(&self) -> u128 {
        (u128::from(self.hi) << 64) | u128::from(self.lo)
    }

    /// Random RFC 4122 version 4 identifier.
    pub fn new_v4() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self::from_bytes(bytes)
    }

    /// ULID for the current time.
    pub fn new_ulid() -> Self {
        Self::new_ulid_at(SystemTime::now())
    }

    /// ULID whose timestamp part is `time` in milliseconds (clamped to 48 bits).
    pub fn new_ulid_at(time: SystemTime) -> Self {
        let millis = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
            .min((1u128 << 48) - 1) as u64;
        let mut random = [0u8; 10];
        OsRng.fill_bytes(&mut random);
        let hi = (millis << 16) | u64::from(u16::from_be_bytes([random[0], random[1]]));
        let mut lo_bytes = [0u8; 8];
        lo_bytes.copy_from_slice(&random[2..]);
        Uid128 { hi, lo: u64::from_be_bytes(lo_bytes) }
    }

    /// The 48-bit millisecond timestamp of a ULID.
    pub fn ulid_millis(&self) -> u64 {
        self.hi >> 16
    }

    /// 26-character Crockford base32 form.
    pub fn to_ulid_string(&self) -> String {
        let value = self.as_u128();
        (0..26)
            .map(|i| {
                let shift = 125 - 5 * i;
                CROCKFORD[((value >> shift) & 0x1f) as usize] as char
            })
            .collect()
    }
}

/// Canonical `8-4-4-4-12` lower-case hex.
impl fmt::Display for Uid128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = hex::encode(self.to_bytes());
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &text[..8],
            &text[8..12],
            &text[12..16],
            &text[16..20],
            &text[20..]
        )
    }
}

impl FromStr for Uid128 {
    type Err = Error;

    /// Accepts the canonical form, with or without dashes.
    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s.chars().filter(|c| *c != '-').collect();
        if digits.len() != 32 {
            return Err(Error::CodecError(format!("Invalid identifier length: {}", s)));
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|e| Error::CodecError(format!("Invalid identifier '{}': {}", s, e)))?;
        Ok(Self::from_bytes(bytes))
    }
}

/// High half then low half, each a u64 in the stream's byte order.
impl Pack for Uid128 {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_scalar(self.hi).put_scalar(self.lo);
        Ok(())
    }
}

impl Unpack for Uid128 {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let mut halves = (0u64, 0u64);
        dec.extract(&mut halves)?;
        if dec.is_good() {
            *self = Uid128::from_parts(halves.0, halves.1);
        }
        Ok(())
    }
}
