use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

use crate::internal::error::{Error, Result};

/// The closed set of wire-level kinds a stream can carry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    F32,
    F64,
    /// Exactly N raw bytes, no prefix.
    Fixed(usize),
    /// A u32 length followed by that many raw bytes.
    Prefixed,
}

impl Kind {
    /// Number of bytes the kind occupies when its size is known statically.
    pub fn static_size(&self) -> Option<usize> {
        match self {
            Kind::Bool | Kind::U8 | Kind::I8 => Some(1),
            Kind::U16 | Kind::I16 => Some(2),
            Kind::U32 | Kind::I32 | Kind::F32 => Some(4),
            Kind::U64 | Kind::I64 | Kind::F64 => Some(8),
            Kind::U128 | Kind::I128 => Some(16),
            Kind::Fixed(n) => Some(*n),
            Kind::Prefixed => None,
        }
    }
}

impl FromStr for Kind {
    type Err = Error;

    /// Parses layout names such as `u16`, `bool`, `str`, `bytes` or `fixed:32`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if let Some(count) = name.strip_prefix("fixed:") {
            let n = count
                .parse::<usize>()
                .map_err(|e| Error::CodecError(format!("Invalid fixed size '{}': {}", count, e)))?;
            return Ok(Kind::Fixed(n));
        }
        match name.as_str() {
            "bool" => Ok(Kind::Bool),
            "u8" => Ok(Kind::U8),
            "i8" | "char" => Ok(Kind::I8),
            "u16" => Ok(Kind::U16),
            "i16" => Ok(Kind::I16),
            "u32" => Ok(Kind::U32),
            "i32" => Ok(Kind::I32),
            "u64" => Ok(Kind::U64),
            "i64" => Ok(Kind::I64),
            "u128" => Ok(Kind::U128),
            "i128" => Ok(Kind::I128),
            "f32" => Ok(Kind::F32),
            "f64" => Ok(Kind::F64),
            "str" | "string" | "bytes" => Ok(Kind::Prefixed),
            other => Err(Error::CodecError(format!("Unknown wire kind: {}", other))),
        }
    }
}

/// A single decoded (or to-be-encoded) wire value.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
    F32(f32),
    F64(f64),
    Fixed(Bytes),
    Prefixed(Bytes),
}

impl Value {
    /// Returns the wire kind of the value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::U8(_) => Kind::U8,
            Value::I8(_) => Kind::I8,
            Value::U16(_) => Kind::U16,
            Value::I16(_) => Kind::I16,
            Value::U32(_) => Kind::U32,
            Value::I32(_) => Kind::I32,
            Value::U64(_) => Kind::U64,
            Value::I64(_) => Kind::I64,
            Value::U128(_) => Kind::U128,
            Value::I128(_) => Kind::I128,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Fixed(b) => Kind::Fixed(b.len()),
            Value::Prefixed(_) => Kind::Prefixed,
        }
    }

    /// Number of bytes the value occupies on the wire, prefix included.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Prefixed(b) => 4 + b.len(),
            other => other.kind().static_size().unwrap_or(0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U128(v) => write!(f, "{}", v),
            Value::I128(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Fixed(b) => write!(f, "0x{}", hex::encode(b)),
            // printable UTF-8 is shown as text, anything else as hex
            Value::Prefixed(b) => match std::str::from_utf8(b) {
                Ok(s) if !s.chars().any(char::is_control) => write!(f, "{:?}", s),
                _ => write!(f, "0x{}", hex::encode(b)),
            },
        }
    }
}
