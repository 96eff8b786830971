use crate::codec::endian::Endian;

/// How the decoder reacts when a wire-declared size exceeds a fixed destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Return [`Error::SizeLimitError`](crate::internal::error::Error::SizeLimitError) to the caller.
    #[default]
    Strict,
    /// Latch `OutOfBound` and keep going, like any other short read.
    Lenient,
}

/// Settings shared by encoders and decoders.
///
/// Both sides of a stream must agree on the endianness; the mode only
/// matters when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub endian: Endian,
    pub mode: DecodeMode,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            endian: Endian::NETWORK,
            mode: DecodeMode::Strict,
        }
    }
}

impl StreamConfig {
    /// Creates a configuration with the given endianness and strict decoding.
    pub fn new(endian: Endian) -> Self {
        StreamConfig { endian, mode: DecodeMode::Strict }
    }

    pub fn native() -> Self {
        Self::new(Endian::NATIVE)
    }

    pub fn little() -> Self {
        Self::new(Endian::Little)
    }

    pub fn big() -> Self {
        Self::new(Endian::Big)
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_network_strict() {
        let config = StreamConfig::default();
        assert_eq!(config.endian, Endian::Big);
        assert_eq!(config.mode, DecodeMode::Strict);
    }

    #[test]
    fn test_builder() {
        let config = StreamConfig::little().with_mode(DecodeMode::Lenient);
        assert_eq!(config.endian, Endian::Little);
        assert_eq!(config.mode, DecodeMode::Lenient);
        assert_eq!(config.with_endian(Endian::Big).endian, Endian::Big);
    }
}
