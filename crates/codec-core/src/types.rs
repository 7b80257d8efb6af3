//! Core types and traits for the codec library
//!
//! This module defines the capability contract every audio transcoder in
//! the library implements, plus the small value types it reports.

use crate::error::{CodecError, Result};
use std::fmt;
use std::str::FromStr;

/// Primary trait for audio codecs
///
/// Codecs work on opaque byte buffers in whole blocks. A call transcodes as
/// many blocks as both the input and the output allow and reports how far it
/// got; running out of input or output space is not an error.
///
/// A codec is owned by exactly one component for its whole lifetime.
/// Dropping the codec releases any library resources it wraps.
pub trait AudioCodec: Send {
    /// Encode PCM bytes from `input` into `output`
    ///
    /// Never writes past `output.len()`. May consume fewer bytes than
    /// `input.len()` when the output has no room for another whole frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec library reports an unrecoverable
    /// failure. No partial progress is reported in that case.
    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress>;

    /// Decode encoded frames from `input` into PCM bytes in `output`
    ///
    /// A frame that fails after earlier frames decoded ends the call with
    /// the progress made so far.
    ///
    /// # Errors
    ///
    /// Returns `DecodingFailed` if the first frame of the call cannot be
    /// decoded.
    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress>;

    /// Number of PCM bytes consumed per encoded frame
    fn codesize(&self) -> usize;

    /// Number of encoded bytes produced per frame
    fn frame_length(&self) -> usize;

    /// Get codec information
    fn info(&self) -> CodecInfo;
}

/// Progress made by a single encode or decode call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecProgress {
    /// Bytes consumed from the input buffer
    pub consumed: usize,
    /// Bytes written into the output buffer
    pub produced: usize,
}

impl CodecProgress {
    /// Create a progress record
    pub fn new(consumed: usize, produced: usize) -> Self {
        Self { consumed, produced }
    }

    /// True when the call neither consumed nor produced anything
    pub fn is_empty(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

/// Audio codec information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecInfo {
    /// Codec type
    pub codec_type: CodecType,
    /// Sample rate in Hz (0 when the codec is rate agnostic)
    pub sample_rate: u32,
    /// Number of channels (0 when the codec is layout agnostic)
    pub channels: u8,
    /// PCM bytes per encoded frame
    pub codesize: usize,
    /// Encoded bytes per frame
    pub frame_length: usize,
}

/// Audio codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// Bluetooth sub-band codec, mandatory for A2DP
    Sbc,
    /// Block copy codec used for loopback testing
    Loopback,
}

impl CodecType {
    /// Get the codec name
    pub fn name(self) -> &'static str {
        match self {
            Self::Sbc => "SBC",
            Self::Loopback => "LOOPBACK",
        }
    }

    /// A2DP media codec type octet, if the codec has one
    pub fn a2dp_codec_id(self) -> Option<u8> {
        match self {
            Self::Sbc => Some(0x00),
            Self::Loopback => None,
        }
    }
}

impl FromStr for CodecType {
    type Err = CodecError;

    /// Parse a codec name, ignoring case
    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SBC" => Ok(Self::Sbc),
            "LOOPBACK" => Ok(Self::Loopback),
            _ => Err(CodecError::unsupported_codec(name)),
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_type_names() {
        assert_eq!(CodecType::Sbc.name(), "SBC");
        assert_eq!(CodecType::Loopback.to_string(), "LOOPBACK");
        assert_eq!(CodecType::Sbc.a2dp_codec_id(), Some(0));
        assert_eq!(CodecType::Loopback.a2dp_codec_id(), None);
    }

    #[test]
    fn test_codec_type_from_name() {
        assert_eq!("sbc".parse::<CodecType>().unwrap(), CodecType::Sbc);
        assert_eq!("Loopback".parse::<CodecType>().unwrap(), CodecType::Loopback);

        let err = "aptX".parse::<CodecType>().unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedCodec { ref codec_type } if codec_type == "aptX"));
    }

    #[test]
    fn test_codec_progress() {
        assert!(CodecProgress::default().is_empty());
        let progress = CodecProgress::new(512, 119);
        assert!(!progress.is_empty());
        assert_eq!(progress.consumed, 512);
        assert_eq!(progress.produced, 119);
    }
}
