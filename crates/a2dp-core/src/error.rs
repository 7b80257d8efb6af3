//! Error types for the A2DP packetizer

use btaudio_codec_core::CodecError;
use std::io;
use thiserror::Error;

/// Result type for packetizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the packetizer
///
/// Codec and transport failures are reported here and never retried
/// internally. A full transmit buffer is not an error: `encode` returns
/// `Ok(0)` and the caller flushes first.
#[derive(Error, Debug)]
pub enum Error {
    /// The codec could not be created; stream setup must be aborted
    #[error("Codec initialization failed: {0}")]
    CodecInit(#[source] CodecError),

    /// The codec library failed during encode; the stream should be torn down
    #[error("Codec encode failed: {0}")]
    CodecEncode(#[source] CodecError),

    /// The non-blocking send failed; the buffered packet is kept for a retry
    #[error("Transport send failed: {0}")]
    TransportSend(#[source] io::Error),

    /// The transport accepted only part of the packet
    #[error("Short send: {sent} of {expected} bytes")]
    ShortSend {
        /// Bytes the transport reported as sent
        sent: usize,
        /// Packet length
        expected: usize,
    },

    /// A caller supplied argument is out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Packetizer configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Buffer too small to hold the requested data
    #[error("Buffer too small: required {required} bytes, available {available}")]
    BufferTooSmall {
        /// Bytes required
        required: usize,
        /// Bytes available
        available: usize,
    },

    /// A received media packet could not be parsed
    #[error("Invalid media packet: {0}")]
    InvalidPacket(String),
}

/// Coarse classification of [`Error`] for stream management decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Codec could not be created
    CodecInit,
    /// Codec failed while encoding
    CodecEncode,
    /// Transport rejected or truncated a packet
    TransportSend,
    /// Caller or configuration error
    Usage,
    /// Malformed data
    Protocol,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CodecInit(_) => ErrorKind::CodecInit,
            Self::CodecEncode(_) => ErrorKind::CodecEncode,
            Self::TransportSend(_) | Self::ShortSend { .. } => ErrorKind::TransportSend,
            Self::InvalidArgument(_) | Self::InvalidConfig(_) => ErrorKind::Usage,
            Self::BufferTooSmall { .. } | Self::InvalidPacket(_) => ErrorKind::Protocol,
        }
    }

    /// True when the send failed only because the socket buffer is full
    pub fn would_block(&self) -> bool {
        matches!(self, Self::TransportSend(e) if e.kind() == io::ErrorKind::WouldBlock)
    }
}
