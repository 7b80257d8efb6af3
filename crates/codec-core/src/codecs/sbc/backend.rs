//! SBC library seam
//!
//! The compression math lives in an external SBC library. [`SbcBackend`] is
//! the handle such a library exposes once initialized for a parameter set;
//! [`SbcBackendFactory`] performs that initialization. Releasing library
//! resources happens when the backend is dropped.

use super::params::SbcParams;
use std::fmt;

/// Library status for a failed single-frame operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SbcLibError {
    /// The output buffer cannot hold another frame (`-ENOSPC`)
    NoSpace,
    /// Any other negative library status
    Failed(i32),
}

impl fmt::Display for SbcLibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpace => write!(f, "no space in output buffer"),
            Self::Failed(code) => write!(f, "library status {}", code),
        }
    }
}

/// An initialized SBC library context
pub trait SbcBackend: Send {
    /// PCM bytes the library consumes per frame
    fn codesize(&self) -> usize;

    /// Encoded bytes the library produces per frame
    fn frame_length(&self) -> usize;

    /// Encode one frame
    ///
    /// Returns `(consumed, written)`.
    fn encode_frame(&mut self, input: &[u8], output: &mut [u8])
        -> Result<(usize, usize), SbcLibError>;

    /// Decode one frame
    ///
    /// Returns `(consumed, written)`.
    fn decode_frame(&mut self, input: &[u8], output: &mut [u8])
        -> Result<(usize, usize), SbcLibError>;
}

/// Creates library contexts for a parameter set
pub trait SbcBackendFactory {
    /// Backend produced by this factory
    type Backend: SbcBackend;

    /// Initialize a library context
    fn init(&self, params: &SbcParams) -> Result<Self::Backend, SbcLibError>;
}

impl<F, B> SbcBackendFactory for F
where
    F: Fn(&SbcParams) -> Result<B, SbcLibError>,
    B: SbcBackend,
{
    type Backend = B;

    fn init(&self, params: &SbcParams) -> Result<B, SbcLibError> {
        self(params)
    }
}
