//! # Codec-Core: audio codec abstraction for Bluetooth audio streaming
//!
//! This library defines the [`AudioCodec`] contract used by the A2DP
//! packetizer and the codecs that implement it.
//!
//! ## Features
//!
//! - **SBC**: adapter over an external SBC library context, with A2DP
//!   capability parsing, configuration selection and frame geometry
//! - **Loopback**: whole-block copy codec for tests and loopback setups
//!
//! ## Usage
//!
//! ```rust
//! use btaudio_codec_core::{AudioCodec, CodecFactory};
//!
//! let mut codec = CodecFactory::create_loopback(4)?;
//! let mut out = [0u8; 8];
//! let progress = codec.encode(&[1, 2, 3, 4, 5, 6], &mut out)?;
//! assert_eq!(progress.consumed, 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `sbc`: SBC adapter (enabled by default)
//! - `loopback`: loopback codec (enabled by default)

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod codecs;
pub mod error;
pub mod types;

// Re-export commonly used types and traits
pub use codecs::CodecFactory;
pub use error::{CodecError, Result};
pub use types::{AudioCodec, CodecInfo, CodecProgress, CodecType};

/// Version information for the codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported codec names
pub const SUPPORTED_CODECS: &[&str] = &[
    #[cfg(feature = "sbc")]
    "SBC",
    #[cfg(feature = "loopback")]
    "LOOPBACK",
];

/// Initialize the codec library
///
/// Installs a `tracing` subscriber if none is set yet. Safe to call
/// multiple times.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for library setup that
/// can fail.
pub fn init() -> Result<()> {
    // Initialize logging if not already done
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    tracing::info!("Codec-Core v{} initialized", VERSION);
    tracing::info!("Supported codecs: {:?}", SUPPORTED_CODECS);

    Ok(())
}

/// Get library information
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        supported_codecs: SUPPORTED_CODECS.to_vec(),
    }
}

/// Library information structure
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Library version
    pub version: &'static str,
    /// List of supported codec names
    pub supported_codecs: Vec<&'static str>,
}
