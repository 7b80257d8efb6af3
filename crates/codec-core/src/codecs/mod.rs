//! Codec implementations and factory

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, CodecType};

#[cfg(feature = "sbc")]
pub mod sbc;

#[cfg(feature = "loopback")]
pub mod loopback;

/// Codec factory for creating boxed codec instances
pub struct CodecFactory;

impl CodecFactory {
    /// Create an SBC codec from a negotiated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the SBC library
    /// cannot be initialized.
    #[cfg(feature = "sbc")]
    pub fn create_sbc<F>(
        config: &sbc::SbcConfiguration,
        factory: &F,
    ) -> Result<Box<dyn AudioCodec>>
    where
        F: sbc::SbcBackendFactory,
        F::Backend: 'static,
    {
        let codec = sbc::SbcCodec::new(config, factory)?;
        Ok(Box::new(codec))
    }

    /// Create a loopback codec with the given block size
    ///
    /// # Errors
    ///
    /// Returns an error for a zero block size.
    #[cfg(feature = "loopback")]
    pub fn create_loopback(block_size: usize) -> Result<Box<dyn AudioCodec>> {
        let codec = loopback::LoopbackCodec::new(block_size)?;
        Ok(Box::new(codec))
    }

    /// Get all supported codec names
    pub fn supported_codecs() -> Vec<&'static str> {
        crate::SUPPORTED_CODECS.to_vec()
    }

    /// Resolve a codec name to a type compiled into this build
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCodec` for unknown names and for codecs whose
    /// feature is disabled.
    pub fn codec_type(name: &str) -> Result<CodecType> {
        let codec_type: CodecType = name.parse()?;
        if !crate::SUPPORTED_CODECS.contains(&codec_type.name()) {
            return Err(CodecError::unsupported_codec(format!(
                "{} (feature not enabled)",
                codec_type
            )));
        }
        Ok(codec_type)
    }

    /// Check if a codec is supported
    pub fn is_supported(name: &str) -> bool {
        Self::codec_type(name).is_ok()
    }
}
