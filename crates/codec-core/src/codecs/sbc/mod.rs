//! SBC (sub-band codec) adapter
//!
//! [`SbcCodec`] adapts an SBC library context to the [`AudioCodec`] contract.
//! The library encodes and decodes one frame per call; the adapter loops
//! over whole frames and accumulates progress.
//!
//! ```rust
//! use btaudio_codec_core::codecs::sbc::{SbcCapabilities, SbcParams};
//!
//! let config = SbcCapabilities::default().select_configuration()?;
//! let params = SbcParams::try_from(&config)?;
//! assert_eq!(params.codesize(), 512);
//! assert_eq!(params.frame_length(), 119);
//! # Ok::<(), btaudio_codec_core::CodecError>(())
//! ```

pub mod backend;
pub mod config;
pub mod params;

pub use backend::{SbcBackend, SbcBackendFactory, SbcLibError};
pub use config::{
    SbcAllocationMethod, SbcBlockLength, SbcCapabilities, SbcChannelMode, SbcConfiguration,
    SbcSamplingFrequency, SbcSubbands,
};
pub use params::SbcParams;

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, CodecInfo, CodecProgress, CodecType};
use tracing::{debug, error, warn};

/// SBC codec backed by an external library context
///
/// `codesize` and `frame_length` are read from the library once at creation
/// and stay fixed for the codec's lifetime. Dropping the codec releases the
/// library context; ownership guarantees this happens exactly once.
pub struct SbcCodec<B: SbcBackend> {
    backend: B,
    params: SbcParams,
    codesize: usize,
    frame_length: usize,
}

impl<B: SbcBackend> SbcCodec<B> {
    /// Create a codec from a negotiated A2DP configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not select exactly
    /// one option per field, or `InitializationFailed` if the library cannot
    /// be initialized.
    pub fn new<F>(config: &SbcConfiguration, factory: &F) -> Result<Self>
    where
        F: SbcBackendFactory<Backend = B>,
    {
        config.validate()?;
        let params = SbcParams::try_from(config)?;
        Self::with_params(params, factory)
    }

    /// Create a codec from library parameters
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the library cannot be initialized or
    /// reports an empty frame geometry.
    pub fn with_params<F>(params: SbcParams, factory: &F) -> Result<Self>
    where
        F: SbcBackendFactory<Backend = B>,
    {
        let backend = factory.init(&params).map_err(|e| {
            CodecError::initialization_failed(format!("sbc_init failed: {}", e))
        })?;

        let codesize = backend.codesize();
        let frame_length = backend.frame_length();
        if codesize == 0 || frame_length == 0 {
            return Err(CodecError::initialization_failed(format!(
                "library reported codesize {} and frame length {}",
                codesize, frame_length
            )));
        }

        debug!(
            "SBC codec created: {} Hz, {} channel(s), bitpool {}, codesize {}, frame length {}",
            params.sample_rate(),
            params.channels(),
            params.bitpool,
            codesize,
            frame_length
        );

        Ok(Self {
            backend,
            params,
            codesize,
            frame_length,
        })
    }

    /// Library parameters this codec was created with
    pub fn params(&self) -> &SbcParams {
        &self.params
    }
}

impl<B: SbcBackend> AudioCodec for SbcCodec<B> {
    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress> {
        let mut progress = CodecProgress::default();

        while input.len() - progress.consumed >= self.codesize && output.len() > progress.produced
        {
            let remaining_in = &input[progress.consumed..];
            let remaining_out = &mut output[progress.produced..];
            let (in_room, out_room) = (remaining_in.len(), remaining_out.len());

            match self.backend.encode_frame(remaining_in, remaining_out) {
                Ok((0, _)) => break,
                Ok((consumed, written)) => {
                    if consumed > in_room || written > out_room {
                        error!(
                            "sbc_encode overran buffers: consumed {}/{} written {}/{}",
                            consumed, in_room, written, out_room
                        );
                        return Err(CodecError::encoding_failed(
                            "library reported progress past buffer end",
                            -1,
                        ));
                    }
                    progress.consumed += consumed;
                    progress.produced += written;
                }
                Err(SbcLibError::NoSpace) => break,
                Err(SbcLibError::Failed(code)) => {
                    error!("sbc_encode error {}", code);
                    return Err(CodecError::encoding_failed("sbc_encode", code));
                }
            }
        }

        Ok(progress)
    }

    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress> {
        let mut progress = CodecProgress::default();

        while input.len() - progress.consumed >= self.frame_length
            && output.len() - progress.produced >= self.codesize
        {
            let remaining_in = &input[progress.consumed..];
            let remaining_out = &mut output[progress.produced..];
            let (in_room, out_room) = (remaining_in.len(), remaining_out.len());

            match self.backend.decode_frame(remaining_in, remaining_out) {
                Ok((consumed, written)) if consumed > 0 && consumed <= in_room && written <= out_room => {
                    progress.consumed += consumed;
                    progress.produced += written;
                }
                Ok((consumed, written)) => {
                    warn!(
                        "sbc_decode made no usable progress: consumed {} written {}",
                        consumed, written
                    );
                    break;
                }
                Err(SbcLibError::Failed(code)) if progress.is_empty() => {
                    error!("sbc_decode error {} on first frame", code);
                    return Err(CodecError::decoding_failed(format!(
                        "sbc_decode status {}",
                        code
                    )));
                }
                Err(e) => {
                    warn!("Error in decoding: {}", e);
                    break;
                }
            }
        }

        Ok(progress)
    }

    fn codesize(&self) -> usize {
        self.codesize
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn info(&self) -> CodecInfo {
        CodecInfo {
            codec_type: CodecType::Sbc,
            sample_rate: self.params.sample_rate(),
            channels: self.params.channels() as u8,
            codesize: self.codesize,
            frame_length: self.frame_length,
        }
    }
}

impl<B: SbcBackend> Drop for SbcCodec<B> {
    fn drop(&mut self) {
        debug!("Releasing SBC codec context (bitpool {})", self.params.bitpool);
    }
}
