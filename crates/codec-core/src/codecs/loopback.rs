//! Loopback codec
//!
//! Copies whole blocks unchanged in both directions. Useful for exercising
//! packetizers and transports without a real compression library.

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, CodecInfo, CodecProgress, CodecType};

/// Block copy codec with `codesize == frame_length == block_size`
#[derive(Debug, Clone)]
pub struct LoopbackCodec {
    block_size: usize,
}

impl LoopbackCodec {
    /// Create a loopback codec
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero block size
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(CodecError::invalid_config("loopback block size must be non-zero"));
        }
        Ok(Self { block_size })
    }

    fn copy_blocks(&self, input: &[u8], output: &mut [u8]) -> CodecProgress {
        let blocks = (input.len() / self.block_size).min(output.len() / self.block_size);
        let bytes = blocks * self.block_size;
        output[..bytes].copy_from_slice(&input[..bytes]);
        CodecProgress::new(bytes, bytes)
    }
}

impl AudioCodec for LoopbackCodec {
    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress> {
        Ok(self.copy_blocks(input, output))
    }

    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<CodecProgress> {
        Ok(self.copy_blocks(input, output))
    }

    fn codesize(&self) -> usize {
        self.block_size
    }

    fn frame_length(&self) -> usize {
        self.block_size
    }

    fn info(&self) -> CodecInfo {
        CodecInfo {
            codec_type: CodecType::Loopback,
            sample_rate: 0,
            channels: 0,
            codesize: self.block_size,
            frame_length: self.block_size,
        }
    }
}
