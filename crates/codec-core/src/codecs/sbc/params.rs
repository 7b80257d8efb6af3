//! SBC library parameters
//!
//! SBC libraries take small enumerated codes rather than the A2DP bit
//! flags. [`SbcParams`] holds those codes and computes the frame geometry a
//! conforming library reports for them.

use super::config::{
    SbcAllocationMethod, SbcBlockLength, SbcChannelMode, SbcConfiguration, SbcSamplingFrequency,
    SbcSubbands,
};
use crate::error::{CodecError, Result};

/// Library sampling frequency code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Frequency {
    /// 16000 Hz
    Hz16000 = 0x00,
    /// 32000 Hz
    Hz32000 = 0x01,
    /// 44100 Hz
    Hz44100 = 0x02,
    /// 48000 Hz
    Hz48000 = 0x03,
}

impl Frequency {
    /// Sample rate in Hz
    pub fn hz(self) -> u32 {
        match self {
            Self::Hz16000 => 16000,
            Self::Hz32000 => 32000,
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
        }
    }
}

/// Library channel mode code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Mono
    Mono = 0x00,
    /// Dual channel
    DualChannel = 0x01,
    /// Stereo
    Stereo = 0x02,
    /// Joint stereo
    JointStereo = 0x03,
}

/// Library allocation method code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Allocation {
    /// Loudness
    Loudness = 0x00,
    /// SNR
    Snr = 0x01,
}

/// Library subband code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Subbands {
    /// 4 subbands
    Four = 0x00,
    /// 8 subbands
    Eight = 0x01,
}

impl Subbands {
    /// Number of subbands
    pub fn count(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// Library block length code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Blocks {
    /// 4 blocks
    Four = 0x00,
    /// 8 blocks
    Eight = 0x01,
    /// 12 blocks
    Twelve = 0x02,
    /// 16 blocks
    Sixteen = 0x03,
}

impl Blocks {
    /// Number of blocks
    pub fn count(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Twelve => 12,
            Self::Sixteen => 16,
        }
    }
}

/// Encoder parameters in library codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcParams {
    /// Sampling frequency
    pub frequency: Frequency,
    /// Channel mode
    pub mode: Mode,
    /// Subbands
    pub subbands: Subbands,
    /// Allocation method
    pub allocation: Allocation,
    /// Block length
    pub blocks: Blocks,
    /// Bitpool
    pub bitpool: u8,
}

impl SbcParams {
    /// Number of audio channels
    pub fn channels(&self) -> usize {
        match self.mode {
            Mode::Mono => 1,
            Mode::DualChannel | Mode::Stereo | Mode::JointStereo => 2,
        }
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.frequency.hz()
    }

    /// PCM bytes (16-bit samples) consumed per SBC frame
    pub fn codesize(&self) -> usize {
        self.subbands.count() * self.blocks.count() * self.channels() * 2
    }

    /// Encoded bytes per SBC frame
    pub fn frame_length(&self) -> usize {
        let subbands = self.subbands.count();
        let blocks = self.blocks.count();
        let channels = self.channels();
        let bitpool = self.bitpool as usize;

        // Header and scale factors
        let mut length = 4 + (4 * subbands * channels) / 8;

        // Audio samples, rounded up to a whole byte
        length += match self.mode {
            Mode::Mono | Mode::DualChannel => (blocks * channels * bitpool + 7) / 8,
            Mode::Stereo => (blocks * bitpool + 7) / 8,
            Mode::JointStereo => (subbands + blocks * bitpool + 7) / 8,
        };

        length
    }

    /// Encoded bitrate in bits per second
    pub fn bitrate(&self) -> u32 {
        let samples_per_frame = (self.subbands.count() * self.blocks.count()) as u64;
        let bits_per_frame = 8 * self.frame_length() as u64;
        (bits_per_frame * self.sample_rate() as u64 / samples_per_frame) as u32
    }
}

impl TryFrom<&SbcConfiguration> for SbcParams {
    type Error = CodecError;

    fn try_from(config: &SbcConfiguration) -> Result<Self> {
        let frequency = match config.frequency.0 {
            SbcSamplingFrequency::HZ_16000 => Frequency::Hz16000,
            SbcSamplingFrequency::HZ_32000 => Frequency::Hz32000,
            SbcSamplingFrequency::HZ_44100 => Frequency::Hz44100,
            SbcSamplingFrequency::HZ_48000 => Frequency::Hz48000,
            other => return Err(unknown("sampling frequency", other)),
        };
        let mode = match config.channel_mode.0 {
            SbcChannelMode::MONO => Mode::Mono,
            SbcChannelMode::DUAL_CHANNEL => Mode::DualChannel,
            SbcChannelMode::STEREO => Mode::Stereo,
            SbcChannelMode::JOINT_STEREO => Mode::JointStereo,
            other => return Err(unknown("channel mode", other)),
        };
        let subbands = match config.subbands.0 {
            SbcSubbands::SUBBANDS_4 => Subbands::Four,
            SbcSubbands::SUBBANDS_8 => Subbands::Eight,
            other => return Err(unknown("subbands", other)),
        };
        let allocation = match config.allocation_method.0 {
            SbcAllocationMethod::LOUDNESS => Allocation::Loudness,
            SbcAllocationMethod::SNR => Allocation::Snr,
            other => return Err(unknown("allocation method", other)),
        };
        let blocks = match config.block_length.0 {
            SbcBlockLength::BLOCKS_4 => Blocks::Four,
            SbcBlockLength::BLOCKS_8 => Blocks::Eight,
            SbcBlockLength::BLOCKS_12 => Blocks::Twelve,
            SbcBlockLength::BLOCKS_16 => Blocks::Sixteen,
            other => return Err(unknown("block length", other)),
        };

        Ok(Self {
            frequency,
            mode,
            subbands,
            allocation,
            blocks,
            bitpool: config.bitpool,
        })
    }
}

fn unknown(field: &str, value: u8) -> CodecError {
    CodecError::invalid_config(format!("unsupported SBC {} flag 0x{:02x}", field, value))
}
