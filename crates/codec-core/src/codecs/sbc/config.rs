//! A2DP SBC codec information element
//!
//! Each field is a bit-flag set as carried by AVDTP capability exchange.
//! A *capability* may have several bits set per field; a negotiated
//! *configuration* has exactly one.

use crate::error::{CodecError, Result};

/// Minimum bitpool allowed by the A2DP specification
pub const MIN_BITPOOL: u8 = 2;
/// Maximum bitpool allowed by the A2DP specification
pub const MAX_BITPOOL: u8 = 250;
/// Bitpool most sources cap themselves at for high quality joint stereo
pub const HIGH_QUALITY_BITPOOL: u8 = 53;

/// SBC sampling frequency flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcSamplingFrequency(pub u8);

impl SbcSamplingFrequency {
    /// 16000 Hz
    pub const HZ_16000: u8 = 0x08;
    /// 32000 Hz
    pub const HZ_32000: u8 = 0x04;
    /// 44100 Hz
    pub const HZ_44100: u8 = 0x02;
    /// 48000 Hz
    pub const HZ_48000: u8 = 0x01;

    /// All frequencies
    pub const fn all() -> Self {
        Self(Self::HZ_16000 | Self::HZ_32000 | Self::HZ_44100 | Self::HZ_48000)
    }

    /// Check if a frequency flag is set
    pub const fn supports(&self, freq: u8) -> bool {
        (self.0 & freq) != 0
    }
}

/// SBC channel mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcChannelMode(pub u8);

impl SbcChannelMode {
    /// Mono
    pub const MONO: u8 = 0x08;
    /// Dual channel
    pub const DUAL_CHANNEL: u8 = 0x04;
    /// Stereo
    pub const STEREO: u8 = 0x02;
    /// Joint stereo
    pub const JOINT_STEREO: u8 = 0x01;

    /// All modes
    pub const fn all() -> Self {
        Self(Self::MONO | Self::DUAL_CHANNEL | Self::STEREO | Self::JOINT_STEREO)
    }

    /// Check if a mode flag is set
    pub const fn supports(&self, mode: u8) -> bool {
        (self.0 & mode) != 0
    }
}

/// SBC block length flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcBlockLength(pub u8);

impl SbcBlockLength {
    /// 4 blocks
    pub const BLOCKS_4: u8 = 0x08;
    /// 8 blocks
    pub const BLOCKS_8: u8 = 0x04;
    /// 12 blocks
    pub const BLOCKS_12: u8 = 0x02;
    /// 16 blocks
    pub const BLOCKS_16: u8 = 0x01;

    /// All block lengths
    pub const fn all() -> Self {
        Self(Self::BLOCKS_4 | Self::BLOCKS_8 | Self::BLOCKS_12 | Self::BLOCKS_16)
    }

    /// Check if a block length flag is set
    pub const fn supports(&self, blocks: u8) -> bool {
        (self.0 & blocks) != 0
    }
}

/// SBC subband flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcSubbands(pub u8);

impl SbcSubbands {
    /// 4 subbands
    pub const SUBBANDS_4: u8 = 0x02;
    /// 8 subbands
    pub const SUBBANDS_8: u8 = 0x01;

    /// All subband counts
    pub const fn all() -> Self {
        Self(Self::SUBBANDS_4 | Self::SUBBANDS_8)
    }

    /// Check if a subband flag is set
    pub const fn supports(&self, subbands: u8) -> bool {
        (self.0 & subbands) != 0
    }
}

/// SBC allocation method flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcAllocationMethod(pub u8);

impl SbcAllocationMethod {
    /// SNR allocation
    pub const SNR: u8 = 0x02;
    /// Loudness allocation
    pub const LOUDNESS: u8 = 0x01;

    /// All allocation methods
    pub const fn all() -> Self {
        Self(Self::SNR | Self::LOUDNESS)
    }

    /// Check if an allocation flag is set
    pub const fn supports(&self, method: u8) -> bool {
        (self.0 & method) != 0
    }
}

/// Negotiated SBC stream configuration
///
/// This is the input the codec is created from: one flag per field plus the
/// bitpool the encoder should run at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcConfiguration {
    /// Sampling frequency (single flag)
    pub frequency: SbcSamplingFrequency,
    /// Channel mode (single flag)
    pub channel_mode: SbcChannelMode,
    /// Subbands (single flag)
    pub subbands: SbcSubbands,
    /// Allocation method (single flag)
    pub allocation_method: SbcAllocationMethod,
    /// Block length (single flag)
    pub block_length: SbcBlockLength,
    /// Encoder bitpool
    pub bitpool: u8,
}

impl SbcConfiguration {
    /// Build a configuration from raw flag values
    pub const fn new(
        frequency: u8,
        channel_mode: u8,
        subbands: u8,
        allocation_method: u8,
        block_length: u8,
        bitpool: u8,
    ) -> Self {
        Self {
            frequency: SbcSamplingFrequency(frequency),
            channel_mode: SbcChannelMode(channel_mode),
            subbands: SbcSubbands(subbands),
            allocation_method: SbcAllocationMethod(allocation_method),
            block_length: SbcBlockLength(block_length),
            bitpool,
        }
    }

    /// Validate that exactly one flag is selected per field
    ///
    /// # Errors
    /// Returns `InvalidConfig` naming the offending field
    pub fn validate(&self) -> Result<()> {
        single_flag("sampling frequency", self.frequency.0, SbcSamplingFrequency::all().0)?;
        single_flag("channel mode", self.channel_mode.0, SbcChannelMode::all().0)?;
        single_flag("subbands", self.subbands.0, SbcSubbands::all().0)?;
        single_flag(
            "allocation method",
            self.allocation_method.0,
            SbcAllocationMethod::all().0,
        )?;
        single_flag("block length", self.block_length.0, SbcBlockLength::all().0)?;

        if !(MIN_BITPOOL..=MAX_BITPOOL).contains(&self.bitpool) {
            return Err(CodecError::invalid_config(format!(
                "bitpool {} outside {}..={}",
                self.bitpool, MIN_BITPOOL, MAX_BITPOOL
            )));
        }
        Ok(())
    }

    /// Pack into the 4-byte codec information element
    ///
    /// The bitpool is written as both the minimum and the maximum.
    pub fn to_capability_bytes(&self) -> [u8; 4] {
        [
            (self.frequency.0 << 4) | self.channel_mode.0,
            (self.block_length.0 << 4) | (self.subbands.0 << 2) | self.allocation_method.0,
            self.bitpool,
            self.bitpool,
        ]
    }
}

impl Default for SbcConfiguration {
    fn default() -> Self {
        Self::new(
            SbcSamplingFrequency::HZ_44100,
            SbcChannelMode::JOINT_STEREO,
            SbcSubbands::SUBBANDS_8,
            SbcAllocationMethod::LOUDNESS,
            SbcBlockLength::BLOCKS_16,
            HIGH_QUALITY_BITPOOL,
        )
    }
}

fn single_flag(field: &str, value: u8, mask: u8) -> Result<()> {
    if value & !mask != 0 || value.count_ones() != 1 {
        return Err(CodecError::invalid_config(format!(
            "{} must select exactly one option, got 0x{:02x}",
            field, value
        )));
    }
    Ok(())
}

/// SBC capabilities advertised by a peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbcCapabilities {
    /// Supported sampling frequencies
    pub sampling_frequencies: SbcSamplingFrequency,
    /// Supported channel modes
    pub channel_modes: SbcChannelMode,
    /// Supported block lengths
    pub block_lengths: SbcBlockLength,
    /// Supported subbands
    pub subbands: SbcSubbands,
    /// Supported allocation methods
    pub allocation_methods: SbcAllocationMethod,
    /// Minimum bitpool
    pub min_bitpool: u8,
    /// Maximum bitpool
    pub max_bitpool: u8,
}

impl SbcCapabilities {
    /// Parse the 4-byte codec information element
    ///
    /// # Errors
    /// Returns `InvalidConfig` if fewer than 4 bytes are given or the bitpool
    /// range is inverted
    pub fn from_capability_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(CodecError::invalid_config(format!(
                "SBC codec information element needs 4 bytes, got {}",
                bytes.len()
            )));
        }

        let caps = Self {
            sampling_frequencies: SbcSamplingFrequency(bytes[0] >> 4),
            channel_modes: SbcChannelMode(bytes[0] & 0x0F),
            block_lengths: SbcBlockLength(bytes[1] >> 4),
            subbands: SbcSubbands((bytes[1] >> 2) & 0x03),
            allocation_methods: SbcAllocationMethod(bytes[1] & 0x03),
            min_bitpool: bytes[2],
            max_bitpool: bytes[3],
        };

        if caps.min_bitpool > caps.max_bitpool {
            return Err(CodecError::invalid_config(format!(
                "min bitpool {} above max bitpool {}",
                caps.min_bitpool, caps.max_bitpool
            )));
        }
        Ok(caps)
    }

    /// Pack into the 4-byte codec information element
    pub fn to_capability_bytes(&self) -> [u8; 4] {
        [
            (self.sampling_frequencies.0 << 4) | self.channel_modes.0,
            (self.block_lengths.0 << 4) | (self.subbands.0 << 2) | self.allocation_methods.0,
            self.min_bitpool,
            self.max_bitpool,
        ]
    }

    /// Pick the highest quality configuration these capabilities allow
    ///
    /// Preference order: 48 kHz, 44.1 kHz, 32 kHz, 16 kHz; joint stereo,
    /// stereo, dual channel, mono; 16 blocks first; 8 subbands; loudness.
    /// The bitpool is the peer maximum capped at [`HIGH_QUALITY_BITPOOL`].
    ///
    /// # Errors
    /// Returns `InvalidConfig` if a field has no supported option
    pub fn select_configuration(&self) -> Result<SbcConfiguration> {
        let frequency = pick(
            "sampling frequency",
            self.sampling_frequencies.0,
            &[
                SbcSamplingFrequency::HZ_48000,
                SbcSamplingFrequency::HZ_44100,
                SbcSamplingFrequency::HZ_32000,
                SbcSamplingFrequency::HZ_16000,
            ],
        )?;
        let channel_mode = pick(
            "channel mode",
            self.channel_modes.0,
            &[
                SbcChannelMode::JOINT_STEREO,
                SbcChannelMode::STEREO,
                SbcChannelMode::DUAL_CHANNEL,
                SbcChannelMode::MONO,
            ],
        )?;
        let block_length = pick(
            "block length",
            self.block_lengths.0,
            &[
                SbcBlockLength::BLOCKS_16,
                SbcBlockLength::BLOCKS_12,
                SbcBlockLength::BLOCKS_8,
                SbcBlockLength::BLOCKS_4,
            ],
        )?;
        let subbands = pick(
            "subbands",
            self.subbands.0,
            &[SbcSubbands::SUBBANDS_8, SbcSubbands::SUBBANDS_4],
        )?;
        let allocation_method = pick(
            "allocation method",
            self.allocation_methods.0,
            &[SbcAllocationMethod::LOUDNESS, SbcAllocationMethod::SNR],
        )?;

        let bitpool = self.max_bitpool.min(HIGH_QUALITY_BITPOOL).max(self.min_bitpool);

        let config = SbcConfiguration::new(
            frequency,
            channel_mode,
            subbands,
            allocation_method,
            block_length,
            bitpool,
        );
        config.validate()?;
        Ok(config)
    }
}

impl Default for SbcCapabilities {
    fn default() -> Self {
        Self {
            sampling_frequencies: SbcSamplingFrequency::all(),
            channel_modes: SbcChannelMode::all(),
            block_lengths: SbcBlockLength::all(),
            subbands: SbcSubbands::all(),
            allocation_methods: SbcAllocationMethod::all(),
            min_bitpool: MIN_BITPOOL,
            max_bitpool: HIGH_QUALITY_BITPOOL,
        }
    }
}

fn pick(field: &str, supported: u8, preference: &[u8]) -> Result<u8> {
    preference
        .iter()
        .copied()
        .find(|flag| supported & flag != 0)
        .ok_or_else(|| {
            CodecError::invalid_config(format!("peer supports no {} (0x{:02x})", field, supported))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(SbcConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_configuration_rejects_multiple_flags() {
        let mut config = SbcConfiguration::default();
        config.channel_mode = SbcChannelMode::all();
        assert!(config.validate().is_err());

        let mut config = SbcConfiguration::default();
        config.frequency = SbcSamplingFrequency(0);
        assert!(config.validate().is_err());

        let mut config = SbcConfiguration::default();
        config.subbands = SbcSubbands(0x04);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_rejects_bitpool() {
        let mut config = SbcConfiguration::default();
        config.bitpool = 1;
        assert!(config.validate().is_err());
        config.bitpool = 251;
        assert!(config.validate().is_err());
        config.bitpool = 250;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capability_bytes() {
        let config = SbcConfiguration::new(
            SbcSamplingFrequency::HZ_48000,
            SbcChannelMode::JOINT_STEREO,
            SbcSubbands::SUBBANDS_8,
            SbcAllocationMethod::LOUDNESS,
            SbcBlockLength::BLOCKS_16,
            50,
        );
        assert_eq!(config.to_capability_bytes(), [0x11, 0x15, 50, 50]);

        let caps = SbcCapabilities::from_capability_bytes(&[0xFF, 0xFF, 2, 53]).unwrap();
        assert_eq!(caps, SbcCapabilities::default());
        assert_eq!(caps.to_capability_bytes(), [0xFF, 0xFF, 2, 53]);
    }

    #[test]
    fn test_capability_bytes_rejects_short_or_inverted() {
        assert!(SbcCapabilities::from_capability_bytes(&[0xFF, 0xFF, 2]).is_err());
        assert!(SbcCapabilities::from_capability_bytes(&[0xFF, 0xFF, 60, 40]).is_err());
    }

    #[test]
    fn test_select_configuration_prefers_quality() {
        let config = SbcCapabilities::default().select_configuration().unwrap();
        assert!(config.frequency.supports(SbcSamplingFrequency::HZ_48000));
        assert!(config.channel_mode.supports(SbcChannelMode::JOINT_STEREO));
        assert!(config.block_length.supports(SbcBlockLength::BLOCKS_16));
        assert!(config.subbands.supports(SbcSubbands::SUBBANDS_8));
        assert!(config.allocation_method.supports(SbcAllocationMethod::LOUDNESS));
        assert_eq!(config.bitpool, HIGH_QUALITY_BITPOOL);
    }

    #[test]
    fn test_select_configuration_respects_peer() {
        let caps = SbcCapabilities {
            sampling_frequencies: SbcSamplingFrequency(SbcSamplingFrequency::HZ_16000),
            channel_modes: SbcChannelMode(SbcChannelMode::MONO),
            block_lengths: SbcBlockLength(SbcBlockLength::BLOCKS_8),
            subbands: SbcSubbands(SbcSubbands::SUBBANDS_4),
            allocation_methods: SbcAllocationMethod(SbcAllocationMethod::SNR),
            min_bitpool: 2,
            max_bitpool: 32,
        };
        let config = caps.select_configuration().unwrap();
        assert_eq!(config.to_capability_bytes(), [0x88, 0x4A, 32, 32]);
    }

    #[test]
    fn test_select_configuration_missing_field() {
        let mut caps = SbcCapabilities::default();
        caps.allocation_methods = SbcAllocationMethod(0);
        assert!(caps.select_configuration().is_err());
    }
}
