//! Packetizer configuration
//!
//! Defaults match what A2DP sinks expect from a source: payload type 1,
//! SSRC 1 and a 2048-byte transmit buffer, which is larger than any L2CAP
//! media MTU negotiated in practice.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::packet::HEADER_SIZE;
use crate::Result;

/// Default transmit buffer capacity in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;
/// Default RTP payload type
pub const DEFAULT_PAYLOAD_TYPE: u8 = 1;
/// Default RTP synchronization source
pub const DEFAULT_SSRC: u32 = 1;

/// Packetizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A2dpConfig {
    /// Transmit buffer capacity; link MTUs above it are clamped
    pub buffer_capacity: usize,
    /// RTP payload type written into every packet
    pub payload_type: u8,
    /// RTP synchronization source written into every packet
    pub ssrc: u32,
}

impl A2dpConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce packets
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity <= HEADER_SIZE {
            return Err(Error::InvalidConfig(format!(
                "buffer capacity {} must exceed the {} byte header",
                self.buffer_capacity, HEADER_SIZE
            )));
        }
        if self.payload_type > 0x7F {
            return Err(Error::InvalidConfig(format!(
                "payload type {} does not fit in 7 bits",
                self.payload_type
            )));
        }
        Ok(())
    }
}

impl Default for A2dpConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            payload_type: DEFAULT_PAYLOAD_TYPE,
            ssrc: DEFAULT_SSRC,
        }
    }
}

/// Builder for A2dpConfig
#[derive(Debug, Clone)]
pub struct A2dpConfigBuilder {
    config: A2dpConfig,
}

impl A2dpConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: A2dpConfig::default(),
        }
    }

    /// Set the transmit buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// Set the RTP payload type
    pub fn payload_type(mut self, pt: u8) -> Self {
        self.config.payload_type = pt;
        self
    }

    /// Set the RTP SSRC
    pub fn ssrc(mut self, ssrc: u32) -> Self {
        self.config.ssrc = ssrc;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<A2dpConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for A2dpConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
