//! # A2DP-Core: SBC media packetizer for Bluetooth audio streaming
//!
//! Converts PCM audio into A2DP media packets and pushes them to a
//! non-blocking transport such as an L2CAP media socket.
//!
//! ## Features
//!
//! - **Packetizer**: [`A2dpInfo`] accumulates encoded SBC frames behind a
//!   reserved RTP and media header region and flushes whole packets
//! - **Wire format**: RTP header and SBC media payload header encoding and
//!   parsing in [`packet`]
//! - **Transports**: [`PacketTransport`] for `socket2` sockets, UDP and unix
//!   datagram sockets
//! - **Configuration**: [`A2dpConfig`] with builder and JSON loading
//!
//! ## Usage
//!
//! ```rust
//! use btaudio_a2dp_core::{A2dpConfig, A2dpInfo, PacketTransport};
//! use btaudio_codec_core::CodecFactory;
//!
//! struct Sink(Vec<Vec<u8>>);
//!
//! impl PacketTransport for Sink {
//!     fn send_packet(&mut self, packet: &[u8]) -> std::io::Result<usize> {
//!         self.0.push(packet.to_vec());
//!         Ok(packet.len())
//!     }
//! }
//!
//! let codec = CodecFactory::create_loopback(64)?;
//! let mut a2dp = A2dpInfo::with_codec(codec, A2dpConfig::default())?;
//! let mut sink = Sink(Vec::new());
//!
//! let pcm = [0u8; 512];
//! let mut offset = 0;
//! while offset < pcm.len() {
//!     let consumed = a2dp.encode(&pcm[offset..], 4, 200)?;
//!     offset += consumed;
//!     if consumed == 0 {
//!         a2dp.flush(&mut sink)?;
//!     } else {
//!         a2dp.maybe_flush(&mut sink, 200)?;
//!     }
//! }
//! if a2dp.frame_count() > 0 {
//!     a2dp.flush(&mut sink)?;
//! }
//! assert_eq!(sink.0.len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod packet;
pub mod packetizer;
pub mod stats;
pub mod transport;

/// RTP sequence number
pub type RtpSequenceNumber = u16;

/// RTP timestamp, in PCM sample frames for A2DP
pub type RtpTimestamp = u32;

/// RTP synchronization source
pub type RtpSsrc = u32;

// Re-export commonly used types
pub use config::{A2dpConfig, A2dpConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use packet::{MediaPacket, RtpHeader, SbcMediaHeader, HEADER_SIZE};
pub use packetizer::{A2dpInfo, PacketizerState};
pub use stats::PacketizerStats;
pub use transport::PacketTransport;

/// Version information for the packetizer library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
