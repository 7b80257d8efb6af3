//! A2DP packetizer
//!
//! [`A2dpInfo`] turns a stream of PCM bytes into A2DP media packets. Encoded
//! SBC frames are appended behind a reserved header region in a single
//! reusable transmit buffer. Once another frame would no longer fit in the
//! link MTU the headers are written in place and the whole buffer is sent in
//! one non-blocking call.
//!
//! The packetizer moves through three observable states:
//!
//! - **Empty**: only the header region is in use
//! - **Accumulating**: frames are buffered and another one still fits
//! - **Ready to flush**: another frame would exceed the link MTU
//!
//! A full buffer is not an error: [`A2dpInfo::encode`] returns `Ok(0)` and
//! the caller flushes before trying again. Codec and transport failures are
//! returned to the caller untouched; nothing is retried here.
//!
//! There is no internal synchronization. One audio thread owns the
//! packetizer and sequences encode and flush calls.

use std::fmt;

use btaudio_codec_core::codecs::sbc::{SbcBackendFactory, SbcConfiguration};
use btaudio_codec_core::{AudioCodec, CodecError, CodecFactory, CodecInfo};
use tracing::{debug, error, trace, warn};

use crate::buffer::TransmitBuffer;
use crate::config::A2dpConfig;
use crate::error::Error;
use crate::packet::{write_headers, RtpHeader, SbcMediaHeader, HEADER_SIZE, MAX_FRAME_COUNT};
use crate::stats::PacketizerStats;
use crate::transport::PacketTransport;
use crate::{Result, RtpSequenceNumber, RtpTimestamp};

/// Observable packetizer state relative to a link MTU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketizerState {
    /// Header only; nothing to send
    Empty,
    /// Frames buffered, more fit below the MTU
    Accumulating,
    /// Another frame would exceed the MTU
    ReadyToFlush,
}

/// A2DP SBC packetizer for one stream
pub struct A2dpInfo {
    codec: Box<dyn AudioCodec>,
    buffer: TransmitBuffer,
    config: A2dpConfig,
    codesize: usize,
    frame_length: usize,
    frame_count: usize,
    seq_num: RtpSequenceNumber,
    samples: u32,
    total_samples: RtpTimestamp,
    stats: PacketizerStats,
}

impl A2dpInfo {
    /// Create a packetizer with an SBC codec for a negotiated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodecInit`] if the SBC codec cannot be created, or
    /// [`Error::InvalidConfig`] for an unusable packetizer configuration.
    pub fn init<F>(sbc: &SbcConfiguration, factory: &F, config: A2dpConfig) -> Result<Self>
    where
        F: SbcBackendFactory,
        F::Backend: 'static,
    {
        config.validate()?;
        let codec = CodecFactory::create_sbc(sbc, factory).map_err(|e| {
            error!("Failed to create SBC codec: {}", e);
            Error::CodecInit(e)
        })?;
        Self::with_codec(codec, config)
    }

    /// Create a packetizer around an already constructed codec
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unusable configuration.
    pub fn with_codec(codec: Box<dyn AudioCodec>, config: A2dpConfig) -> Result<Self> {
        config.validate()?;
        let buffer = TransmitBuffer::new(config.buffer_capacity, HEADER_SIZE)?;
        let codesize = codec.codesize();
        let frame_length = codec.frame_length();

        debug!(
            "A2DP packetizer ready: codec {}, codesize {}, frame length {}, buffer {} bytes",
            codec.info().codec_type,
            codesize,
            frame_length,
            config.buffer_capacity
        );

        Ok(Self {
            codec,
            buffer,
            config,
            codesize,
            frame_length,
            frame_count: 0,
            seq_num: 0,
            samples: 0,
            total_samples: 0,
            stats: PacketizerStats::default(),
        })
    }

    /// Encode PCM into the transmit buffer
    ///
    /// `link_mtu` is clamped to the buffer capacity. Returns the number of
    /// PCM bytes consumed, which is 0 when the buffer is already full and
    /// must be flushed first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodecEncode`] if the codec fails; no state changes in
    /// that case. Returns [`Error::InvalidArgument`] for a zero
    /// `bytes_per_sample`.
    pub fn encode(&mut self, pcm: &[u8], bytes_per_sample: usize, link_mtu: usize) -> Result<usize> {
        if bytes_per_sample == 0 {
            return Err(Error::InvalidArgument(
                "bytes per sample must be non-zero".to_string(),
            ));
        }

        let limit = self.encode_limit(link_mtu);
        if self.buffer.used() >= limit {
            self.stats.buffer_full_events += 1;
            trace!(
                "Transmit buffer full at {} bytes, {} frames",
                self.buffer.used(),
                self.frame_count
            );
            return Ok(0);
        }

        self.stats.encode_calls += 1;
        let out = self.buffer.spare_mut(limit);
        let room = out.len();
        let progress = self.codec.encode(pcm, out).map_err(|e| {
            error!("a2dp encode error: {}", e);
            Error::CodecEncode(e)
        })?;

        if progress.produced > room || progress.consumed > pcm.len() {
            error!(
                "Codec overran its buffers: consumed {}/{} produced {}/{}",
                progress.consumed,
                pcm.len(),
                progress.produced,
                room
            );
            return Err(Error::CodecEncode(CodecError::BufferTooSmall {
                needed: progress.produced,
                actual: room,
            }));
        }

        self.buffer.commit(progress.produced)?;
        if self.codesize > 0 {
            self.frame_count += progress.consumed / self.codesize;
        }
        let sample_frames = (progress.consumed / bytes_per_sample) as u32;
        self.samples = self.samples.wrapping_add(sample_frames);
        self.total_samples = self.total_samples.wrapping_add(sample_frames);

        trace!(
            "Encoded {} PCM bytes into {} bytes, buffer {} bytes, {} frames",
            progress.consumed,
            progress.produced,
            self.buffer.used(),
            self.frame_count
        );

        Ok(progress.consumed)
    }

    /// Send the buffered packet if another frame would not fit in `link_mtu`
    ///
    /// Returns the number of PCM sample frames sent, or 0 if no packet was
    /// due. An empty buffer is never sent from here.
    ///
    /// The check is `buffer_used + frame_length > link_mtu`. `buffer_used`
    /// already counts the 13 header bytes, so the header is not subtracted
    /// from the MTU a second time.
    ///
    /// # Errors
    ///
    /// Same as [`A2dpInfo::flush`].
    pub fn maybe_flush<T>(&mut self, transport: &mut T, link_mtu: usize) -> Result<usize>
    where
        T: PacketTransport + ?Sized,
    {
        if self.state(link_mtu) == PacketizerState::ReadyToFlush {
            return self.flush(transport);
        }
        Ok(0)
    }

    /// Write the packet headers and send the buffer unconditionally
    ///
    /// On success the packetizer returns to Empty with the sequence number
    /// advanced by one, and the number of PCM sample frames sent is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportSend`] if the send fails (including
    /// `WouldBlock`) or [`Error::ShortSend`] if only part of the packet was
    /// taken. The buffered packet and all counters are left unchanged so the
    /// same packet can be sent again later.
    pub fn flush<T>(&mut self, transport: &mut T) -> Result<usize>
    where
        T: PacketTransport + ?Sized,
    {
        let rtp = RtpHeader::new(
            self.config.payload_type,
            self.seq_num,
            self.packet_timestamp(),
            self.config.ssrc,
        );
        let media = SbcMediaHeader::new(self.frame_count.min(MAX_FRAME_COUNT as usize) as u8);
        write_headers(self.buffer.header_mut(), &rtp, &media)?;

        let expected = self.buffer.used();
        match transport.send_packet(self.buffer.as_slice()) {
            Ok(sent) if sent == expected => {}
            Ok(sent) => {
                self.stats.send_failures += 1;
                warn!("Short send of A2DP packet: {} of {} bytes", sent, expected);
                return Err(Error::ShortSend { sent, expected });
            }
            Err(e) => {
                self.stats.send_failures += 1;
                trace!("A2DP packet send failed: {}", e);
                return Err(Error::TransportSend(e));
            }
        }

        let samples = self.samples;
        self.stats.packets_sent += 1;
        self.stats.bytes_sent += expected as u64;
        self.stats.frames_sent += self.frame_count as u64;

        trace!(
            "Sent A2DP packet seq {} ts {}: {} bytes, {} frames, {} samples",
            rtp.sequence_number,
            rtp.timestamp,
            expected,
            self.frame_count,
            samples
        );

        self.buffer.reset();
        self.frame_count = 0;
        self.samples = 0;
        self.seq_num = self.seq_num.wrapping_add(1);

        Ok(samples as usize)
    }

    /// Discard buffered audio without sending it
    ///
    /// Resets the buffer, frame count, queued samples and sequence number.
    /// The running sample total used for timestamps is kept.
    pub fn drain(&mut self) {
        if !self.buffer.is_empty() || self.samples != 0 || self.frame_count != 0 {
            self.stats.drains += 1;
            debug!(
                "Draining A2DP buffer: {} bytes, {} frames, {} samples discarded",
                self.buffer.used() - HEADER_SIZE,
                self.frame_count,
                self.samples
            );
        }
        self.buffer.reset();
        self.frame_count = 0;
        self.samples = 0;
        self.seq_num = 0;
    }

    /// Current state relative to `link_mtu`
    pub fn state(&self, link_mtu: usize) -> PacketizerState {
        if self.buffer.is_empty() && self.frame_count == 0 {
            return PacketizerState::Empty;
        }
        let link_mtu = link_mtu.min(self.buffer.capacity());
        if self.buffer.used() + self.frame_length > link_mtu
            || self.frame_count >= MAX_FRAME_COUNT as usize
        {
            PacketizerState::ReadyToFlush
        } else {
            PacketizerState::Accumulating
        }
    }

    /// PCM sample frames buffered but not yet sent
    pub fn queued_sample_frames(&self) -> usize {
        self.samples as usize
    }

    /// PCM bytes the codec consumes per encoded frame
    pub fn codesize(&self) -> usize {
        self.codesize
    }

    /// Encoded bytes per frame
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// PCM bytes equivalent to `encoded_bytes` of whole encoded frames
    pub fn block_size(&self, encoded_bytes: usize) -> usize {
        if self.frame_length == 0 {
            return 0;
        }
        encoded_bytes / self.frame_length * self.codesize
    }

    /// Encoded frames in the buffer
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Sequence number of the next packet
    pub fn seq_num(&self) -> RtpSequenceNumber {
        self.seq_num
    }

    /// Bytes in use, headers included
    pub fn buffer_used(&self) -> usize {
        self.buffer.used()
    }

    /// PCM sample frames encoded since creation (wrapping)
    pub fn total_samples(&self) -> RtpTimestamp {
        self.total_samples
    }

    /// The buffered packet; headers are only valid after a flush attempt
    pub fn pending_packet(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Packetizer counters
    pub fn stats(&self) -> &PacketizerStats {
        &self.stats
    }

    /// Configuration this packetizer was built with
    pub fn config(&self) -> &A2dpConfig {
        &self.config
    }

    /// Information about the owned codec
    pub fn codec_info(&self) -> CodecInfo {
        self.codec.info()
    }

    /// Timestamp of the first sample in the buffered packet
    fn packet_timestamp(&self) -> RtpTimestamp {
        self.total_samples.wrapping_sub(self.samples)
    }

    /// Highest `buffer_used` an encode may reach
    ///
    /// The link MTU clamped to the buffer, further capped so the frame count
    /// stays within the 4-bit media header field.
    fn encode_limit(&self, link_mtu: usize) -> usize {
        let mut limit = link_mtu.min(self.buffer.capacity());
        if self.frame_length > 0 {
            let frames_left = (MAX_FRAME_COUNT as usize).saturating_sub(self.frame_count);
            limit = limit.min(self.buffer.used() + frames_left * self.frame_length);
        }
        limit
    }
}

impl fmt::Debug for A2dpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("A2dpInfo")
            .field("codec", &self.codec.info())
            .field("buffer_used", &self.buffer.used())
            .field("frame_count", &self.frame_count)
            .field("seq_num", &self.seq_num)
            .field("samples", &self.samples)
            .field("total_samples", &self.total_samples)
            .finish()
    }
}
