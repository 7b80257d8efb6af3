//! Shared helpers for packetizer integration tests

#![allow(dead_code)]

use btaudio_codec_core::codecs::sbc::{SbcBackend, SbcLibError, SbcParams};
use std::io;

/// First byte of every frame the fake library produces
pub const SYNCWORD: u8 = 0x9C;

/// SBC library stand-in with real frame geometry
///
/// Frames carry the syncword followed by the low byte of the frame index.
pub struct FakeSbc {
    codesize: usize,
    frame_length: usize,
    frames: usize,
    fail_at: Option<usize>,
}

impl FakeSbc {
    pub fn new(params: &SbcParams) -> Self {
        Self {
            codesize: params.codesize(),
            frame_length: params.frame_length(),
            frames: 0,
            fail_at: None,
        }
    }
}

impl SbcBackend for FakeSbc {
    fn codesize(&self) -> usize {
        self.codesize
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn encode_frame(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize), SbcLibError> {
        if input.len() < self.codesize {
            return Ok((0, 0));
        }
        if output.len() < self.frame_length {
            return Err(SbcLibError::NoSpace);
        }
        if self.fail_at == Some(self.frames) {
            return Err(SbcLibError::Failed(-5));
        }

        output[0] = SYNCWORD;
        for byte in &mut output[1..self.frame_length] {
            *byte = self.frames as u8;
        }
        self.frames += 1;
        Ok((self.codesize, self.frame_length))
    }

    fn decode_frame(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize), SbcLibError> {
        if input.first() != Some(&SYNCWORD) {
            return Err(SbcLibError::Failed(-1));
        }
        output[..self.codesize].fill(0);
        Ok((self.frame_length, self.codesize))
    }
}

pub fn fake_factory(params: &SbcParams) -> Result<FakeSbc, SbcLibError> {
    Ok(FakeSbc::new(params))
}

/// Library that fails on the frame with the given index
pub fn failing_encoder(fail_at: usize) -> impl Fn(&SbcParams) -> Result<FakeSbc, SbcLibError> {
    move |params: &SbcParams| {
        let mut sbc = FakeSbc::new(params);
        sbc.fail_at = Some(fail_at);
        Ok(sbc)
    }
}

/// Library that cannot be initialized
pub fn unavailable_factory(_params: &SbcParams) -> Result<FakeSbc, SbcLibError> {
    Err(SbcLibError::Failed(-12))
}

/// Transport that keeps every packet it is given
#[derive(Default)]
pub struct RecordingTransport {
    pub packets: Vec<Vec<u8>>,
}

impl btaudio_a2dp_core::PacketTransport for RecordingTransport {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        self.packets.push(packet.to_vec());
        Ok(packet.len())
    }
}

/// Transport that takes `budget` packets and then reports a full socket
pub struct CongestedTransport {
    pub inner: RecordingTransport,
    pub budget: usize,
}

impl CongestedTransport {
    pub fn new(budget: usize) -> Self {
        Self {
            inner: RecordingTransport::default(),
            budget,
        }
    }
}

impl btaudio_a2dp_core::PacketTransport for CongestedTransport {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::from(io::ErrorKind::WouldBlock));
        }
        self.budget -= 1;
        self.inner.send_packet(packet)
    }
}

/// Install a test subscriber so `RUST_LOG` output shows up
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
