//! Whole-frame properties of the SBC encode and decode loops

use btaudio_codec_core::codecs::sbc::{
    SbcAllocationMethod, SbcBackend, SbcBlockLength, SbcChannelMode, SbcCodec, SbcConfiguration,
    SbcLibError, SbcParams, SbcSamplingFrequency, SbcSubbands,
};
use btaudio_codec_core::AudioCodec;
use proptest::prelude::*;

/// Library stand-in that follows the real frame geometry
struct FrameCounter {
    codesize: usize,
    frame_length: usize,
}

impl SbcBackend for FrameCounter {
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
        output[..self.frame_length].fill(0x9C);
        Ok((self.codesize, self.frame_length))
    }

    fn decode_frame(
        &mut self,
        _input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize), SbcLibError> {
        output[..self.codesize].fill(0);
        Ok((self.frame_length, self.codesize))
    }
}

fn library(params: &SbcParams) -> Result<FrameCounter, SbcLibError> {
    Ok(FrameCounter {
        codesize: params.codesize(),
        frame_length: params.frame_length(),
    })
}

fn configuration() -> impl Strategy<Value = SbcConfiguration> {
    (
        prop::sample::select(vec![
            SbcSamplingFrequency::HZ_16000,
            SbcSamplingFrequency::HZ_32000,
            SbcSamplingFrequency::HZ_44100,
            SbcSamplingFrequency::HZ_48000,
        ]),
        prop::sample::select(vec![
            SbcChannelMode::MONO,
            SbcChannelMode::DUAL_CHANNEL,
            SbcChannelMode::STEREO,
            SbcChannelMode::JOINT_STEREO,
        ]),
        prop::sample::select(vec![SbcSubbands::SUBBANDS_4, SbcSubbands::SUBBANDS_8]),
        prop::sample::select(vec![
            SbcBlockLength::BLOCKS_4,
            SbcBlockLength::BLOCKS_8,
            SbcBlockLength::BLOCKS_12,
            SbcBlockLength::BLOCKS_16,
        ]),
        2u8..=53,
    )
        .prop_map(|(frequency, mode, subbands, blocks, bitpool)| {
            SbcConfiguration::new(
                frequency,
                mode,
                subbands,
                SbcAllocationMethod::LOUDNESS,
                blocks,
                bitpool,
            )
        })
}

proptest! {
    #[test]
    fn encode_moves_whole_frames(
        config in configuration(),
        input_len in 0usize..8192,
        output_len in 0usize..2048,
    ) {
        let mut codec = SbcCodec::new(&config, &library).unwrap();
        let codesize = codec.codesize();
        let frame_length = codec.frame_length();

        let input = vec![0u8; input_len];
        let mut output = vec![0u8; output_len];
        let progress = codec.encode(&input, &mut output).unwrap();

        prop_assert!(progress.consumed <= input_len);
        prop_assert!(progress.produced <= output_len);
        prop_assert_eq!(progress.consumed % codesize, 0);
        prop_assert_eq!(progress.produced % frame_length, 0);
        prop_assert_eq!(progress.consumed / codesize, progress.produced / frame_length);

        // Stopped only because the next frame did not fit on one side
        prop_assert!(
            input_len - progress.consumed < codesize
                || output_len - progress.produced < frame_length
        );
    }

    #[test]
    fn decode_moves_whole_frames(
        config in configuration(),
        input_len in 0usize..2048,
        output_len in 0usize..8192,
    ) {
        let mut codec = SbcCodec::new(&config, &library).unwrap();
        let codesize = codec.codesize();
        let frame_length = codec.frame_length();

        let input = vec![0x9Cu8; input_len];
        let mut output = vec![0u8; output_len];
        let progress = codec.decode(&input, &mut output).unwrap();

        prop_assert!(progress.produced <= output_len);
        prop_assert_eq!(progress.consumed % frame_length, 0);
        prop_assert_eq!(progress.produced, progress.consumed / frame_length * codesize);
    }
}
