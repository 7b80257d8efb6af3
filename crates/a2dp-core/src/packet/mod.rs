//! A2DP media packet wire format
//!
//! Every packet is a 12-byte RTP header, a one-byte SBC media payload header
//! and `frame_count` whole SBC frames.

pub mod media;
pub mod rtp;

pub use media::{MediaPacket, SbcMediaHeader, MAX_FRAME_COUNT};
pub use rtp::{RtpHeader, RTP_VERSION};

use crate::Result;

/// Bytes in front of the first SBC frame
pub const HEADER_SIZE: usize = RtpHeader::SIZE + SbcMediaHeader::SIZE;

/// Write both headers at the start of `buf`
pub fn write_headers(buf: &mut [u8], rtp: &RtpHeader, media: &SbcMediaHeader) -> Result<()> {
    rtp.write_to(buf)?;
    // write_to has verified the RTP part; the media byte needs one more
    if buf.len() < HEADER_SIZE {
        return Err(crate::Error::BufferTooSmall {
            required: HEADER_SIZE,
            available: buf.len(),
        });
    }
    buf[RtpHeader::SIZE] = media.to_byte();
    Ok(())
}
