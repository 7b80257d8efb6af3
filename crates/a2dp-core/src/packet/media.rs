//! SBC media payload header and received packet parsing

use bytes::{Buf, Bytes};

use super::rtp::RtpHeader;
use super::HEADER_SIZE;
use crate::error::Error;
use crate::Result;

/// Largest frame count the SBC media payload header can carry
pub const MAX_FRAME_COUNT: u8 = 0x0F;

/// One-byte SBC media payload header following the RTP header
///
/// Layout: `F S L RFA NNNN` (fragmented, starting, last, reserved, frame
/// count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SbcMediaHeader {
    /// The payload is a fragment of an SBC frame
    pub fragmented: bool,
    /// First fragment of a frame
    pub starting: bool,
    /// Last fragment of a frame
    pub last: bool,
    /// Number of SBC frames (or remaining fragments)
    pub frame_count: u8,
}

impl SbcMediaHeader {
    /// Serialized size in bytes
    pub const SIZE: usize = 1;

    /// Header for an unfragmented packet of `frame_count` frames
    pub fn new(frame_count: u8) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Encode to the wire byte; the frame count is truncated to 4 bits
    pub fn to_byte(&self) -> u8 {
        let mut b = self.frame_count & MAX_FRAME_COUNT;
        if self.fragmented {
            b |= 0x80;
        }
        if self.starting {
            b |= 0x40;
        }
        if self.last {
            b |= 0x20;
        }
        b
    }

    /// Decode from the wire byte
    pub fn from_byte(b: u8) -> Self {
        Self {
            fragmented: b & 0x80 != 0,
            starting: b & 0x40 != 0,
            last: b & 0x20 != 0,
            frame_count: b & MAX_FRAME_COUNT,
        }
    }
}

/// A parsed A2DP media packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPacket {
    /// RTP header
    pub header: RtpHeader,
    /// SBC media payload header
    pub media: SbcMediaHeader,
    /// Concatenated SBC frames
    pub payload: Bytes,
}

impl MediaPacket {
    /// Parse a packet as received from the transport
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                required: HEADER_SIZE,
                available: data.len(),
            });
        }

        let mut buf = Bytes::copy_from_slice(data);
        let header = RtpHeader::parse(&mut buf)?;
        if !buf.has_remaining() {
            return Err(Error::InvalidPacket("missing SBC media header".to_string()));
        }
        let media = SbcMediaHeader::from_byte(buf.get_u8());

        Ok(Self {
            header,
            media,
            payload: buf,
        })
    }

    /// Split the payload into `frame_length` sized SBC frames
    ///
    /// Fails if the payload is not exactly `frame_count` whole frames.
    pub fn frames(&self, frame_length: usize) -> Result<Vec<Bytes>> {
        let expected = self.media.frame_count as usize * frame_length;
        if frame_length == 0 || self.payload.len() != expected {
            return Err(Error::InvalidPacket(format!(
                "payload of {} bytes is not {} frames of {} bytes",
                self.payload.len(),
                self.media.frame_count,
                frame_length
            )));
        }

        Ok((0..self.media.frame_count as usize)
            .map(|i| self.payload.slice(i * frame_length..(i + 1) * frame_length))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_header_byte() {
        assert_eq!(SbcMediaHeader::new(5).to_byte(), 0x05);
        assert_eq!(SbcMediaHeader::new(0x1F).to_byte(), 0x0F);

        let header = SbcMediaHeader {
            fragmented: true,
            starting: true,
            last: false,
            frame_count: 3,
        };
        assert_eq!(header.to_byte(), 0xC3);
        assert_eq!(SbcMediaHeader::from_byte(0xC3), header);
    }

    #[test]
    fn test_parse_packet() {
        let mut data = RtpHeader::new(1, 9, 1024, 1).serialize().unwrap().to_vec();
        data.push(SbcMediaHeader::new(2).to_byte());
        data.extend_from_slice(&[0x9C, 1, 2, 0x9C, 3, 4]);

        let packet = MediaPacket::parse(&data).unwrap();
        assert_eq!(packet.header.sequence_number, 9);
        assert_eq!(packet.header.timestamp, 1024);
        assert_eq!(packet.media.frame_count, 2);

        let frames = packet.frames(3).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[1][..], &[0x9C, 3, 4]);
        assert!(packet.frames(4).is_err());
    }

    #[test]
    fn test_parse_truncated() {
        assert!(MediaPacket::parse(&[0x80, 0x01]).is_err());
    }
}
