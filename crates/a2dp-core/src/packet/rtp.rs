//! RTP fixed header
//!
//! A2DP media packets carry a plain 12-byte RTP header: no CSRCs, no
//! extension, timestamps counted in PCM sample frames.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Error;
use crate::{Result, RtpSequenceNumber, RtpSsrc, RtpTimestamp};

/// RTP protocol version carried in every header
pub const RTP_VERSION: u8 = 2;

/// Fixed RTP header (no CSRC list, no extension)
/// Defined in RFC 3550 Section 5.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    /// Version (always 2 when serialized by this crate)
    pub version: u8,
    /// Padding flag
    pub padding: bool,
    /// Extension flag
    pub extension: bool,
    /// CSRC count
    pub csrc_count: u8,
    /// Marker bit
    pub marker: bool,
    /// Payload type (7 bits)
    pub payload_type: u8,
    /// Sequence number
    pub sequence_number: RtpSequenceNumber,
    /// Timestamp in PCM sample frames
    pub timestamp: RtpTimestamp,
    /// Synchronization source identifier
    pub ssrc: RtpSsrc,
}

impl RtpHeader {
    /// Serialized size in bytes
    pub const SIZE: usize = 12;

    /// Create a version 2 header with no padding, extension, CSRCs or marker
    pub fn new(
        payload_type: u8,
        sequence_number: RtpSequenceNumber,
        timestamp: RtpTimestamp,
        ssrc: RtpSsrc,
    ) -> Self {
        Self {
            version: RTP_VERSION,
            padding: false,
            extension: false,
            csrc_count: 0,
            marker: false,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
        }
    }

    /// Write the header into the first [`Self::SIZE`] bytes of `buf`
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < Self::SIZE {
            return Err(Error::BufferTooSmall {
                required: Self::SIZE,
                available: buf.len(),
            });
        }

        let mut out = &mut buf[..Self::SIZE];
        out.put_u8(
            (self.version & 0x03) << 6
                | (self.padding as u8) << 5
                | (self.extension as u8) << 4
                | (self.csrc_count & 0x0F),
        );
        out.put_u8((self.marker as u8) << 7 | (self.payload_type & 0x7F));
        out.put_u16(self.sequence_number);
        out.put_u32(self.timestamp);
        out.put_u32(self.ssrc);
        Ok(())
    }

    /// Serialize the header to bytes
    pub fn serialize(&self) -> Result<BytesMut> {
        let mut buf = BytesMut::zeroed(Self::SIZE);
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Parse a header, skipping any CSRC list
    pub fn parse(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(Error::BufferTooSmall {
                required: Self::SIZE,
                available: buf.remaining(),
            });
        }

        let first = buf.get_u8();
        let second = buf.get_u8();
        let header = Self {
            version: first >> 6,
            padding: first & 0x20 != 0,
            extension: first & 0x10 != 0,
            csrc_count: first & 0x0F,
            marker: second & 0x80 != 0,
            payload_type: second & 0x7F,
            sequence_number: buf.get_u16(),
            timestamp: buf.get_u32(),
            ssrc: buf.get_u32(),
        };

        if header.version != RTP_VERSION {
            return Err(Error::InvalidPacket(format!(
                "unsupported RTP version {}",
                header.version
            )));
        }

        let csrc_len = header.csrc_count as usize * 4;
        if buf.remaining() < csrc_len {
            return Err(Error::BufferTooSmall {
                required: csrc_len,
                available: buf.remaining(),
            });
        }
        buf.advance(csrc_len);

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = RtpHeader::new(1, 0x1234, 0x0102_0304, 1);
        let bytes = header.serialize().unwrap();
        assert_eq!(
            &bytes[..],
            &[0x80, 0x01, 0x12, 0x34, 0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn test_header_flags() {
        let mut header = RtpHeader::new(0x60, 7, 0, 0xdead_beef);
        header.marker = true;
        header.padding = true;
        let bytes = header.serialize().unwrap();
        assert_eq!(bytes[0], 0xA0);
        assert_eq!(bytes[1], 0xE0);
    }

    #[test]
    fn test_write_to_short_buffer() {
        let header = RtpHeader::new(1, 0, 0, 1);
        let mut buf = [0u8; 8];
        assert!(matches!(
            header.write_to(&mut buf),
            Err(Error::BufferTooSmall { required: 12, available: 8 })
        ));
    }

    #[test]
    fn test_parse_serialized() {
        let header = RtpHeader::new(1, 65535, 4_000_000_000, 1);
        let bytes = header.serialize().unwrap();
        let parsed = RtpHeader::parse(&mut bytes.freeze()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let mut bytes = RtpHeader::new(1, 0, 0, 1).serialize().unwrap();
        bytes[0] = 0x40;
        assert!(matches!(
            RtpHeader::parse(&mut bytes.freeze()),
            Err(Error::InvalidPacket(_))
        ));
    }

    #[test]
    fn test_parse_skips_csrcs() {
        let mut header = RtpHeader::new(1, 1, 1, 1);
        header.csrc_count = 1;
        let mut bytes = header.serialize().unwrap();
        bytes.put_u32(0xCAFE_BABE);
        bytes.put_u8(0x42);

        let mut buf = bytes.freeze();
        let parsed = RtpHeader::parse(&mut buf).unwrap();
        assert_eq!(parsed.csrc_count, 1);
        assert_eq!(buf.get_u8(), 0x42);
    }
}
