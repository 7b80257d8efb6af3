//! Fixed-capacity transmit buffer
//!
//! One slab is allocated per stream and reused in place for every packet.
//! The first `reserved` bytes hold the packet headers; payload bytes are
//! appended behind them by writing into [`TransmitBuffer::spare_mut`] and
//! then committing the written length.

use crate::error::Error;
use crate::Result;

/// Reusable packet buffer with a reserved header region
#[derive(Debug)]
pub struct TransmitBuffer {
    data: Box<[u8]>,
    used: usize,
    reserved: usize,
}

impl TransmitBuffer {
    /// Allocate a buffer of `capacity` bytes with `reserved` header bytes
    pub fn new(capacity: usize, reserved: usize) -> Result<Self> {
        if capacity <= reserved {
            return Err(Error::BufferTooSmall {
                required: reserved + 1,
                available: capacity,
            });
        }
        Ok(Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            used: reserved,
            reserved,
        })
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes in use, headers included
    pub fn used(&self) -> usize {
        self.used
    }

    /// Size of the reserved header region
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// True when no payload has been appended
    pub fn is_empty(&self) -> bool {
        self.used == self.reserved
    }

    /// Writable space behind the used region, capped so that `used` can
    /// grow to at most `limit`
    pub fn spare_mut(&mut self, limit: usize) -> &mut [u8] {
        let end = limit.min(self.data.len()).max(self.used);
        &mut self.data[self.used..end]
    }

    /// Mark `len` bytes written through [`Self::spare_mut`] as used
    pub fn commit(&mut self, len: usize) -> Result<()> {
        let available = self.data.len() - self.used;
        if len > available {
            return Err(Error::BufferTooSmall {
                required: len,
                available,
            });
        }
        self.used += len;
        Ok(())
    }

    /// Mutable view of the reserved header region
    pub fn header_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.reserved]
    }

    /// The packet as it would be sent: headers plus payload
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Discard the payload, keeping the header region
    pub fn reset(&mut self) {
        self.used = self.reserved;
    }
}
