//! Packetizer statistics

/// Counters maintained by the packetizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketizerStats {
    /// Packets handed to the transport successfully
    pub packets_sent: u64,
    /// Bytes handed to the transport successfully, headers included
    pub bytes_sent: u64,
    /// SBC frames carried by sent packets
    pub frames_sent: u64,
    /// Send attempts that failed or were truncated
    pub send_failures: u64,
    /// Encode calls that reached the codec
    pub encode_calls: u64,
    /// Encode calls refused because the buffer was at the link MTU
    pub buffer_full_events: u64,
    /// Times buffered audio was discarded by a drain
    pub drains: u64,
}

impl PacketizerStats {
    /// Mean packet size in bytes, if anything was sent
    pub fn average_packet_size(&self) -> Option<f64> {
        if self.packets_sent == 0 {
            None
        } else {
            Some(self.bytes_sent as f64 / self.packets_sent as f64)
        }
    }
}
