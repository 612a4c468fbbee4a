//! Decoded sniffer packet

use std::fmt;

use chrono::{DateTime, Utc};

/// One captured IEEE 802.15.4 frame with signal-quality metadata.
///
/// Produced by [`decode_frame`](crate::frame::decode_frame); immutable once
/// built. The device provides no on-air timestamp, so `timestamp` is the
/// wall-clock decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Capture time (decode time, not on-air time).
    pub timestamp: DateTime<Utc>,

    /// Channel the radio was tuned to at decode time (11-26).
    pub channel: u8,

    /// Four opaque bytes of radio-chip metadata; semantics undocumented
    /// upstream, preserved uninterpreted.
    pub header: [u8; 4],

    /// Frame contents, excluding the two trailing FCS status bytes.
    pub payload: Vec<u8>,

    /// Received signal strength estimate in dBm.
    pub rssi: i32,

    /// Hardware CRC check result.
    pub crc_ok: bool,

    /// Link-quality correlation value (0-127).
    pub correlation: u8,
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Channel:     {}", self.channel)?;
        writeln!(f, "Timestamp:   {}", self.timestamp.format("%H:%M:%S"))?;
        writeln!(f, "Header:      {}", hex::encode(self.header))?;
        writeln!(f, "RSSI:        {}", self.rssi)?;
        writeln!(f, "CRC OK:      {}", self.crc_ok)?;
        writeln!(f, "Correlation: {}", self.correlation)?;
        write!(f, "Payload:     {}", hex::encode(&self.payload))
    }
}
