//! Construction configuration

/// Lowest IEEE 802.15.4 channel in the 2.4 GHz band.
pub const CHANNEL_MIN: u8 = 11;

/// Highest IEEE 802.15.4 channel in the 2.4 GHz band.
pub const CHANNEL_MAX: u8 = 26;

/// Sniffer construction options.
///
/// The single recognized option is the initial channel; everything else
/// about the dongle (endpoint, timeouts, identity) is fixed by the hardware.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial channel, 11-26.
    pub channel: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: CHANNEL_MIN,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `SNIFFER_CHANNEL` selects the initial channel (default 11). Range
    /// validation happens at construction, not here.
    pub fn from_env() -> Self {
        Self {
            channel: std::env::var("SNIFFER_CHANNEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(CHANNEL_MIN),
        }
    }
}
