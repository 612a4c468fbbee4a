//! ccsniffer: IEEE 802.15.4 sniffer for the TI CC2531 USB dongle.
//!
//! Manages the dongle's power and channel state, streams raw over-the-air
//! frames from its bulk endpoint on a background thread, and decodes each
//! frame into a [`Packet`] with RSSI/CRC/correlation metadata.
//!
//! # Key types
//!
//! - [`Sniffer`] -- device controller: open, start/stop streaming, retune
//! - [`Packet`] -- one decoded frame with signal-quality metadata
//! - [`UsbTransport`] -- byte-level transfer seam ([`RusbTransport`] for
//!   real hardware)
//! - [`SnifferError`] / [`Result`] -- error handling
//!
//! # Example
//!
//! ```no_run
//! use ccsniffer::{Config, Sniffer};
//!
//! # fn main() -> ccsniffer::Result<()> {
//! let mut sniffer = Sniffer::open(Config { channel: 15 }, |packet| {
//!     println!("{}", packet);
//! })?;
//!
//! sniffer.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(10));
//! sniffer.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod usb;

pub use config::{Config, CHANNEL_MAX, CHANNEL_MIN};
pub use device::{CaptureStats, PacketSink, Sniffer};
pub use error::{Result, SnifferError};
pub use frame::{decode_frame, Packet};
pub use usb::{RusbTransport, TransportError, UsbTransport};
