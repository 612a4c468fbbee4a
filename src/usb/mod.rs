//! USB identity, request codes, and transfer constants for the CC2531 dongle

use std::time::Duration;

mod transport;

pub use transport::{RusbTransport, TransportError, UsbTransport};

/// TI vendor ID.
pub const VENDOR_ID: u16 = 0x0451;

/// CC2531 sniffer firmware product ID.
pub const PRODUCT_ID: u16 = 0x16ae;

/// Bulk IN endpoint carrying captured frames.
pub const DATA_ENDPOINT: u8 = 0x83;

/// Maximum bulk transfer size in bytes.
pub const MAX_TRANSFER: usize = 4096;

/// Bulk read timeout; also bounds the latency of observing a stop request.
pub const DATA_TIMEOUT: Duration = Duration::from_millis(2500);

/// Timeout for control transfers.
pub const CTRL_TIMEOUT: Duration = Duration::from_millis(500);

/// Vendor request: read the firmware identity blob.
pub const GET_IDENT: u8 = 0xc0;

/// Vendor request: set radio power state (wIndex 4 = on, 0 = off).
pub const SET_POWER: u8 = 0xc5;

/// Vendor request: query radio power status (byte 0 == 4 means powered).
pub const GET_POWER: u8 = 0xc6;

/// Vendor request: start streaming on the bulk endpoint.
pub const SET_START: u8 = 0xd0;

/// Vendor request: stop streaming.
pub const SET_STOP: u8 = 0xd1;

/// Vendor request: select channel (wIndex 0, data = [channel]; then wIndex 1, data = [0x00]).
pub const SET_CHAN: u8 = 0xd2;

/// wIndex value for SET_POWER meaning "on".
pub const POWER_ON: u16 = 4;

/// wIndex value for SET_POWER meaning "off".
pub const POWER_OFF: u16 = 0;

/// GET_POWER status byte reported once the radio is powered.
pub const POWERED: u8 = 4;

/// Interval between GET_POWER polls during power-up.
pub const POWER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Deadline for the radio to report powered after SET_POWER on.
pub const POWER_ON_TIMEOUT: Duration = Duration::from_secs(2);
