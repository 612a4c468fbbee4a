//! Error taxonomy for the sniffer

use std::time::Duration;

use thiserror::Error;

use crate::usb::TransportError;

/// Errors surfaced by [`Sniffer`](crate::Sniffer) operations.
///
/// Construction failures (`DeviceNotFound`, `PermissionDenied`,
/// `PowerOnTimeout`) abort creation entirely; per-call failures
/// (`InvalidChannel`, `AlreadyStreaming`, `NotStreaming`) leave the
/// controller in its prior valid state.
#[derive(Debug, Error)]
pub enum SnifferError {
    #[error("CC2531 dongle not found (vendor 0451, product 16ae)")]
    DeviceNotFound,

    #[error("permission denied opening the CC2531 dongle; check udev rules")]
    PermissionDenied,

    #[error("radio did not report powered within {0:?}")]
    PowerOnTimeout(Duration),

    #[error("channel {0} is out of range (valid: 11-26)")]
    InvalidChannel(u8),

    #[error("capture is already running")]
    AlreadyStreaming,

    #[error("capture is not running")]
    NotStreaming,

    #[error("failed to spawn the receiver thread")]
    SpawnThread(#[source] std::io::Error),

    #[error("usb transfer failed")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, SnifferError>;
