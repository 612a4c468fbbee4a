//! Byte-level USB transport seam
//!
//! [`UsbTransport`] abstracts the three transfer shapes the sniffer needs
//! (vendor control OUT, vendor control IN, bulk IN) so the controller and
//! receive loop can be exercised against a scripted mock. [`RusbTransport`]
//! is the libusb-backed implementation used against real hardware.

use std::time::Duration;

use rusb::{DeviceHandle, GlobalContext};
use thiserror::Error;
use tracing::debug;

use super::CTRL_TIMEOUT;

/// bmRequestType for vendor OUT transfers (host to device).
const DIR_OUT: u8 = 0x40;

/// bmRequestType for vendor IN transfers (device to host).
const DIR_IN: u8 = 0xc0;

/// Transport-level failures.
///
/// `Timeout` is separated from the catch-all because the receive loop treats
/// a timed-out bulk read as a liveness tick, not a fault.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transfer timed out")]
    Timeout,

    #[error("no matching device present")]
    NoDevice,

    #[error("access to the device was denied by the OS")]
    AccessDenied,

    #[error("usb transfer failed: {0}")]
    Usb(rusb::Error),
}

impl From<rusb::Error> for TransportError {
    fn from(err: rusb::Error) -> Self {
        match err {
            rusb::Error::Timeout => TransportError::Timeout,
            rusb::Error::NoDevice => TransportError::NoDevice,
            rusb::Error::Access => TransportError::AccessDenied,
            other => TransportError::Usb(other),
        }
    }
}

/// Transfer primitives against one USB device handle.
///
/// Implementations must be safe to share across threads: the controller
/// issues control transfers from the caller's thread while the receive loop
/// issues bulk reads from its own. The sniffer's join discipline guarantees
/// the two are never in flight at the same time.
pub trait UsbTransport: Send + Sync {
    /// Vendor control OUT transfer.
    fn control_out(&self, request: u8, value: u16, index: u16, data: &[u8])
        -> Result<(), TransportError>;

    /// Vendor control IN transfer; returns the number of bytes read.
    fn control_in(&self, request: u8, value: u16, index: u16, buf: &mut [u8])
        -> Result<usize, TransportError>;

    /// Bulk IN transfer; returns the number of bytes read.
    fn bulk_read(&self, endpoint: u8, buf: &mut [u8], timeout: Duration)
        -> Result<usize, TransportError>;
}

/// libusb-backed transport for a claimed CC2531 handle.
pub struct RusbTransport {
    handle: DeviceHandle<GlobalContext>,
}

impl RusbTransport {
    /// Locate a device by vendor/product identity, apply the default
    /// configuration, and claim interface 0.
    ///
    /// Returns `NoDevice` when no match is present and `AccessDenied` when
    /// the OS refuses the open (typically a missing udev rule).
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self, TransportError> {
        for device in rusb::devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(d) => d,
                Err(_) => continue,
            };

            if descriptor.vendor_id() != vendor_id || descriptor.product_id() != product_id {
                continue;
            }

            debug!(
                "found device {:04x}:{:04x} on bus {} address {}",
                vendor_id,
                product_id,
                device.bus_number(),
                device.address()
            );

            let mut handle = device.open()?;
            handle.set_active_configuration(1)?;
            handle.claim_interface(0)?;
            return Ok(Self { handle });
        }

        Err(TransportError::NoDevice)
    }
}

impl UsbTransport for RusbTransport {
    fn control_out(
        &self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), TransportError> {
        self.handle
            .write_control(DIR_OUT, request, value, index, data, CTRL_TIMEOUT)?;
        Ok(())
    }

    fn control_in(
        &self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        let n = self
            .handle
            .read_control(DIR_IN, request, value, index, buf, CTRL_TIMEOUT)?;
        Ok(n)
    }

    fn bulk_read(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        let n = self.handle.read_bulk(endpoint, buf, timeout)?;
        Ok(n)
    }
}
