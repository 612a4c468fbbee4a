//! CC2531 device controller
//!
//! [`Sniffer`] owns the device handle and enforces the power/channel/
//! streaming protocol. The handle supports only one transfer in flight, so
//! control transfers always happen with the receive thread fully joined;
//! that ordering discipline replaces any lock (single writer of the running
//! flag, single reader polling it).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{Config, CHANNEL_MAX, CHANNEL_MIN};
use crate::error::{Result, SnifferError};
use crate::frame::Packet;
use crate::usb::{
    RusbTransport, TransportError, UsbTransport, GET_IDENT, GET_POWER, POWERED, POWER_OFF,
    POWER_ON, POWER_ON_TIMEOUT, POWER_POLL_INTERVAL, PRODUCT_ID, SET_CHAN, SET_POWER, SET_START,
    SET_STOP, VENDOR_ID,
};

use super::receiver::run_receiver;
use super::state::CaptureStats;

/// Caller-supplied packet sink, invoked synchronously on the receive thread
/// once per accepted packet. A sink that panics aborts the receive thread;
/// callers must not let panics escape it.
pub type PacketSink = Arc<dyn Fn(Packet) + Send + Sync>;

/// Controller for one CC2531 sniffer dongle.
///
/// Construction powers the radio on and tunes the initial channel; dropping
/// the controller powers it off again. At most one background receive thread
/// exists per controller, recycled across `stop`/`start` and `set_channel`.
pub struct Sniffer<T: UsbTransport> {
    transport: Arc<T>,
    sink: PacketSink,
    channel: u8,
    running: Arc<AtomicBool>,
    rx_thread: Option<JoinHandle<()>>,
    stats: Arc<CaptureStats>,
    ident: Vec<u8>,
    closed: bool,
}

impl Sniffer<RusbTransport> {
    /// Locate the dongle, power it on, and tune the configured channel.
    ///
    /// Fails with [`SnifferError::DeviceNotFound`] when no dongle is
    /// attached and [`SnifferError::PermissionDenied`] when the OS refuses
    /// access. The sink is invoked from the receive thread for every
    /// accepted packet once [`start`](Self::start) is called.
    pub fn open<F>(config: Config, sink: F) -> Result<Self>
    where
        F: Fn(Packet) + Send + Sync + 'static,
    {
        let transport = RusbTransport::open(VENDOR_ID, PRODUCT_ID).map_err(|e| match e {
            TransportError::NoDevice => SnifferError::DeviceNotFound,
            TransportError::AccessDenied => SnifferError::PermissionDenied,
            other => SnifferError::Transport(other),
        })?;

        Self::with_transport(transport, config, sink)
    }
}

impl<T: UsbTransport + 'static> Sniffer<T> {
    /// Construct against an injected transport (tests use a scripted mock).
    ///
    /// Runs the same power-on sequence as [`open`](Sniffer::open): firmware
    /// identity read, power command, bounded power-status poll, initial
    /// channel tune. On any failure the partially initialized device is
    /// powered off best-effort and no controller is returned.
    pub fn with_transport<F>(transport: T, config: Config, sink: F) -> Result<Self>
    where
        F: Fn(Packet) + Send + Sync + 'static,
    {
        validate_channel(config.channel)?;

        let mut sniffer = Self {
            transport: Arc::new(transport),
            sink: Arc::new(sink),
            channel: config.channel,
            running: Arc::new(AtomicBool::new(false)),
            rx_thread: None,
            stats: CaptureStats::new(),
            ident: Vec::new(),
            closed: false,
        };

        // On error the controller drops here, and Drop powers the radio
        // back off.
        sniffer.init()?;
        Ok(sniffer)
    }

    fn init(&mut self) -> Result<()> {
        let mut ident = vec![0u8; 256];
        let n = self.transport.control_in(GET_IDENT, 0, 0, &mut ident)?;
        ident.truncate(n);
        debug!("firmware ident: {}", hex::encode(&ident));
        self.ident = ident;

        self.power_up()?;
        self.tune(self.channel)?;

        info!("CC2531 powered on, tuned to channel {}", self.channel);
        Ok(())
    }

    /// Power the radio on and poll until the status query reports powered.
    fn power_up(&mut self) -> Result<()> {
        self.transport.control_out(SET_POWER, 0, POWER_ON, &[])?;

        let deadline = Instant::now() + POWER_ON_TIMEOUT;
        loop {
            let mut status = [0u8; 1];
            let n = self.transport.control_in(GET_POWER, 0, 0, &mut status)?;
            if n == 1 && status[0] == POWERED {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SnifferError::PowerOnTimeout(POWER_ON_TIMEOUT));
            }
            thread::sleep(POWER_POLL_INTERVAL);
        }
    }

    /// Program the radio to `channel` (select command plus fixed follow-up).
    fn tune(&self, channel: u8) -> Result<()> {
        self.transport.control_out(SET_CHAN, 0, 0, &[channel])?;
        self.transport.control_out(SET_CHAN, 0, 1, &[0x00])?;
        Ok(())
    }

    /// Begin streaming: start command, then launch the receive thread.
    pub fn start(&mut self) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SnifferError::AlreadyStreaming);
        }

        self.transport.control_out(SET_START, 0, 0, &[])?;
        self.running.store(true, Ordering::SeqCst);

        let transport = Arc::clone(&self.transport);
        let running = Arc::clone(&self.running);
        let sink = Arc::clone(&self.sink);
        let stats = Arc::clone(&self.stats);
        let channel = self.channel;

        let spawned = thread::Builder::new()
            .name("ccsniffer-rx".to_string())
            .spawn(move || run_receiver(transport, channel, running, sink, stats));

        match spawned {
            Ok(handle) => {
                self.rx_thread = Some(handle);
                info!("capture started on channel {}", self.channel);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(SnifferError::SpawnThread(e))
            }
        }
    }

    /// Stop streaming: clear the flag, join the receive thread, then issue
    /// the stop command.
    ///
    /// Blocks for up to one bulk-read timeout while the loop notices the
    /// cleared flag. The join must complete before the stop command so no
    /// read is in flight when the device is told to stop.
    pub fn stop(&mut self) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(SnifferError::NotStreaming);
        }

        self.running.store(false, Ordering::SeqCst);
        self.join_receiver();
        self.transport.control_out(SET_STOP, 0, 0, &[])?;

        info!("capture stopped");
        Ok(())
    }

    /// Retune the radio, quiescing any active stream around the change.
    ///
    /// Rejects channels outside 11-26 without touching device state. When
    /// called while streaming, the caller observes streaming still active
    /// afterwards, served by a fresh receive thread.
    pub fn set_channel(&mut self, channel: u8) -> Result<()> {
        validate_channel(channel)?;

        let was_running = self.running.load(Ordering::SeqCst);
        if was_running {
            self.stop()?;
        }

        self.channel = channel;
        self.tune(channel)?;
        info!("tuned to channel {}", channel);

        if was_running {
            self.start()?;
        }
        Ok(())
    }

    /// Currently tuned channel.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Whether the receive loop is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Capture counters, shared with the receive thread.
    pub fn stats(&self) -> Arc<CaptureStats> {
        Arc::clone(&self.stats)
    }

    /// Firmware identity blob read during construction.
    pub fn firmware_ident(&self) -> &[u8] {
        &self.ident
    }
}

impl<T: UsbTransport> Sniffer<T> {
    /// Release the device: quiesce any live stream and power the radio off.
    ///
    /// Idempotent; runs on every exit path via `Drop`, including a failed
    /// construction after partial setup. Teardown failures are logged, not
    /// raised.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.running.swap(false, Ordering::SeqCst) {
            self.join_receiver();
            if let Err(e) = self.transport.control_out(SET_STOP, 0, 0, &[]) {
                warn!("failed to stop streaming during teardown: {}", e);
            }
        }

        if let Err(e) = self.transport.control_out(SET_POWER, 0, POWER_OFF, &[]) {
            warn!("failed to power radio off: {}", e);
        } else {
            debug!("radio powered off");
        }
    }

    fn join_receiver(&mut self) {
        if let Some(handle) = self.rx_thread.take() {
            if handle.join().is_err() {
                warn!("receiver thread panicked");
            }
        }
    }
}

impl<T: UsbTransport> Drop for Sniffer<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn validate_channel(channel: u8) -> Result<()> {
    if (CHANNEL_MIN..=CHANNEL_MAX).contains(&channel) {
        Ok(())
    } else {
        Err(SnifferError::InvalidChannel(channel))
    }
}
