//! Background receive loop (runs in a dedicated thread)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::frame::{decode_frame, Packet};
use crate::usb::{TransportError, UsbTransport, DATA_ENDPOINT, DATA_TIMEOUT, MAX_TRANSFER};

use super::state::CaptureStats;

/// How often the loop logs a stats summary while frames are flowing.
const STATS_INTERVAL: Duration = Duration::from_secs(10);

/// Back-off after a hard (non-timeout) read error before retrying.
const READ_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Pull raw buffers from the bulk endpoint while `running` is set and hand
/// accepted packets to the sink.
///
/// A read timeout is the liveness tick that bounds stop latency: the flag is
/// re-checked once per timeout interval at worst. The sink runs synchronously
/// on this thread, so a slow sink delays the next read. The loop never issues
/// control transfers; the stop command is the controller's job after join.
pub(crate) fn run_receiver<T: UsbTransport>(
    transport: Arc<T>,
    channel: u8,
    running: Arc<AtomicBool>,
    sink: Arc<dyn Fn(Packet) + Send + Sync>,
    stats: Arc<CaptureStats>,
) {
    debug!("receive loop started on channel {}", channel);

    let mut buf = vec![0u8; MAX_TRANSFER];
    let mut last_stats = Instant::now();

    while running.load(Ordering::SeqCst) {
        match transport.bulk_read(DATA_ENDPOINT, &mut buf, DATA_TIMEOUT) {
            Ok(n) => {
                stats.record_buffer();
                let raw = &buf[..n];

                // Non-zero status means the buffer is not a usable frame.
                if raw.first() != Some(&0) {
                    stats.record_skipped();
                    trace!("skipping buffer with status {:?}", raw.first());
                    continue;
                }

                match decode_frame(raw, channel) {
                    Some(packet) => {
                        stats.record_decoded();
                        sink(packet);
                    }
                    None => {
                        stats.record_malformed();
                        trace!("dropping malformed {}-byte frame", n);
                    }
                }
            }
            Err(TransportError::Timeout) => {
                // Liveness tick; loop back and re-check the running flag.
                stats.record_timeout();
            }
            Err(e) => {
                warn!("bulk read failed: {}", e);
                thread::sleep(READ_RETRY_DELAY);
            }
        }

        if last_stats.elapsed() >= STATS_INTERVAL {
            debug!(
                "[capture] buffers: {} | decoded: {} | malformed: {} | skipped: {}",
                stats.buffers_received(),
                stats.packets_decoded(),
                stats.frames_malformed(),
                stats.buffers_skipped()
            );
            last_stats = Instant::now();
        }
    }

    debug!(
        "receive loop exiting; decoded {} packets",
        stats.packets_decoded()
    );
}
