//! Capture statistics (atomic for thread-safe access)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters updated by the receive loop and readable from any thread.
#[derive(Debug, Default)]
pub struct CaptureStats {
    buffers_received: AtomicU64,
    read_timeouts: AtomicU64,
    packets_decoded: AtomicU64,
    frames_malformed: AtomicU64,
    buffers_skipped: AtomicU64,
}

impl CaptureStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn record_buffer(&self) {
        self.buffers_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.read_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decoded(&self) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self) {
        self.frames_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.buffers_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Bulk buffers successfully read from the data endpoint.
    pub fn buffers_received(&self) -> u64 {
        self.buffers_received.load(Ordering::Relaxed)
    }

    /// Bulk reads that timed out (liveness ticks, not errors).
    pub fn read_timeouts(&self) -> u64 {
        self.read_timeouts.load(Ordering::Relaxed)
    }

    /// Buffers that decoded to a delivered packet.
    pub fn packets_decoded(&self) -> u64 {
        self.packets_decoded.load(Ordering::Relaxed)
    }

    /// Status-0 buffers dropped for a length mismatch.
    pub fn frames_malformed(&self) -> u64 {
        self.frames_malformed.load(Ordering::Relaxed)
    }

    /// Buffers skipped because the status byte was non-zero.
    pub fn buffers_skipped(&self) -> u64 {
        self.buffers_skipped.load(Ordering::Relaxed)
    }
}
