//! ccsniffer demo - capture 802.15.4 frames from a CC2531 dongle and print them

use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::bounded;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use ccsniffer::{Config, Packet, Sniffer};

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    info!("===========================================");
    info!("   ccsniffer - CC2531 802.15.4 capture");
    info!("===========================================");

    let config = Config::from_env();
    let capture_secs: u64 = std::env::var("CAPTURE_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    info!("Configuration:");
    info!("  Channel: {}", config.channel);
    info!("  Capture duration: {} s", capture_secs);

    // Packets cross from the receive thread to main over a bounded channel
    // so a slow terminal never stalls the bulk reads.
    let (packet_tx, packet_rx) = bounded::<Packet>(1000);

    let mut sniffer = Sniffer::open(config, move |packet| {
        if packet_tx.try_send(packet).is_err() {
            debug!("packet channel full, dropping packet");
        }
    })?;

    info!("Firmware ident: {}", hex::encode(sniffer.firmware_ident()));

    sniffer.start()?;
    info!("Capturing... press Ctrl+C to abort early.");

    let deadline = Instant::now() + Duration::from_secs(capture_secs);
    while Instant::now() < deadline {
        match packet_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(packet) => {
                println!("{}", "-".repeat(30));
                println!("{}", packet);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // No packet this tick; keep waiting out the capture window.
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    sniffer.stop()?;

    let stats = sniffer.stats();
    info!(
        "Shutdown complete. Buffers: {} | Packets: {} | Malformed: {} | Skipped: {}",
        stats.buffers_received(),
        stats.packets_decoded(),
        stats.frames_malformed(),
        stats.buffers_skipped()
    );

    Ok(())
}
