//! Device control and background capture

mod controller;
mod receiver;
mod state;

pub use controller::{PacketSink, Sniffer};
pub use state::CaptureStats;
