//! Captured frame decoding module

mod decoder;
mod packet;

pub use decoder::decode_frame;
pub use packet::Packet;
