//! Wire-format decoder for raw CC2531 bulk buffers
//!
//! Buffer layout (offsets into one bulk read):
//!
//! ```text
//! byte[0]        status code; 0 = valid frame (checked by the receive loop)
//! byte[1]        declared length, must equal total length - 3
//! byte[3:7]      4 opaque header bytes from the radio chip
//! byte[7]        payload length field (= payload length + 2)
//! byte[8 : -2]   payload
//! byte[-2]       fcs1: rssi = signed(fcs1) - 73 dBm
//! byte[-1]       fcs2: bit 7 = crc ok, bits 0-6 = correlation
//! ```

use chrono::Utc;

use super::Packet;

/// Smallest buffer that can carry an empty payload plus both FCS bytes.
const MIN_FRAME_LEN: usize = 10;

/// RSSI offset applied to the raw signed fcs1 byte, per the CC2530/1 datasheet.
const RSSI_OFFSET: i32 = 73;

/// Decode one raw bulk buffer into a [`Packet`].
///
/// Stateless apart from the capture timestamp; `channel` is supplied by the
/// caller since the buffer does not carry it. Returns `None` whenever the
/// declared and actual lengths disagree. Malformed buffers are expected
/// noise on a live dongle, so rejection is not an error.
pub fn decode_frame(raw: &[u8], channel: u8) -> Option<Packet> {
    if raw.len() < MIN_FRAME_LEN {
        return None;
    }

    let declared_len = raw[1] as usize;
    if raw.len() - 3 != declared_len {
        return None;
    }

    let mut header = [0u8; 4];
    header.copy_from_slice(&raw[3..7]);

    let payload = &raw[8..raw.len() - 2];

    // The length field counts the two FCS bytes; a field below 2 cannot
    // describe any payload.
    let payload_len = (raw[7] as usize).checked_sub(2)?;
    if payload.len() != payload_len {
        return None;
    }

    let fcs1 = raw[raw.len() - 2];
    let fcs2 = raw[raw.len() - 1];

    Some(Packet {
        timestamp: Utc::now(),
        channel,
        header,
        payload: payload.to_vec(),
        rssi: (fcs1 as i8) as i32 - RSSI_OFFSET,
        crc_ok: fcs2 & 0x80 != 0,
        correlation: fcs2 & 0x7f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a well-formed bulk buffer around the given payload and FCS bytes.
    fn build_frame(payload: &[u8], fcs1: u8, fcs2: u8) -> Vec<u8> {
        let total = payload.len() + 10;
        let mut raw = Vec::with_capacity(total);
        raw.push(0); // status
        raw.push((total - 3) as u8);
        raw.push(0); // unused
        raw.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]); // header
        raw.push((payload.len() + 2) as u8);
        raw.extend_from_slice(payload);
        raw.push(fcs1);
        raw.push(fcs2);
        raw
    }

    #[test]
    fn test_decode_valid_frame() {
        let raw = build_frame(&hex::decode("0102030405").unwrap(), 0xd6, 0x85);
        let packet = decode_frame(&raw, 11).expect("frame should decode");

        assert_eq!(packet.channel, 11);
        assert_eq!(packet.header, [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(packet.payload, hex::decode("0102030405").unwrap());
        // fcs1 = 0xD6 = 214 -> signed -42 -> rssi -115
        assert_eq!(packet.rssi, -115);
        // fcs2 = 0x85 = 0b1000_0101 -> crc ok, correlation 5
        assert!(packet.crc_ok);
        assert_eq!(packet.correlation, 5);
    }

    #[test]
    fn test_rejects_declared_length_mismatch() {
        let mut raw = build_frame(b"\x01\x02\x03", 0, 0);
        raw[1] = raw[1].wrapping_add(1);
        assert!(decode_frame(&raw, 11).is_none());
    }

    #[test]
    fn test_rejects_payload_length_mismatch() {
        let mut raw = build_frame(b"\x01\x02\x03", 0, 0);
        raw[7] += 1;
        assert!(decode_frame(&raw, 11).is_none());
    }

    #[test]
    fn test_rejects_payload_length_field_below_two() {
        let mut raw = build_frame(b"", 0, 0);
        raw[7] = 1;
        assert!(decode_frame(&raw, 11).is_none());
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(decode_frame(&[0, 6, 0, 1, 2, 3, 4, 2, 0], 11).is_none());
        assert!(decode_frame(&[], 11).is_none());
    }

    #[test]
    fn test_empty_payload_frame() {
        let raw = build_frame(b"", 0x00, 0x00);
        let packet = decode_frame(&raw, 26).expect("frame should decode");
        assert!(packet.payload.is_empty());
        assert_eq!(packet.rssi, -73);
        assert!(!packet.crc_ok);
        assert_eq!(packet.correlation, 0);
    }

    #[test]
    fn test_decode_is_idempotent_except_timestamp() {
        let raw = build_frame(b"\xaa\xbb", 0x10, 0x7f);
        let first = decode_frame(&raw, 20).unwrap();
        let second = decode_frame(&raw, 20).unwrap();

        assert_eq!(first.channel, second.channel);
        assert_eq!(first.header, second.header);
        assert_eq!(first.payload, second.payload);
        assert_eq!(first.rssi, second.rssi);
        assert_eq!(first.crc_ok, second.crc_ok);
        assert_eq!(first.correlation, second.correlation);
    }

    #[test]
    fn test_rssi_covers_signed_range() {
        // fcs1 = 0x7F -> +127 -> rssi 54
        let raw = build_frame(b"\x00", 0x7f, 0x00);
        assert_eq!(decode_frame(&raw, 11).unwrap().rssi, 54);

        // fcs1 = 0x80 -> -128 -> rssi -201
        let raw = build_frame(b"\x00", 0x80, 0x00);
        assert_eq!(decode_frame(&raw, 11).unwrap().rssi, -201);
    }
}
