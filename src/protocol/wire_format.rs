//! Byte layout of the Solarman V5 envelope.
//!
//! A request frame as produced by the encoder:
//!
//! ```text
//! ┌───────┬─────────┬─────────┬─────────┬─────────┬──────────────┬────────┬──────────┬───────┐
//! │ start │ length  │ control │ seq     │ serial  │ fixed fields │ modbus │ checksum │ end   │
//! │ 0xA5  │ u16 LE  │ u16 LE  │ u16 LE  │ u32 LE  │ 15 bytes     │ N      │ 1 byte   │ 0x15  │
//! └───────┴─────────┴─────────┴─────────┴─────────┴──────────────┴────────┴──────────┴───────┘
//! ```
//!
//! The length field declares the payload size (everything between the serial
//! number and the checksum). Total frame length is always
//! `13 + payload length`: an 11-byte header plus the checksum and end marker.
//!
//! The control code is asymmetric by protocol design: requests carry `0x1045`,
//! replies carry `0x1510`. Reply payloads also use a 14-byte fixed prefix
//! (one status byte where requests have a 2-byte sensor type), which is why
//! the embedded Modbus frame of a reply starts at byte offset 25. Both quirks
//! come from the vendor hardware and must be reproduced exactly.

/// Start-of-frame marker.
pub const FRAME_START: u8 = 0xA5;

/// End-of-frame marker.
pub const FRAME_END: u8 = 0x15;

/// Control code stamped on outgoing request frames.
pub const REQUEST_CONTROL_CODE: u16 = 0x1045;

/// Control code expected on reply frames from the logger.
pub const RESPONSE_CONTROL_CODE: u16 = 0x1510;

/// Frame type byte, identical in both directions.
pub const FRAME_TYPE: u8 = 0x02;

/// Bytes outside the declared payload: 11-byte header + checksum + end marker.
pub const FRAME_OVERHEAD: usize = 13;

/// Fixed payload prefix of a request frame:
/// frame type (1) + sensor type (2) + three 4-byte timestamps.
pub const REQUEST_PAYLOAD_OVERHEAD: usize = 15;

/// Offset of the little-endian payload length field.
pub const LENGTH_OFFSET: usize = 1;

/// Offset of the little-endian control code.
pub const CONTROL_CODE_OFFSET: usize = 3;

/// Offset of the sequence number (low byte; the high byte at 6 is unused).
pub const SEQUENCE_OFFSET: usize = 5;

/// Offset of the 4-byte little-endian logger serial number.
pub const SERIAL_OFFSET: usize = 7;

/// Offset of the frame type byte.
pub const FRAME_TYPE_OFFSET: usize = 11;

/// Offset of the embedded Modbus RTU frame in a reply.
pub const MODBUS_FRAME_OFFSET: usize = 25;

/// Minimum viable embedded Modbus RTU frame:
/// address + function code + 2 data bytes + CRC floor, interpreted loosely.
pub const MIN_MODBUS_FRAME_LEN: usize = 5;

/// Compute the V5 checksum of a frame: the sum of all bytes in the half-open
/// range `[1, len - 2)` modulo 256. Excludes the start marker and the
/// trailing checksum/end-marker pair.
///
/// Used identically by the encoder (to stamp) and the decoder (to verify).
/// The caller passes the frame already bounded to its authoritative length.
///
/// # Panics
///
/// Panics if the frame is shorter than 3 bytes.
pub fn checksum(frame: &[u8]) -> u8 {
    frame[1..frame.len() - 2]
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}
