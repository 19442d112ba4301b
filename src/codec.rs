//! Solarman V5 codec: wraps and unwraps Modbus RTU frames.
//!
//! One codec instance per logical connection to a data logger. The instance
//! owns the logger's serial number and the rolling sequence counter; it
//! performs no I/O. The caller sends the encoded bytes over a transport it
//! owns and hands the reply bytes back to [`SolarmanV5::decode`].
//!
//! The protocol pairs one outstanding request with one reply per sequence
//! number, so a single instance must not encode two requests concurrently
//! without external serialization of the request/response pairs.

use bytes::Bytes;
use tracing::warn;

use crate::error::{Result, SolarmanError};
use crate::protocol::{
    build_request_frame, checksum, FrameView, SequenceNumber, FRAME_END, FRAME_OVERHEAD,
    FRAME_START, FRAME_TYPE, LENGTH_OFFSET, MIN_MODBUS_FRAME_LEN, MODBUS_FRAME_OFFSET,
    RESPONSE_CONTROL_CODE,
};

/// Codec for one data logger connection.
///
/// # Example
///
/// ```
/// use solarman_v5::SolarmanV5;
///
/// let mut codec = SolarmanV5::new("1234567890", false).unwrap();
/// let request = codec.encode(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A]);
/// assert_eq!(request[0], 0xA5);
/// ```
#[derive(Debug, Clone)]
pub struct SolarmanV5 {
    /// Logger serial number, little-endian, fixed for the instance lifetime.
    serial: [u8; 4],
    /// Advances on encode only; decode compares against the current value.
    sequence: SequenceNumber,
    /// Tolerate length and sequence mismatches on decode.
    ignore_protocol_errors: bool,
}

impl SolarmanV5 {
    /// Create a codec for the logger with the given decimal serial number.
    ///
    /// # Errors
    ///
    /// [`SolarmanError::InvalidSerialNumber`] when the string does not parse
    /// as an unsigned 32-bit integer.
    pub fn new(serial_number: &str, ignore_protocol_errors: bool) -> Result<Self> {
        let serial: u32 = serial_number
            .trim()
            .parse()
            .map_err(|_| SolarmanError::InvalidSerialNumber(serial_number.to_string()))?;
        Ok(Self::from_serial(serial, ignore_protocol_errors))
    }

    /// Create a codec from an already-numeric serial number.
    pub fn from_serial(serial_number: u32, ignore_protocol_errors: bool) -> Self {
        Self {
            serial: serial_number.to_le_bytes(),
            sequence: SequenceNumber::new(),
            ignore_protocol_errors,
        }
    }

    /// The sequence number a reply is currently expected to echo.
    #[inline]
    pub fn sequence_number(&self) -> u8 {
        self.sequence.current()
    }

    /// The logger serial number bytes as sent on the wire.
    #[inline]
    pub fn serial_bytes(&self) -> [u8; 4] {
        self.serial
    }

    /// Embed a Modbus RTU frame into a Solarman V5 request envelope.
    ///
    /// Advances the sequence counter and cannot fail; no length constraint
    /// is enforced here (validation happens when the reply is decoded).
    pub fn encode(&mut self, modbus_frame: &[u8]) -> Bytes {
        let sequence = self.sequence.next();
        build_request_frame(self.serial, sequence, modbus_frame)
    }

    /// Extract the Modbus RTU frame embedded in a reply envelope.
    ///
    /// Validates the frame structurally in a fixed order; the first failed
    /// check aborts decoding. With `ignore_protocol_errors` set, a length
    /// mismatch is tolerated by trusting the declared payload length for all
    /// further offsets (trailing bytes beyond it are ignored), and a sequence
    /// mismatch is logged and skipped. Marker, checksum, serial, control
    /// code, frame type, and payload floor failures are never suppressed.
    ///
    /// Does not mutate codec state.
    pub fn decode(&self, wire_frame: &Bytes) -> Result<Bytes> {
        // Too short to carry even the length field.
        if wire_frame.len() < LENGTH_OFFSET + 2 {
            return Err(SolarmanError::LengthMismatch {
                expected: FRAME_OVERHEAD,
                actual: wire_frame.len(),
            });
        }

        let declared =
            u16::from_le_bytes([wire_frame[LENGTH_OFFSET], wire_frame[LENGTH_OFFSET + 1]]) as usize;
        let frame_len = FRAME_OVERHEAD + declared;

        if wire_frame.len() != frame_len {
            if !self.ignore_protocol_errors {
                return Err(SolarmanError::LengthMismatch {
                    expected: frame_len,
                    actual: wire_frame.len(),
                });
            }
            warn!(
                expected = frame_len,
                actual = wire_frame.len(),
                "frame length does not match payload length, trusting declared length"
            );
        }

        // Markers, never suppressed. A buffer shorter than the declared
        // length fails here rather than panicking further down.
        if wire_frame[0] != FRAME_START
            || wire_frame.get(frame_len - 1).copied() != Some(FRAME_END)
        {
            return Err(SolarmanError::InvalidMarker);
        }

        let view = FrameView::new(&wire_frame[..frame_len]);

        let computed = checksum(&wire_frame[..frame_len]);
        if view.stored_checksum() != computed {
            return Err(SolarmanError::InvalidChecksum {
                computed,
                stored: view.stored_checksum(),
            });
        }

        if view.sequence() != self.sequence.current() {
            if !self.ignore_protocol_errors {
                return Err(SolarmanError::SequenceMismatch {
                    expected: self.sequence.current(),
                    actual: view.sequence(),
                });
            }
            warn!(
                expected = self.sequence.current(),
                actual = view.sequence(),
                "frame sequence number mismatch ignored"
            );
        }

        // Raw byte comparison, not numeric.
        if view.serial_bytes() != self.serial {
            return Err(SolarmanError::SerialMismatch);
        }

        if view.control_code() != RESPONSE_CONTROL_CODE {
            return Err(SolarmanError::InvalidControlCode(view.control_code()));
        }

        if view.frame_type() != FRAME_TYPE {
            return Err(SolarmanError::InvalidFrameType(view.frame_type()));
        }

        let modbus_len = view.modbus_frame().len();
        if modbus_len < MIN_MODBUS_FRAME_LEN {
            return Err(SolarmanError::PayloadTooShort(modbus_len));
        }

        Ok(wire_frame.slice(MODBUS_FRAME_OFFSET..frame_len - 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    const SERIAL: u32 = 1234567890;
    const MODBUS: [u8; 7] = [0x01, 0x03, 0x04, 0x00, 0x2A, 0x00, 0x3B];

    /// Build a device-style reply: control code 0x1510, echoed sequence,
    /// and the reply's 14-byte fixed payload prefix (frame type, one status
    /// byte, three timestamps), placing the Modbus frame at offset 25.
    fn device_reply(serial: u32, sequence: u8, modbus: &[u8]) -> Bytes {
        let payload_len = 14 + modbus.len();
        let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload_len);

        buf.put_u8(FRAME_START);
        buf.put_u16_le(payload_len as u16);
        buf.put_u16_le(RESPONSE_CONTROL_CODE);
        buf.put_u16_le(u16::from(sequence));
        buf.put_slice(&serial.to_le_bytes());
        buf.put_u8(FRAME_TYPE);
        buf.put_u8(0x01); // status
        buf.put_u32_le(0); // total working time
        buf.put_u32_le(0); // power-on time
        buf.put_u32_le(0); // offset time
        buf.put_slice(modbus);
        buf.put_u8(0);
        buf.put_u8(FRAME_END);

        restamp(&mut buf);
        buf.freeze()
    }

    fn restamp(frame: &mut BytesMut) {
        let at = frame.len() - 2;
        let sum = checksum(frame);
        frame[at] = sum;
    }

    fn tampered(reply: &Bytes, tamper: impl FnOnce(&mut BytesMut)) -> Bytes {
        let mut buf = BytesMut::from(&reply[..]);
        tamper(&mut buf);
        buf.freeze()
    }

    #[test]
    fn test_new_parses_decimal_serial() {
        let codec = SolarmanV5::new("1234567890", false).unwrap();
        assert_eq!(codec.serial_bytes(), [0xD2, 0x02, 0x96, 0x49]);
        assert_eq!(codec.sequence_number(), 1);
    }

    #[test]
    fn test_new_rejects_bad_serial() {
        assert!(matches!(
            SolarmanV5::new("not-a-number", false),
            Err(SolarmanError::InvalidSerialNumber(_))
        ));
        // Does not fit in u32.
        assert!(matches!(
            SolarmanV5::new("4294967296", false),
            Err(SolarmanError::InvalidSerialNumber(_))
        ));
    }

    #[test]
    fn test_encode_advances_sequence() {
        let mut codec = SolarmanV5::from_serial(SERIAL, false);

        let first = codec.encode(&MODBUS);
        assert_eq!(first[5], 2);
        assert_eq!(codec.sequence_number(), 2);

        let second = codec.encode(&MODBUS);
        assert_eq!(second[5], 3);
        assert_eq!(codec.sequence_number(), 3);
    }

    #[test]
    fn test_decode_happy_path() {
        let mut codec = SolarmanV5::from_serial(SERIAL, false);
        codec.encode(&MODBUS);

        let reply = device_reply(SERIAL, codec.sequence_number(), &MODBUS);
        let decoded = codec.decode(&reply).unwrap();
        assert_eq!(&decoded[..], &MODBUS);
    }

    #[test]
    fn test_decode_does_not_mutate_state() {
        let mut codec = SolarmanV5::from_serial(SERIAL, false);
        codec.encode(&MODBUS);

        let reply = device_reply(SERIAL, codec.sequence_number(), &MODBUS);
        codec.decode(&reply).unwrap();
        assert_eq!(codec.sequence_number(), 2);
        // The same reply decodes again.
        codec.decode(&reply).unwrap();
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let mut with_garbage = reply.to_vec();
        with_garbage.extend_from_slice(&[0xDE, 0xAD]);
        let frame = Bytes::from(with_garbage);

        assert_eq!(
            codec.decode(&frame),
            Err(SolarmanError::LengthMismatch {
                expected: reply.len(),
                actual: reply.len() + 2,
            })
        );
    }

    #[test]
    fn test_length_mismatch_tolerated_ignores_trailing_bytes() {
        let codec = SolarmanV5::from_serial(SERIAL, true);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let mut with_garbage = reply.to_vec();
        with_garbage.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let decoded = codec.decode(&Bytes::from(with_garbage)).unwrap();
        assert_eq!(&decoded[..], &MODBUS);
    }

    #[test]
    fn test_truncated_buffer_fails_marker_check_when_tolerant() {
        // Shorter than the declared length: the end marker is out of reach,
        // which must surface as InvalidMarker, not a panic.
        let codec = SolarmanV5::from_serial(SERIAL, true);
        let reply = device_reply(SERIAL, 1, &MODBUS);
        let truncated = reply.slice(..reply.len() - 3);

        assert_eq!(codec.decode(&truncated), Err(SolarmanError::InvalidMarker));
    }

    #[test]
    fn test_runt_buffer_rejected() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        assert!(matches!(
            codec.decode(&Bytes::from_static(&[0xA5])),
            Err(SolarmanError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_start_marker() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| buf[0] = 0x5A);
        assert_eq!(codec.decode(&frame), Err(SolarmanError::InvalidMarker));
    }

    #[test]
    fn test_invalid_end_marker() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| {
            let at = buf.len() - 1;
            buf[at] = 0x51;
        });
        assert_eq!(codec.decode(&frame), Err(SolarmanError::InvalidMarker));
    }

    #[test]
    fn test_invalid_checksum() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| {
            let at = buf.len() - 2;
            buf[at] = buf[at].wrapping_add(1);
        });
        assert!(matches!(
            codec.decode(&frame),
            Err(SolarmanError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn test_checksum_never_suppressed() {
        let codec = SolarmanV5::from_serial(SERIAL, true);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| {
            let at = buf.len() - 2;
            buf[at] = buf[at].wrapping_add(1);
        });
        assert!(matches!(
            codec.decode(&frame),
            Err(SolarmanError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn test_sequence_mismatch_rejected() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 42, &MODBUS);

        assert_eq!(
            codec.decode(&reply),
            Err(SolarmanError::SequenceMismatch {
                expected: 1,
                actual: 42,
            })
        );
    }

    #[test]
    fn test_sequence_mismatch_tolerated() {
        let codec = SolarmanV5::from_serial(SERIAL, true);
        let reply = device_reply(SERIAL, 42, &MODBUS);

        let decoded = codec.decode(&reply).unwrap();
        assert_eq!(&decoded[..], &MODBUS);
    }

    #[test]
    fn test_serial_mismatch_never_suppressed() {
        let reply = device_reply(SERIAL + 1, 1, &MODBUS);

        for ignore in [false, true] {
            let codec = SolarmanV5::from_serial(SERIAL, ignore);
            assert_eq!(codec.decode(&reply), Err(SolarmanError::SerialMismatch));
        }
    }

    #[test]
    fn test_request_control_code_rejected_on_decode() {
        // A logger echoing the request control code instead of 0x1510.
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| {
            buf[3..5].copy_from_slice(&0x1045u16.to_le_bytes());
            restamp(buf);
        });
        assert_eq!(
            codec.decode(&frame),
            Err(SolarmanError::InvalidControlCode(0x1045))
        );
    }

    #[test]
    fn test_invalid_frame_type() {
        let codec = SolarmanV5::from_serial(SERIAL, false);
        let reply = device_reply(SERIAL, 1, &MODBUS);

        let frame = tampered(&reply, |buf| {
            buf[11] = 0x01;
            restamp(buf);
        });
        assert_eq!(
            codec.decode(&frame),
            Err(SolarmanError::InvalidFrameType(0x01))
        );
    }

    #[test]
    fn test_minimum_payload_boundary() {
        let codec = SolarmanV5::from_serial(SERIAL, false);

        let four = device_reply(SERIAL, 1, &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(codec.decode(&four), Err(SolarmanError::PayloadTooShort(4)));

        let five = device_reply(SERIAL, 1, &[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(
            &codec.decode(&five).unwrap()[..],
            &[0x01, 0x02, 0x03, 0x04, 0x05]
        );
    }
}
