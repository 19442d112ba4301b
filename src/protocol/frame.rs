//! Frame assembly and a typed view over received frames.
//!
//! [`build_request_frame`] is the pure assembly half of the encode path:
//! it lays out the envelope and stamps the checksum but owns no counter
//! state. [`FrameView`] is a borrowed, read-only view the decoder drives its
//! validation through; it assumes the buffer has already been bounded to the
//! authoritative frame length.

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::{
    checksum, CONTROL_CODE_OFFSET, FRAME_END, FRAME_OVERHEAD, FRAME_START, FRAME_TYPE,
    FRAME_TYPE_OFFSET, MODBUS_FRAME_OFFSET, REQUEST_CONTROL_CODE, REQUEST_PAYLOAD_OVERHEAD,
    SEQUENCE_OFFSET, SERIAL_OFFSET,
};

/// Assemble a complete request envelope around a Modbus RTU frame.
///
/// The sequence number is serialized as a little-endian u16 whose high byte
/// is always zero; only the low byte carries the counter. The checksum is
/// computed over the assembled bytes, never from the nominal length field.
///
/// # Example
///
/// ```
/// use solarman_v5::protocol::build_request_frame;
///
/// let frame = build_request_frame([0xD2, 0x02, 0x96, 0x49], 2, &[0x01; 8]);
/// assert_eq!(frame[0], 0xA5);
/// assert_eq!(*frame.last().unwrap(), 0x15);
/// assert_eq!(frame.len(), 13 + 15 + 8);
/// ```
pub fn build_request_frame(serial: [u8; 4], sequence: u8, modbus_frame: &[u8]) -> Bytes {
    let payload_len = REQUEST_PAYLOAD_OVERHEAD + modbus_frame.len();
    let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload_len);

    buf.put_u8(FRAME_START);
    buf.put_u16_le(payload_len as u16);
    buf.put_u16_le(REQUEST_CONTROL_CODE);
    buf.put_u16_le(u16::from(sequence));
    buf.put_slice(&serial);
    buf.put_u8(FRAME_TYPE);
    buf.put_u16_le(0); // sensor type
    buf.put_u32_le(0); // delivery time
    buf.put_u32_le(0); // power-on time
    buf.put_u32_le(0); // offset time
    buf.put_slice(modbus_frame);
    buf.put_u8(0); // checksum, stamped below
    buf.put_u8(FRAME_END);

    let checksum_at = buf.len() - 2;
    let sum = checksum(&buf);
    buf[checksum_at] = sum;
    buf.freeze()
}

/// Borrowed view over a received frame with typed field accessors.
///
/// Construct it only after the frame has been bounded to its authoritative
/// length (at least [`FRAME_OVERHEAD`] bytes, end marker in place); every
/// accessor then indexes within bounds.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    frame: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Wrap a frame slice.
    ///
    /// # Panics
    ///
    /// Debug-panics if the slice is shorter than a payload-less frame.
    pub fn new(frame: &'a [u8]) -> Self {
        debug_assert!(frame.len() >= FRAME_OVERHEAD);
        Self { frame }
    }

    /// Start-of-frame marker byte.
    #[inline]
    pub fn start_byte(&self) -> u8 {
        self.frame[0]
    }

    /// End-of-frame marker byte.
    #[inline]
    pub fn end_byte(&self) -> u8 {
        self.frame[self.frame.len() - 1]
    }

    /// Control code (little-endian u16 at offset 3).
    #[inline]
    pub fn control_code(&self) -> u16 {
        u16::from_le_bytes([
            self.frame[CONTROL_CODE_OFFSET],
            self.frame[CONTROL_CODE_OFFSET + 1],
        ])
    }

    /// Sequence number byte.
    #[inline]
    pub fn sequence(&self) -> u8 {
        self.frame[SEQUENCE_OFFSET]
    }

    /// Raw logger serial number bytes (little-endian on the wire).
    #[inline]
    pub fn serial_bytes(&self) -> &'a [u8] {
        &self.frame[SERIAL_OFFSET..SERIAL_OFFSET + 4]
    }

    /// Frame type byte.
    #[inline]
    pub fn frame_type(&self) -> u8 {
        self.frame[FRAME_TYPE_OFFSET]
    }

    /// Checksum byte stored in the frame (second to last).
    #[inline]
    pub fn stored_checksum(&self) -> u8 {
        self.frame[self.frame.len() - 2]
    }

    /// Recompute the checksum over this frame's bytes.
    #[inline]
    pub fn computed_checksum(&self) -> u8 {
        checksum(self.frame)
    }

    /// The embedded Modbus RTU frame of a reply: bytes `[25, len - 2)`.
    ///
    /// Empty when the frame is too short to hold one.
    pub fn modbus_frame(&self) -> &'a [u8] {
        self.frame
            .get(MODBUS_FRAME_OFFSET..self.frame.len() - 2)
            .unwrap_or(&[])
    }
}
