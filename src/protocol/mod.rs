//! Protocol module - wire layout, framing, and the sequence counter.
//!
//! This module implements the Solarman V5 envelope:
//! - byte-layout constants and the additive checksum
//! - request frame assembly and a typed view over received frames
//! - a frame buffer for accumulating partial reads
//! - the rolling 1-byte sequence counter

mod frame;
mod frame_buffer;
mod sequence;
mod wire_format;

pub use frame::{build_request_frame, FrameView};
pub use frame_buffer::FrameBuffer;
pub use sequence::SequenceNumber;
pub use wire_format::{
    checksum, CONTROL_CODE_OFFSET, FRAME_END, FRAME_OVERHEAD, FRAME_START, FRAME_TYPE,
    FRAME_TYPE_OFFSET, LENGTH_OFFSET, MIN_MODBUS_FRAME_LEN, MODBUS_FRAME_OFFSET,
    REQUEST_CONTROL_CODE, REQUEST_PAYLOAD_OVERHEAD, RESPONSE_CONTROL_CODE, SEQUENCE_OFFSET,
    SERIAL_OFFSET,
};
