//! Frame buffer for accumulating partial reads.
//!
//! TCP delivers the reply envelope in arbitrary fragments. This buffer
//! accumulates raw bytes in a `bytes::BytesMut` and yields complete wire
//! frames using the declared-length field, via a small state machine:
//! - `WaitingForHeader`: need the start marker and the 2-byte length field
//! - `WaitingForFrame`: length known, need the rest of the frame
//!
//! Extracted frames are raw; hand them to
//! [`SolarmanV5::decode`](crate::SolarmanV5::decode) for validation. The
//! buffer checks only the start marker, because a wrong first byte means the
//! stream is desynchronized and no length field can be trusted.
//!
//! # Example
//!
//! ```
//! use solarman_v5::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//! // Two fragments of one 13-byte frame (empty declared payload).
//! let frames = buffer.push(&[0xA5, 0x00, 0x00, 0x45, 0x10, 0x01]).unwrap();
//! assert!(frames.is_empty());
//! let frames = buffer
//!     .push(&[0x00, 0xD2, 0x02, 0x96, 0x49, 0x02, 0x15])
//!     .unwrap();
//! assert_eq!(frames.len(), 1);
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{FRAME_OVERHEAD, FRAME_START, LENGTH_OFFSET};
use crate::error::{Result, SolarmanError};

/// State machine for frame extraction.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for the start marker and length field (3 bytes).
    WaitingForHeader,
    /// Length field parsed, waiting for the full frame.
    WaitingForFrame { frame_len: usize },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// All data is stored in a single `BytesMut`; extracted frames are zero-copy
/// `Bytes` splits of it.
#[derive(Debug)]
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current extraction state.
    state: State,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * 1024),
            state: State::WaitingForHeader,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Returns the complete frames found so far; an empty vector means more
    /// data is needed. Partial data stays buffered for the next push.
    ///
    /// # Errors
    ///
    /// [`SolarmanError::InvalidMarker`] when the byte at a frame boundary is
    /// not `0xA5`. The stream is desynchronized at that point and the caller
    /// should drop the connection.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Number of bytes buffered but not yet extracted.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Try to extract a single frame from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<Bytes>> {
        match self.state {
            State::WaitingForHeader => {
                if self.buffer.len() < LENGTH_OFFSET + 2 {
                    return Ok(None);
                }

                if self.buffer[0] != FRAME_START {
                    return Err(SolarmanError::InvalidMarker);
                }

                let declared = u16::from_le_bytes([self.buffer[1], self.buffer[2]]) as usize;
                self.state = State::WaitingForFrame {
                    frame_len: FRAME_OVERHEAD + declared,
                };

                // The rest of the frame may already be buffered.
                self.try_extract_one()
            }

            State::WaitingForFrame { frame_len } => {
                if self.buffer.len() < frame_len {
                    return Ok(None);
                }

                let frame = self.buffer.split_to(frame_len).freeze();
                self.state = State::WaitingForHeader;
                Ok(Some(frame))
            }
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
