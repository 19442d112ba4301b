//! # solarman-v5
//!
//! Codec for the Solarman V5 data-logger transport protocol: the thin
//! binary envelope solar inverter data loggers use to carry Modbus RTU
//! frames over TCP.
//!
//! The crate is pure byte-buffer transformation. It opens no sockets and
//! owns no retry policy; the caller sends the encoded frame over a transport
//! it manages and hands the reply bytes back for decoding.
//!
//! ## Architecture
//!
//! - [`SolarmanV5`] - per-connection codec owning the logger serial number
//!   and the rolling sequence counter
//! - [`protocol`] - wire layout, checksum, frame assembly, and a
//!   [`FrameBuffer`](protocol::FrameBuffer) for reassembling frames out of
//!   fragmented TCP reads
//! - [`error`] - one distinct error kind per structural validation
//!
//! ## Example
//!
//! ```
//! use solarman_v5::SolarmanV5;
//!
//! let mut codec = SolarmanV5::new("1234567890", false).unwrap();
//!
//! // Wrap a Modbus RTU read-holding-registers request.
//! let request = codec.encode(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A]);
//! assert_eq!(request[0], 0xA5);
//!
//! // Send `request` over TCP, then: codec.decode(&reply_bytes)
//! ```

pub mod error;
pub mod protocol;

mod codec;

pub use codec::SolarmanV5;
pub use error::{Result, SolarmanError};
