//! Error types for the Solarman V5 codec.

use thiserror::Error;

/// Main error type for all codec operations.
///
/// Every decode failure maps to exactly one variant, so callers can
/// distinguish failure kinds programmatically rather than by message text.
/// Only [`LengthMismatch`](SolarmanError::LengthMismatch) and
/// [`SequenceMismatch`](SolarmanError::SequenceMismatch) can be tolerated,
/// and only when the codec was constructed with `ignore_protocol_errors`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolarmanError {
    /// Buffer length does not match the declared payload length.
    #[error("Frame length {actual} does not match payload length (expected {expected})")]
    LengthMismatch { expected: usize, actual: usize },

    /// Start byte is not `0xA5` or end byte is not `0x15`.
    #[error("Frame contains invalid start or end values")]
    InvalidMarker,

    /// Stored checksum byte does not match the recomputed checksum.
    #[error("Frame contains invalid V5 checksum (computed {computed:#04x}, stored {stored:#04x})")]
    InvalidChecksum { computed: u8, stored: u8 },

    /// Sequence byte does not match the last issued sequence number.
    #[error("Frame contains invalid sequence number (expected {expected}, got {actual})")]
    SequenceMismatch { expected: u8, actual: u8 },

    /// Serial number bytes do not match the codec's data logger serial.
    #[error("Frame contains incorrect data logger serial number")]
    SerialMismatch,

    /// Control code is not the expected reply value `0x1510`.
    #[error("Frame contains incorrect control code: {0:#06x}")]
    InvalidControlCode(u16),

    /// Frame type byte is not `0x02`.
    #[error("Frame contains invalid frame type: {0:#04x}")]
    InvalidFrameType(u8),

    /// Embedded Modbus RTU frame is shorter than the 5-byte minimum.
    #[error("Frame does not contain a valid Modbus RTU frame ({0} bytes)")]
    PayloadTooShort(usize),

    /// Serial number string did not parse as an unsigned 32-bit integer.
    #[error("Invalid data logger serial number: {0:?}")]
    InvalidSerialNumber(String),
}

/// Result type alias using SolarmanError.
pub type Result<T> = std::result::Result<T, SolarmanError>;
