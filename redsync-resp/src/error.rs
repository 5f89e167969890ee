//! Error types for RESP frame decoding.

use thiserror::Error;

/// Errors that can occur while decoding a RESP byte stream.
///
/// Every variant is fatal for the stream: the decoder instance that
/// produced it must be discarded along with its connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A type tag byte outside `{+, -, :, $, *}` was read
    #[error("Unknown frame type tag: 0x{0:02X}")]
    UnknownType(u8),

    /// A decimal line failed to parse as a 64-bit integer (includes overflow)
    #[error("Invalid integer: {0}")]
    InvalidInteger(String),

    /// A bulk payload declared a length below the null marker
    #[error("Invalid bulk length: {0}")]
    InvalidBulkLength(i64),

    /// An array declared an element count below the null marker
    #[error("Invalid array length: {0}")]
    InvalidArrayLength(i64),

    /// The two bytes after a literal bulk payload were not CRLF
    #[error("Missing CRLF terminator after bulk payload")]
    MissingTerminator,

    /// A single frame would exceed the configured size limit
    #[error("Frame size {size} exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },
}
