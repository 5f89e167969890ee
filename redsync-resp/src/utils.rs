//! Constants and small helpers shared by the decoder and encoder.

use bytes::Bytes;

use crate::error::ProtocolError;

/// CRLF line ending
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Type tag bytes
pub(crate) const SIMPLE_STRING: u8 = b'+';
pub(crate) const ERROR: u8 = b'-';
pub(crate) const INTEGER: u8 = b':';
pub(crate) const BULK_STRING: u8 = b'$';
pub(crate) const ARRAY: u8 = b'*';

/// A bulk payload opening with this magic is a raw full-resync transfer
/// (an RDB image) rather than a literal bulk string.
pub(crate) const RESYNC_MAGIC: &[u8] = b"REDIS";

/// Parse a signed decimal integer from a byte slice.
///
/// Overflow is reported as [`ProtocolError::InvalidInteger`], never
/// wrapped silently.
#[inline]
pub(crate) fn parse_integer(buf: &[u8]) -> Result<i64, ProtocolError> {
    let s = std::str::from_utf8(buf).map_err(|e| ProtocolError::InvalidInteger(e.to_string()))?;
    s.parse::<i64>()
        .map_err(|e| ProtocolError::InvalidInteger(e.to_string()))
}

/// Split an error line into its leading kind word and the message after
/// the first space: `ERR bad` becomes (`ERR`, `bad`). A line without a
/// space is all kind.
#[inline]
pub(crate) fn split_error_line(line: &Bytes) -> (Bytes, Bytes) {
    match memchr::memchr(b' ', line) {
        Some(pos) => (line.slice(..pos), line.slice(pos + 1..)),
        None => (line.clone(), Bytes::new()),
    }
}
