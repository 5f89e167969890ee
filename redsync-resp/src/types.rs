//! Decoded frame representation.

use bytes::Bytes;

/// One complete protocol unit reconstructed from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Simple string: `+OK\r\n`
    SimpleString(Bytes),

    /// Error: `-ERR message\r\n`. The leading word of the line is the
    /// error kind, the remainder the message.
    Error { kind: Bytes, message: Bytes },

    /// Integer: `:1000\r\n`
    Integer(i64),

    /// Bulk string: `$6\r\nfoobar\r\n`. The `$-1\r\n` null marker
    /// decodes to `BulkString(None)`.
    BulkString(Option<Bytes>),

    /// Raw full-resync payload (an RDB image): length-prefixed like a
    /// bulk string but magic-prefixed and carrying no trailing CRLF.
    BulkTransfer(Bytes),

    /// Array: `*2\r\n:1\r\n:2\r\n`. The `*-1\r\n` null marker decodes
    /// to an empty array.
    Array(Vec<Frame>),
}

impl Frame {
    /// Check if the frame is an error reply
    pub fn is_error(&self) -> bool {
        matches!(self, Frame::Error { .. })
    }

    /// Try to view the textual payload as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Frame::SimpleString(s) | Frame::BulkString(Some(s)) => std::str::from_utf8(s).ok(),
            _ => None,
        }
    }

    /// Try to view the payload bytes
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Frame::SimpleString(b) | Frame::BulkString(Some(b)) | Frame::BulkTransfer(b) => {
                Some(b)
            }
            _ => None,
        }
    }

    /// Try to read an integer frame
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Frame::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to view the array elements
    pub fn as_array(&self) -> Option<&[Frame]> {
        match self {
            Frame::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Try to consume an array frame into its elements
    pub fn into_vec(self) -> Option<Vec<Frame>> {
        match self {
            Frame::Array(elements) => Some(elements),
            _ => None,
        }
    }

    // Convenience constructors

    /// Create a simple string frame
    pub fn simple_string(s: impl Into<Bytes>) -> Self {
        Frame::SimpleString(s.into())
    }

    /// Create an error frame from its kind word and message
    pub fn error(kind: impl Into<Bytes>, message: impl Into<Bytes>) -> Self {
        Frame::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an integer frame
    pub fn integer(i: i64) -> Self {
        Frame::Integer(i)
    }

    /// Create a bulk string frame
    pub fn bulk_string(s: impl Into<Bytes>) -> Self {
        Frame::BulkString(Some(s.into()))
    }

    /// Create the null bulk string marker
    pub fn null_bulk_string() -> Self {
        Frame::BulkString(None)
    }

    /// Create a full-resync transfer frame
    pub fn bulk_transfer(payload: impl Into<Bytes>) -> Self {
        Frame::BulkTransfer(payload.into())
    }

    /// Create an array frame from an iterator of elements
    pub fn array(elements: impl IntoIterator<Item = Frame>) -> Self {
        Frame::Array(elements.into_iter().collect())
    }
}
