//! Wire encoding of frames, the write side of the replication link.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::types::Frame;
use crate::utils::ARRAY;
use crate::utils::BULK_STRING;
use crate::utils::CRLF;
use crate::utils::ERROR;
use crate::utils::INTEGER;
use crate::utils::SIMPLE_STRING;

impl Frame {
    /// Append the byte-exact wire form of this frame to `buf`.
    pub fn encode_to(&self, buf: &mut BytesMut) {
        match self {
            Frame::SimpleString(s) => encode_line(buf, SIMPLE_STRING, s),
            Frame::Error { kind, message } => encode_error(buf, kind, message),
            Frame::Integer(i) => encode_integer(buf, *i),
            Frame::BulkString(Some(s)) => encode_bulk_string(buf, s),
            Frame::BulkString(None) => encode_null_bulk_string(buf),
            Frame::BulkTransfer(payload) => encode_bulk_transfer(buf, payload),
            Frame::Array(elements) => encode_array(buf, elements),
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_to(&mut buf);
        buf.freeze()
    }
}

#[inline]
fn encode_line(buf: &mut BytesMut, marker: u8, payload: &Bytes) {
    buf.put_u8(marker);
    buf.put_slice(payload);
    buf.put_slice(CRLF);
}

#[inline]
fn encode_error(buf: &mut BytesMut, kind: &Bytes, message: &Bytes) {
    buf.put_u8(ERROR);
    buf.put_slice(kind);
    if !message.is_empty() {
        buf.put_u8(b' ');
        buf.put_slice(message);
    }
    buf.put_slice(CRLF);
}

#[inline]
fn encode_integer(buf: &mut BytesMut, i: i64) {
    buf.put_u8(INTEGER);
    buf.put_slice(i.to_string().as_bytes());
    buf.put_slice(CRLF);
}

#[inline]
fn encode_length(buf: &mut BytesMut, marker: u8, length: usize) {
    buf.put_u8(marker);
    buf.put_slice(length.to_string().as_bytes());
    buf.put_slice(CRLF);
}

#[inline]
fn encode_bulk_string(buf: &mut BytesMut, s: &Bytes) {
    encode_length(buf, BULK_STRING, s.len());
    buf.put_slice(s);
    buf.put_slice(CRLF);
}

#[inline]
fn encode_null_bulk_string(buf: &mut BytesMut) {
    buf.put_slice(b"$-1");
    buf.put_slice(CRLF);
}

/// Transfers are length-delimited raw bytes: no trailing CRLF.
#[inline]
fn encode_bulk_transfer(buf: &mut BytesMut, payload: &Bytes) {
    encode_length(buf, BULK_STRING, payload.len());
    buf.put_slice(payload);
}

fn encode_array(buf: &mut BytesMut, elements: &[Frame]) {
    encode_length(buf, ARRAY, elements.len());
    for element in elements {
        element.encode_to(buf);
    }
}
