//! # redsync-resp — streaming RESP frame decoder
//!
//! Incremental decoding of the Redis Serialization Protocol (RESP) for
//! replication links: the transport hands over byte chunks of arbitrary
//! size and the decoder reconstructs complete frames, even when a frame
//! spans many chunks or one chunk carries many frames. Full-resync
//! database transfers (raw `REDIS`-prefixed RDB payloads without a
//! trailing CRLF) are recognized alongside ordinary bulk strings.
//!
//! ## Design
//!
//! - **Resumable**: a state machine parks mid-frame when bytes run out
//!   and continues exactly there on the next feed — no blocking reads.
//! - **Bounded**: frame size is capped; a garbage stream cannot grow
//!   memory without limit.
//! - **Per-connection**: one [`FrameDecoder`] owns one byte stream.
//!
//! ## Example
//!
//! ```rust
//! use redsync_resp::Frame;
//! use redsync_resp::FrameDecoder;
//!
//! let mut decoder = FrameDecoder::new();
//! decoder.feed(b"+OK\r\n:4").unwrap();
//! assert_eq!(decoder.take_frames(), vec![Frame::simple_string("OK")]);
//!
//! // The integer frame was split mid-line; the rest completes it.
//! decoder.feed(b"2\r\n").unwrap();
//! assert_eq!(decoder.take_frames(), vec![Frame::integer(42)]);
//! ```

mod accumulator;
mod decoder;
mod encode;
mod error;
mod ring;
mod types;
mod utils;

pub use decoder::DecoderConfig;
pub use decoder::FrameDecoder;
pub use error::ProtocolError;
pub use types::Frame;

/// Decode every frame in `input` with a one-off decoder.
///
/// Convenience for tests and tools; streaming callers should hold a
/// [`FrameDecoder`] per connection instead. Bytes of a trailing partial
/// frame are silently left behind with the discarded decoder.
pub fn decode_all(input: &[u8]) -> Result<Vec<Frame>, ProtocolError> {
    let mut decoder = FrameDecoder::new();
    decoder.feed(input)?;
    Ok(decoder.take_frames())
}
