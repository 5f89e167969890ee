//! Scratch buffer assembling one in-progress frame across feeds.

use crate::utils::CRLF;

/// Initial scratch capacity; growth beyond it is amortized by `Vec`.
const INITIAL_CAPACITY: usize = 128;

/// Collects the bytes of a single frame (or frame sub-field, such as a
/// length line) while the decoder waits for more input. The terminator
/// check inspects only the last two bytes, so append-and-check is O(1)
/// per byte regardless of how often decoding resumes.
pub(crate) struct FrameAccumulator {
    bytes: Vec<u8>,
}

impl FrameAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Take the accumulated line with its CRLF terminator stripped, if
    /// the terminator has arrived. `None` means "not yet": a lone CR is
    /// ordinary data, not a terminator.
    pub(crate) fn take_line(&mut self) -> Option<Vec<u8>> {
        if !self.bytes.ends_with(CRLF) {
            return None;
        }
        self.bytes.truncate(self.bytes.len() - CRLF.len());
        Some(self.take_payload())
    }

    /// Take everything accumulated so far, leaving a fresh scratch.
    pub(crate) fn take_payload(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.bytes, Vec::with_capacity(INITIAL_CAPACITY))
    }
}
