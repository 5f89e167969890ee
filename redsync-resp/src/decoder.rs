//! The resumable RESP protocol state machine.

use bytes::Bytes;
use tracing::debug;

use crate::accumulator::FrameAccumulator;
use crate::error::ProtocolError;
use crate::ring::RingBuffer;
use crate::types::Frame;
use crate::utils::ARRAY;
use crate::utils::BULK_STRING;
use crate::utils::CRLF;
use crate::utils::ERROR;
use crate::utils::INTEGER;
use crate::utils::RESYNC_MAGIC;
use crate::utils::SIMPLE_STRING;
use crate::utils::parse_integer;
use crate::utils::split_error_line;

/// Tunables for a single decoder instance.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Ring buffer capacity the decoder starts with and compacts back
    /// to after a full drain.
    pub buffer_capacity: usize,
    /// Upper bound on the byte size of any single frame; exceeding it
    /// is a protocol error rather than unbounded accumulation.
    pub max_frame_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1024 * 1024,
            max_frame_size: 512 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LineKind {
    Simple,
    Error,
    Integer,
}

/// Where decoding resumes on the next feed. Array nesting is tracked
/// separately on an explicit stack.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for the next type tag byte.
    Idle,
    /// Accumulating a CRLF-terminated line.
    Line(LineKind),
    /// Accumulating the length line of a bulk payload.
    BulkLength,
    /// Length resolved; waiting for enough bytes to classify the
    /// payload as a resync transfer or a literal bulk string.
    BulkSniff { len: usize },
    /// Consuming payload bytes, plus the CRLF terminator unless the
    /// payload is a transfer.
    BulkData { len: usize, transfer: bool },
    /// Accumulating the element count line of an array.
    ArrayLength,
}

/// One nesting level of an array being decoded.
#[derive(Debug)]
struct PendingArray {
    expected: usize,
    elements: Vec<Frame>,
}

/// Outcome of one state machine advance.
enum Step {
    /// A complete frame was produced.
    Frame(Frame),
    /// The ring ran dry mid-frame; state is preserved for the next feed.
    Incomplete,
}

/// Decoded frames awaiting retrieval, oldest first.
#[derive(Debug, Default)]
struct OutputQueue {
    frames: Vec<Frame>,
}

impl OutputQueue {
    fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    fn drain_all(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

/// A stateful RESP decoder bound to one logical byte stream.
///
/// Feed it chunks as the transport delivers them; frames may span many
/// chunks and one chunk may carry many frames. Completed frames queue
/// up until [`FrameDecoder::take_frames`] drains them. One instance
/// serves exactly one connection; create it with the connection and
/// drop it to abandon the stream.
pub struct FrameDecoder {
    config: DecoderConfig,
    ring: RingBuffer,
    acc: FrameAccumulator,
    state: State,
    stack: Vec<PendingArray>,
    output: OutputQueue,
    failed: Option<ProtocolError>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        let ring = RingBuffer::new(config.buffer_capacity);
        Self {
            config,
            ring,
            acc: FrameAccumulator::new(),
            state: State::Idle,
            stack: Vec::new(),
            output: OutputQueue::default(),
            failed: None,
        }
    }

    /// Ingest one chunk and decode as far as the available bytes allow.
    ///
    /// Never blocks: when a frame is only partially present the decoder
    /// parks its state and returns, resuming exactly where it left off
    /// on the next call. Errors are fatal for the stream; subsequent
    /// calls keep returning the original error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ProtocolError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        self.ring.append(chunk);
        match self.drain_ring() {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("stream unusable after protocol error: {err}");
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Drain every frame decoded so far, oldest first (empty when none).
    ///
    /// Also the compaction point: once nothing is mid-frame, a ring
    /// buffer that grew past its configured capacity shrinks back.
    pub fn take_frames(&mut self) -> Vec<Frame> {
        let frames = self.output.drain_all();
        if !self.mid_frame() {
            self.ring.compact(self.config.buffer_capacity);
        }
        frames
    }

    /// Current ring buffer capacity; grows under load and compacts back
    /// to the configured default on a full drain.
    pub fn buffer_capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn mid_frame(&self) -> bool {
        !matches!(self.state, State::Idle) || !self.stack.is_empty()
    }

    fn drain_ring(&mut self) -> Result<(), ProtocolError> {
        loop {
            match self.step()? {
                Step::Frame(frame) => self.complete_frame(frame),
                Step::Incomplete => return Ok(()),
            }
        }
    }

    /// Advance the state machine until one frame completes or the ring
    /// runs dry.
    fn step(&mut self) -> Result<Step, ProtocolError> {
        loop {
            match self.state {
                State::Idle => {
                    let Some(tag) = self.ring.pop() else {
                        return Ok(Step::Incomplete);
                    };
                    self.state = match tag {
                        SIMPLE_STRING => State::Line(LineKind::Simple),
                        ERROR => State::Line(LineKind::Error),
                        INTEGER => State::Line(LineKind::Integer),
                        BULK_STRING => State::BulkLength,
                        ARRAY => State::ArrayLength,
                        other => return Err(ProtocolError::UnknownType(other)),
                    };
                }
                State::Line(kind) => {
                    let Some(line) = self.accumulate_line()? else {
                        return Ok(Step::Incomplete);
                    };
                    self.state = State::Idle;
                    let frame = match kind {
                        LineKind::Simple => Frame::SimpleString(line),
                        LineKind::Error => {
                            let (kind, message) = split_error_line(&line);
                            Frame::Error { kind, message }
                        }
                        LineKind::Integer => Frame::Integer(parse_integer(&line)?),
                    };
                    return Ok(Step::Frame(frame));
                }
                State::BulkLength => {
                    let Some(line) = self.accumulate_line()? else {
                        return Ok(Step::Incomplete);
                    };
                    let len = parse_integer(&line)?;
                    if len < -1 {
                        return Err(ProtocolError::InvalidBulkLength(len));
                    }
                    if len == -1 {
                        // Null marker: no payload bytes follow.
                        self.state = State::Idle;
                        return Ok(Step::Frame(Frame::BulkString(None)));
                    }
                    let len = len as usize;
                    if len > self.config.max_frame_size {
                        return Err(ProtocolError::FrameTooLarge {
                            size: len,
                            limit: self.config.max_frame_size,
                        });
                    }
                    self.state = State::BulkSniff { len };
                }
                State::BulkSniff { len } => {
                    // A payload shorter than the magic can never be a
                    // transfer; otherwise wait for the full sniff window
                    // so classification cannot depend on chunk
                    // boundaries. The verdict is latched in the state.
                    let transfer = if len >= RESYNC_MAGIC.len() {
                        if self.ring.len() < RESYNC_MAGIC.len() {
                            return Ok(Step::Incomplete);
                        }
                        RESYNC_MAGIC
                            .iter()
                            .enumerate()
                            .all(|(i, byte)| self.ring.peek(i) == Some(*byte))
                    } else {
                        false
                    };
                    if transfer {
                        debug!(len, "full resync transfer detected");
                    }
                    self.state = State::BulkData { len, transfer };
                }
                State::BulkData { len, transfer } => {
                    let needed = if transfer { len } else { len + CRLF.len() };
                    while self.acc.len() < needed {
                        let Some(byte) = self.ring.pop() else {
                            return Ok(Step::Incomplete);
                        };
                        self.acc.push(byte);
                    }
                    let mut payload = self.acc.take_payload();
                    self.state = State::Idle;
                    let frame = if transfer {
                        Frame::BulkTransfer(Bytes::from(payload))
                    } else {
                        if &payload[len..] != CRLF {
                            return Err(ProtocolError::MissingTerminator);
                        }
                        payload.truncate(len);
                        Frame::BulkString(Some(Bytes::from(payload)))
                    };
                    return Ok(Step::Frame(frame));
                }
                State::ArrayLength => {
                    let Some(line) = self.accumulate_line()? else {
                        return Ok(Step::Incomplete);
                    };
                    let count = parse_integer(&line)?;
                    if count < -1 {
                        return Err(ProtocolError::InvalidArrayLength(count));
                    }
                    self.state = State::Idle;
                    if count <= 0 {
                        // -1 is the null array marker; both it and *0
                        // complete immediately with no elements.
                        return Ok(Step::Frame(Frame::Array(Vec::new())));
                    }
                    self.stack.push(PendingArray {
                        expected: count as usize,
                        elements: Vec::new(),
                    });
                }
            }
        }
    }

    /// Pull bytes into the accumulator until a CRLF-terminated line
    /// completes. `None` means the terminator has genuinely not arrived.
    fn accumulate_line(&mut self) -> Result<Option<Bytes>, ProtocolError> {
        loop {
            let Some(byte) = self.ring.pop() else {
                return Ok(None);
            };
            self.acc.push(byte);
            if self.acc.len() > self.config.max_frame_size {
                return Err(ProtocolError::FrameTooLarge {
                    size: self.acc.len(),
                    limit: self.config.max_frame_size,
                });
            }
            if let Some(line) = self.acc.take_line() {
                return Ok(Some(Bytes::from(line)));
            }
        }
    }

    /// Deliver a finished frame: into the innermost pending array, or
    /// into the output queue at the root. Filled arrays cascade outward
    /// iteratively, so nesting depth never touches the call stack.
    fn complete_frame(&mut self, mut frame: Frame) {
        loop {
            match self.stack.pop() {
                None => {
                    self.output.push(frame);
                    return;
                }
                Some(mut pending) => {
                    pending.elements.push(frame);
                    if pending.elements.len() == pending.expected {
                        frame = Frame::Array(pending.elements);
                    } else {
                        self.stack.push(pending);
                        return;
                    }
                }
            }
        }
    }
}
