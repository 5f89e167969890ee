use bytes::Bytes;
use redsync_resp::DecoderConfig;
use redsync_resp::Frame;
use redsync_resp::FrameDecoder;
use redsync_resp::ProtocolError;
use redsync_resp::decode_all;
use rstest::rstest;

/// Feed `input` in `chunk`-sized pieces, draining after every feed.
fn decode_chunked(input: &[u8], chunk: usize) -> Vec<Frame> {
    let mut decoder = FrameDecoder::new();
    let mut frames = Vec::new();
    for piece in input.chunks(chunk) {
        decoder.feed(piece).unwrap();
        frames.extend(decoder.take_frames());
    }
    frames
}

/// A stream exercising every frame type, including a mid-stream
/// full-resync transfer (`REDIS0009xyz`, 12 raw bytes, no terminator).
fn mixed_stream() -> (Vec<u8>, Vec<Frame>) {
    let mut stream = Vec::new();
    stream.extend_from_slice(b"+OK\r\n");
    stream.extend_from_slice(b":123\r\n");
    stream.extend_from_slice(b"$6\r\nfoobar\r\n");
    stream.extend_from_slice(b"$-1\r\n");
    stream.extend_from_slice(b"*2\r\n:1\r\n$3\r\nabc\r\n");
    stream.extend_from_slice(b"$12\r\nREDIS0009xyz");
    stream.extend_from_slice(b"-ERR bad\r\n");

    let expected = vec![
        Frame::simple_string("OK"),
        Frame::integer(123),
        Frame::bulk_string("foobar"),
        Frame::null_bulk_string(),
        Frame::array(vec![Frame::integer(1), Frame::bulk_string("abc")]),
        Frame::bulk_transfer(&b"REDIS0009xyz"[..]),
        Frame::error("ERR", "bad"),
    ];
    (stream, expected)
}

#[test]
fn test_simple_string() {
    assert_eq!(
        decode_all(b"+OK\r\n").unwrap(),
        vec![Frame::simple_string("OK")]
    );
}

#[test]
fn test_error_excludes_kind_from_message() {
    let frames = decode_all(b"-ERR bad\r\n").unwrap();
    assert_eq!(frames, vec![Frame::error("ERR", "bad")]);
    let Frame::Error { kind, message } = &frames[0] else {
        panic!("expected error frame");
    };
    assert_eq!(kind, "ERR");
    assert_eq!(message, "bad");
}

#[test]
fn test_error_without_message() {
    assert_eq!(
        decode_all(b"-WRONGTYPE\r\n").unwrap(),
        vec![Frame::error("WRONGTYPE", "")]
    );
}

#[test]
fn test_bulk_string() {
    assert_eq!(
        decode_all(b"$6\r\nfoobar\r\n").unwrap(),
        vec![Frame::bulk_string("foobar")]
    );
}

#[test]
fn test_null_bulk_string_consumes_no_body() {
    let mut decoder = FrameDecoder::new();
    decoder.feed(b"$-1\r\n+OK\r\n").unwrap();
    assert_eq!(
        decoder.take_frames(),
        vec![Frame::null_bulk_string(), Frame::simple_string("OK")]
    );
}

#[test]
fn test_empty_bulk_string() {
    assert_eq!(
        decode_all(b"$0\r\n\r\n").unwrap(),
        vec![Frame::bulk_string("")]
    );
}

#[test]
fn test_resync_transfer_keeps_magic_prefix() {
    let mut input = Vec::from(&b"$20\r\nREDIS0011"[..]);
    input.extend_from_slice(&[0xAB; 11]);

    let frames = decode_all(&input).unwrap();
    assert_eq!(frames.len(), 1);
    let Frame::BulkTransfer(payload) = &frames[0] else {
        panic!("expected transfer, got {:?}", frames[0]);
    };
    assert_eq!(payload.len(), 20);
    assert_eq!(&payload[..9], b"REDIS0011");
    assert_eq!(&payload[9..], &[0xAB; 11]);
}

#[test]
fn test_literal_bulk_is_not_mistaken_for_transfer() {
    // Five-plus bytes that do not open with the magic: literal string,
    // terminator required and consumed.
    let mut decoder = FrameDecoder::new();
    decoder.feed(b"$8\r\nnotredis\r\n:7\r\n").unwrap();
    assert_eq!(
        decoder.take_frames(),
        vec![Frame::bulk_string("notredis"), Frame::integer(7)]
    );
}

#[test]
fn test_array_of_integers() {
    assert_eq!(
        decode_all(b"*2\r\n:1\r\n:2\r\n").unwrap(),
        vec![Frame::array(vec![Frame::integer(1), Frame::integer(2)])]
    );
}

#[test]
fn test_nested_array() {
    let frames = decode_all(b"*2\r\n*1\r\n+a\r\n:5\r\n").unwrap();
    assert_eq!(
        frames,
        vec![Frame::array(vec![
            Frame::array(vec![Frame::simple_string("a")]),
            Frame::integer(5),
        ])]
    );
}

#[test]
fn test_null_and_empty_arrays() {
    assert_eq!(decode_all(b"*-1\r\n").unwrap(), vec![Frame::array(vec![])]);
    assert_eq!(decode_all(b"*0\r\n").unwrap(), vec![Frame::array(vec![])]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[case(64)]
fn test_chunking_transparency(#[case] chunk: usize) {
    let (stream, expected) = mixed_stream();
    assert_eq!(decode_chunked(&stream, chunk), expected);
    assert_eq!(decode_all(&stream).unwrap(), expected);
}

#[test]
fn test_incomplete_frame_is_held_back() {
    let mut decoder = FrameDecoder::new();
    decoder.feed(b"+OK").unwrap();
    assert!(decoder.take_frames().is_empty());
    decoder.feed(b"\r\n").unwrap();
    assert_eq!(decoder.take_frames(), vec![Frame::simple_string("OK")]);
}

#[test]
fn test_unknown_tag_fails() {
    let mut decoder = FrameDecoder::new();
    assert_eq!(
        decoder.feed(b"!3\r\nERR\r\n").unwrap_err(),
        ProtocolError::UnknownType(b'!')
    );
}

#[test]
fn test_feed_after_error_repeats_it() {
    let mut decoder = FrameDecoder::new();
    let first = decoder.feed(b"?\r\n").unwrap_err();
    let second = decoder.feed(b"+OK\r\n").unwrap_err();
    assert_eq!(first, second);
    assert!(decoder.take_frames().is_empty());
}

#[test]
fn test_double_drain_yields_nothing_twice() {
    let mut decoder = FrameDecoder::new();
    decoder.feed(b"+OK\r\n").unwrap();
    assert_eq!(decoder.take_frames().len(), 1);
    assert!(decoder.take_frames().is_empty());
    assert!(decoder.take_frames().is_empty());
}

#[test]
fn test_drain_compacts_grown_buffer() {
    let config = DecoderConfig {
        buffer_capacity: 64,
        ..DecoderConfig::default()
    };
    let mut decoder = FrameDecoder::with_config(config);

    let payload = vec![b'x'; 200];
    let mut input = format!("${}\r\n", payload.len()).into_bytes();
    input.extend_from_slice(&payload);
    input.extend_from_slice(b"\r\n");

    decoder.feed(&input).unwrap();
    assert!(decoder.buffer_capacity() > 64);

    let frames = decoder.take_frames();
    assert_eq!(frames, vec![Frame::BulkString(Some(Bytes::from(payload)))]);
    assert_eq!(decoder.buffer_capacity(), 64);
}

#[test]
fn test_no_compaction_mid_frame() {
    let config = DecoderConfig {
        buffer_capacity: 16,
        ..DecoderConfig::default()
    };
    let mut decoder = FrameDecoder::with_config(config);

    // Header plus a partial payload much larger than the default ring.
    decoder.feed(b"$100\r\n").unwrap();
    decoder.feed(&[b'y'; 60]).unwrap();
    let grown = decoder.buffer_capacity();
    assert!(grown > 16);

    assert!(decoder.take_frames().is_empty());
    assert_eq!(decoder.buffer_capacity(), grown);

    // Completing the frame and draining compacts after all.
    decoder.feed(&[b'y'; 40]).unwrap();
    decoder.feed(b"\r\n").unwrap();
    assert_eq!(decoder.take_frames().len(), 1);
    assert_eq!(decoder.buffer_capacity(), 16);
}

#[test]
fn test_bad_bulk_terminator_is_error_not_incomplete() {
    let mut decoder = FrameDecoder::new();
    assert_eq!(
        decoder.feed(b"$3\r\nfooXY").unwrap_err(),
        ProtocolError::MissingTerminator
    );
}

#[test]
fn test_bulk_length_above_limit_rejected_before_buffering() {
    let config = DecoderConfig {
        max_frame_size: 16,
        ..DecoderConfig::default()
    };
    let mut decoder = FrameDecoder::with_config(config);
    assert_eq!(
        decoder.feed(b"$100\r\n").unwrap_err(),
        ProtocolError::FrameTooLarge {
            size: 100,
            limit: 16
        }
    );
}

#[test]
fn test_unterminated_garbage_hits_size_cap() {
    let config = DecoderConfig {
        max_frame_size: 32,
        ..DecoderConfig::default()
    };
    let mut decoder = FrameDecoder::with_config(config);
    let mut garbage = vec![b'+'];
    garbage.extend_from_slice(&[b'a'; 64]);
    assert!(matches!(
        decoder.feed(&garbage).unwrap_err(),
        ProtocolError::FrameTooLarge { .. }
    ));
}

#[test]
fn test_negative_lengths_below_null_marker() {
    let mut decoder = FrameDecoder::new();
    assert_eq!(
        decoder.feed(b"$-2\r\n").unwrap_err(),
        ProtocolError::InvalidBulkLength(-2)
    );

    let mut decoder = FrameDecoder::new();
    assert_eq!(
        decoder.feed(b"*-2\r\n").unwrap_err(),
        ProtocolError::InvalidArrayLength(-2)
    );
}

#[test]
fn test_integer_overflow_is_reported() {
    let mut decoder = FrameDecoder::new();
    assert!(matches!(
        decoder.feed(b":99999999999999999999\r\n").unwrap_err(),
        ProtocolError::InvalidInteger(_)
    ));
}

#[test]
fn test_transfer_followed_by_replication_stream() {
    // After the RDB image, the link switches to ordinary command frames.
    let mut input = Vec::from(&b"$9\r\nREDIS0011"[..]);
    input.extend_from_slice(b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");

    let frames = decode_all(&input).unwrap();
    assert_eq!(
        frames,
        vec![
            Frame::bulk_transfer(&b"REDIS0011"[..]),
            Frame::array(vec![
                Frame::bulk_string("SET"),
                Frame::bulk_string("k"),
                Frame::bulk_string("v"),
            ]),
        ]
    );
}
