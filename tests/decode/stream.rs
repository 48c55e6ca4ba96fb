// The streaming driver: cursors, pauses, and session lifecycle
//
// Tests verify:
//   - a 100-byte stream drains through a 10-byte buffer in exactly 10 calls
//   - one-byte input chunks give the same output as a single call
//   - calls with no input or no output room are harmless pauses
//   - bytes after the end of the stream are handed back to the caller
//   - a call after Success fails with InvalidUsage
//   - errors are sticky and consume nothing further
//   - custom dictionaries are only accepted before decoding starts

use brotli::{BrotliError, BrotliResult, BrotliState, DecodeStage};

use crate::common::{
    abc_copy_stream, decode_chunked, dictionary_stream, stored_stream, ABCABC_STORED,
    EMPTY_STREAM,
};

fn call(state: &mut BrotliState<'_>, input: &mut &[u8], out: &mut [u8]) -> (BrotliResult, usize) {
    let mut next_out: &mut [u8] = out;
    let mut total_out = 0usize;
    let result = state.decompress_stream(input, &mut next_out, &mut total_out);
    (result, total_out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Output pacing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hundred_bytes_through_ten_byte_buffer() {
    let data: Vec<u8> = (0..100u8).collect();
    let stream = stored_stream(&data);
    let out = decode_chunked(&stream, stream.len(), 10);
    assert_eq!(out.result, BrotliResult::Success);
    assert_eq!(out.calls, 10);
    assert_eq!(out.output, data);
    assert_eq!(out.total_out, 100);
}

#[test]
fn one_byte_input_chunks() {
    for stream in [ABCABC_STORED.to_vec(), abc_copy_stream(), dictionary_stream(5, 0, 5)] {
        let whole = decode_chunked(&stream, stream.len(), 1 << 16);
        let split = decode_chunked(&stream, 1, 1);
        assert_eq!(split.result, BrotliResult::Success);
        assert_eq!(split.output, whole.output);
        assert_eq!(split.total_out, whole.output.len());
    }
}

#[test]
fn total_out_accumulates() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &ABCABC_STORED;
    let mut buf = [0u8; 4];
    let mut next_out: &mut [u8] = &mut buf;
    let mut total_out = 1000usize;
    let result = state.decompress_stream(&mut input, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::NeedsMoreOutput);
    assert_eq!(total_out, 1004);
    assert_eq!(state.pending_output(), 2);

    let mut buf = [0u8; 4];
    let mut next_out: &mut [u8] = &mut buf;
    let result = state.decompress_stream(&mut input, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(total_out, 1006);
    assert_eq!(next_out.len(), 2);
    assert_eq!(&buf[..2], b"bc");
}

// ─────────────────────────────────────────────────────────────────────────────
// Zero-resource calls
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_before_start() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &[];
    let mut buf = [0u8; 8];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::NeedsMoreInput, 0));
    assert_eq!(state.stage(), DecodeStage::Uninitialized);
    // Nothing consumed, so a dictionary is still accepted.
    assert!(state.set_custom_dictionary(b"abc").is_ok());
}

#[test]
fn repeated_empty_calls_are_idempotent() {
    let mut state = BrotliState::new();
    // Header plus the first body byte.
    let mut input: &[u8] = &ABCABC_STORED[..4];
    let mut buf = [0u8; 8];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::NeedsMoreInput, 1));
    assert_eq!(buf[0], b'a');
    let stage = state.stage();
    for _ in 0..3 {
        let mut empty: &[u8] = &[];
        assert_eq!(call(&mut state, &mut empty, &mut buf), (BrotliResult::NeedsMoreInput, 0));
        assert_eq!(state.stage(), stage);
    }
    let mut rest: &[u8] = &ABCABC_STORED[4..];
    let (result, written) = call(&mut state, &mut rest, &mut buf);
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(&buf[..written], b"bcabc");
}

#[test]
fn zero_output_room_with_pending_bytes() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &ABCABC_STORED;
    let (result, written) = call(&mut state, &mut input, &mut []);
    assert_eq!((result, written), (BrotliResult::NeedsMoreOutput, 0));
    assert_eq!(state.pending_output(), 6);
    let (result, written) = call(&mut state, &mut input, &mut []);
    assert_eq!((result, written), (BrotliResult::NeedsMoreOutput, 0));
    let mut buf = [0u8; 6];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::Success, 6));
}

#[test]
fn pending_output_with_input_exhausted_asks_for_output() {
    let data = [7u8; 40];
    let stream = stored_stream(&data);
    let mut state = BrotliState::new();
    // Header plus the stored body, without the closing meta-block.
    let mut input: &[u8] = &stream[..stream.len() - 1];
    let mut buf = [0u8; 10];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::NeedsMoreOutput, 10));
    assert!(input.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// End of stream
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn trailing_bytes_are_handed_back() {
    let mut stream = ABCABC_STORED.to_vec();
    stream.extend_from_slice(b"XYZ");
    let mut state = BrotliState::new();
    let mut input: &[u8] = &stream;
    let mut buf = [0u8; 16];
    let (result, written) = call(&mut state, &mut input, &mut buf);
    assert_eq!((result, written), (BrotliResult::Success, 6));
    assert_eq!(input, b"XYZ");
}

#[test]
fn trailing_bytes_after_compressed_stream() {
    let mut stream = abc_copy_stream();
    let body = stream.len();
    stream.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let mut state = BrotliState::new();
    let mut input: &[u8] = &stream;
    let mut buf = [0u8; 16];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::Success, 6));
    assert_eq!(input, &stream[body..]);
}

#[test]
fn call_after_success_is_invalid_usage() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &EMPTY_STREAM;
    let mut buf = [0u8; 4];
    assert_eq!(call(&mut state, &mut input, &mut buf).0, BrotliResult::Success);
    assert!(state.is_finished());

    let mut more: &[u8] = &EMPTY_STREAM;
    assert_eq!(call(&mut state, &mut more, &mut buf).0, BrotliResult::Error);
    assert_eq!(state.last_error(), Some(BrotliError::InvalidUsage));
    assert_eq!(more.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn errors_are_sticky() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &[0b0001_0001];
    let mut buf = [0u8; 4];
    assert_eq!(call(&mut state, &mut input, &mut buf).0, BrotliResult::Error);
    assert_eq!(state.stage(), DecodeStage::Error);
    assert_eq!(state.last_error(), Some(BrotliError::InvalidWindowBits));

    let mut good: &[u8] = &ABCABC_STORED;
    assert_eq!(call(&mut state, &mut good, &mut buf), (BrotliResult::Error, 0));
    assert_eq!(good.len(), ABCABC_STORED.len());
    assert_eq!(state.last_error(), Some(BrotliError::InvalidWindowBits));
}

#[test]
fn custom_dictionary_after_start_is_rejected() {
    let mut state = BrotliState::new();
    let mut input: &[u8] = &ABCABC_STORED[..2];
    let mut buf = [0u8; 4];
    call(&mut state, &mut input, &mut buf);
    assert_eq!(state.set_custom_dictionary(b"late"), Err(BrotliError::InvalidUsage));
}

#[test]
fn custom_dictionary_is_never_emitted() {
    let mut state = BrotliState::new();
    state.set_custom_dictionary(b"prefix bytes").unwrap();
    let mut input: &[u8] = &ABCABC_STORED;
    let mut buf = [0u8; 32];
    assert_eq!(call(&mut state, &mut input, &mut buf), (BrotliResult::Success, 6));
    assert_eq!(&buf[..6], b"abcabc");
}
