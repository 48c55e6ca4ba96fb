// Compressed meta-blocks: the insert-and-copy command loop
//
// Tests verify:
//   - literals followed by a window copy
//   - copies past the window resolve to static dictionary words
//   - transforms are applied to dictionary words
//   - copies longer than the meta-block are rejected with LengthMismatch
//   - distances beyond both window and dictionary give InvalidDistance
//   - a custom dictionary turns the same distance into a window copy

use brotli::{decompress_to_vec, BrotliError, BrotliResult, BrotliState};

use crate::common::{abc_copy_stream, abc_copy_stream_with, decode_chunked_with, dictionary_stream};

#[test]
fn literals_then_window_copy() {
    assert_eq!(decompress_to_vec(&abc_copy_stream()).unwrap(), b"abcabc");
}

#[test]
fn copy_past_short_history_is_not_a_window_copy() {
    // Distance 4 with three bytes of history addresses the dictionary, and
    // no length-3 class exists.
    assert_eq!(
        decompress_to_vec(&abc_copy_stream_with(1)),
        Err(BrotliError::InvalidDistance)
    );
}

#[test]
fn dictionary_word_identity() {
    assert_eq!(decompress_to_vec(&dictionary_stream(4, 0, 4)).unwrap(), b"time");
    assert_eq!(decompress_to_vec(&dictionary_stream(4, 1, 4)).unwrap(), b"down");
    assert_eq!(decompress_to_vec(&dictionary_stream(5, 0, 5)).unwrap(), b"first");
}

#[test]
fn dictionary_word_with_copy_extra_bits() {
    assert_eq!(decompress_to_vec(&dictionary_stream(10, 0, 10)).unwrap(), b"categories");
    assert_eq!(decompress_to_vec(&dictionary_stream(9, 0, 9)).unwrap(), b"resources");
}

#[test]
fn dictionary_word_with_transform() {
    // Transform 4: upper-case first letter, then a space.
    let stream = dictionary_stream(4, 4 << 10, 5);
    assert_eq!(decompress_to_vec(&stream).unwrap(), b"Time ");
    // Transform 1: identity plus a space.
    let stream = dictionary_stream(4, (1 << 10) | 1, 5);
    assert_eq!(decompress_to_vec(&stream).unwrap(), b"down ");
}

#[test]
fn dictionary_word_longer_than_meta_block() {
    assert_eq!(
        decompress_to_vec(&dictionary_stream(4, 0, 3)),
        Err(BrotliError::LengthMismatch)
    );
}

#[test]
fn transform_id_past_table() {
    assert_eq!(
        decompress_to_vec(&dictionary_stream(4, 121 << 10, 4)),
        Err(BrotliError::InvalidDistance)
    );
}

#[test]
fn window_copy_longer_than_meta_block() {
    let mut state = BrotliState::new();
    state.set_custom_dictionary(b"hello world").unwrap();
    // Five-byte copy declared in a four-byte meta-block.
    let out = decode_chunked_with(&mut state, &dictionary_stream(5, 4, 4), 64, 64);
    assert_eq!(out.result, BrotliResult::Error);
    assert_eq!(state.last_error(), Some(BrotliError::LengthMismatch));
}

#[test]
fn custom_dictionary_serves_as_history() {
    let mut state = BrotliState::new();
    state.set_custom_dictionary(b"hello world").unwrap();
    let out = decode_chunked_with(&mut state, &dictionary_stream(5, 4, 5), 64, 64);
    assert_eq!(out.result, BrotliResult::Success);
    assert_eq!(out.output, b"world");
}

#[test]
fn dictionary_reference_resumes_through_small_output() {
    let mut state = BrotliState::new();
    let out = decode_chunked_with(&mut state, &dictionary_stream(10, 0, 10), 1, 3);
    assert_eq!(out.result, BrotliResult::Success);
    assert_eq!(out.output, b"categories");
}
