//! E2E Test Suite 05: Custom dictionaries
//!
//! A custom dictionary pre-seeds the window with history that
//! back-references may reach but that is never emitted:
//! - short distances resolve into the dictionary bytes
//! - only the last (1 << WBITS) - 16 bytes are reachable
//! - a distance one past the seeded history falls through to the static
//!   dictionary
//! - the read adapter and the streaming API agree

#[path = "../tests/common/mod.rs"]
mod common;

use std::io::Read;

use brotli::{BrotliError, BrotliResult, BrotliState, Decompressor};

use common::{decode_chunked_with, dictionary_stream, stored_stream};

fn decode_with(dict: &[u8], stream: &[u8]) -> (BrotliResult, Vec<u8>, Option<BrotliError>) {
    let mut state = BrotliState::new();
    state.set_custom_dictionary(dict).unwrap();
    let out = decode_chunked_with(&mut state, stream, 5, 3);
    (out.result, out.output, state.last_error())
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Copies from the dictionary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_copy_from_dictionary_tail() {
    let dict = b"the quick brown fox jumps over the lazy dog";
    // "lazy " starts 8 bytes from the end.
    let (result, output, _) = decode_with(dict, &dictionary_stream(5, 7, 5));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"lazy ");
}

#[test]
fn test_overlapping_copy_from_dictionary() {
    // Distance 2, length 6: repeats the last two dictionary bytes.
    let (result, output, _) = decode_with(b"xyzab", &dictionary_stream(6, 1, 6));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"ababab");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Window limit
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_only_window_tail_is_reachable() {
    // WBITS = 16: 65520 bytes of history.
    let dict: Vec<u8> = (0..70_000u32).map(|i| (i % 199) as u8).collect();
    let reach = 65_520usize;

    let (result, output, _) = decode_with(&dict, &dictionary_stream(5, reach - 1, 5));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, &dict[dict.len() - reach..dict.len() - reach + 5]);

    // One further addresses static dictionary word 0 of length 5.
    let (result, output, _) = decode_with(&dict, &dictionary_stream(5, reach, 5));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"first");
}

#[test]
fn test_static_dictionary_index_shifts_with_history() {
    // With 10 bytes of history, distance 11 + word id addresses the static
    // dictionary.
    let dict = b"0123456789";
    let (result, output, _) = decode_with(dict, &dictionary_stream(4, 10 + 1, 4));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"down");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Dictionary does not change plain output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stored_stream_ignores_dictionary() {
    let stream = stored_stream(b"unrelated content");
    let (result, output, _) = decode_with(b"some dictionary", &stream);
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"unrelated content");
}

#[test]
fn test_empty_dictionary_is_a_no_op() {
    let (result, output, _) = decode_with(b"", &dictionary_stream(4, 0, 4));
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(output, b"time");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Read adapter
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_read_adapter_with_dictionary() {
    let dict = b"the quick brown fox jumps over the lazy dog".to_vec();
    let stream = dictionary_stream(5, 7, 5);
    let mut reader = Decompressor::with_dictionary(&stream[..], &dict).unwrap();
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, b"lazy ");
}

#[test]
fn test_dictionary_after_start_fails() {
    let stream = stored_stream(b"abc");
    let mut state = BrotliState::new();
    let mut next_in: &[u8] = &stream[..1];
    let mut buf = [0u8; 8];
    let mut next_out: &mut [u8] = &mut buf;
    let mut total_out = 0;
    let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::NeedsMoreInput);
    assert_eq!(state.set_custom_dictionary(b"late"), Err(BrotliError::InvalidUsage));
}
