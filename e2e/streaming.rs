//! E2E Test Suite 02: Streaming decode with bounded buffers
//!
//! Feeds encoder output through `decompress_stream` in small pieces and
//! checks that:
//! - any split of input and output produces the same bytes
//! - one-byte input and one-byte output still terminate with Success
//! - total_out always matches the bytes handed out
//! - input fed after the stream ends is left untouched

#[path = "../tests/common/mod.rs"]
mod common;

use brotli::{decompress_to_vec, BrotliResult, BrotliState};

use common::{decode_chunked, encode, sample_data};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Chunk size grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chunk_size_grid() {
    let data = sample_data(50_000);
    let compressed = encode(&data, 9, 18);
    for in_chunk in [1usize, 3, 17, 256, 4096, compressed.len()] {
        for out_chunk in [1usize, 7, 1000, 65_536] {
            let out = decode_chunked(&compressed, in_chunk, out_chunk);
            assert_eq!(out.result, BrotliResult::Success, "in={in_chunk} out={out_chunk}");
            assert!(out.output == data, "in={in_chunk} out={out_chunk}: output differs");
            assert_eq!(out.total_out, data.len());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Byte-at-a-time over every quality
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_byte_at_a_time_all_qualities() {
    let data = sample_data(8_000);
    for quality in 0..=11 {
        let compressed = encode(&data, quality, 16);
        let out = decode_chunked(&compressed, 1, 1);
        assert_eq!(out.result, BrotliResult::Success, "quality {quality}");
        assert!(out.output == data, "quality {quality}: output differs");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Output smaller than the window, large window
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_large_output_through_small_buffer() {
    let data = sample_data(3 << 20);
    let compressed = encode(&data, 5, 24);
    let out = decode_chunked(&compressed, 64 * 1024, 4096);
    assert_eq!(out.result, BrotliResult::Success);
    assert_eq!(out.output.len(), data.len());
    assert!(out.output == data);
}

#[test]
fn test_small_window_wraps_many_times() {
    let data = sample_data(500_000);
    let compressed = encode(&data, 7, 10);
    let out = decode_chunked(&compressed, 100, 333);
    assert_eq!(out.result, BrotliResult::Success);
    assert!(out.output == data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Manual driving with irregular slices
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_irregular_slices() {
    let data = sample_data(120_000);
    let compressed = encode(&data, 11, 22);
    let mut state = BrotliState::new();
    let mut output = Vec::new();
    let mut buf = vec![0u8; 5000];
    let mut pos = 0usize;
    let mut step = 1usize;
    let mut total_out = 0usize;
    let result = loop {
        let end = (pos + step).min(compressed.len());
        let mut next_in = &compressed[pos..end];
        let out_len = 1 + (step * 37) % buf.len();
        let mut next_out: &mut [u8] = &mut buf[..out_len];
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
        let written = out_len - next_out.len();
        output.extend_from_slice(&buf[..written]);
        pos = end - next_in.len();
        step = step % 97 + 13;
        match result {
            BrotliResult::NeedsMoreInput if end == compressed.len() => break result,
            BrotliResult::NeedsMoreInput | BrotliResult::NeedsMoreOutput => continue,
            other => break other,
        }
    };
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(total_out, output.len());
    assert!(output == data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Concatenated streams
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_back_to_back_streams() {
    let first = sample_data(10_000);
    let second: Vec<u8> = sample_data(12_000).into_iter().rev().collect();
    let mut joined = encode(&first, 6, 20);
    let split = joined.len();
    joined.extend_from_slice(&encode(&second, 6, 20));

    let mut state = BrotliState::new();
    let mut next_in: &[u8] = &joined;
    let mut buf = vec![0u8; 64 * 1024];
    let mut next_out: &mut [u8] = &mut buf;
    let mut total_out = 0usize;
    let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(next_in.len(), joined.len() - split);
    assert!(buf[..total_out] == first[..]);

    assert!(decompress_to_vec(next_in).unwrap() == second);
}
