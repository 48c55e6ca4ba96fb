//! E2E Test Suite 06: Independent sessions across threads
//!
//! Sessions share only the read-only static dictionary, so many can run at
//! once:
//! - parallel one-shot decodes of different streams
//! - a session created on one thread and finished on another
//! - parallel streaming decodes with different chunking

#[path = "../tests/common/mod.rs"]
mod common;

use std::thread;

use rayon::prelude::*;

use brotli::{decompress_to_vec, BrotliResult, BrotliState};

use common::{decode_chunked, encode, sample_data};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Parallel one-shot decoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parallel_one_shot() {
    let inputs: Vec<Vec<u8>> = (0..32).map(|i| sample_data(5_000 + i * 997)).collect();
    let streams: Vec<Vec<u8>> = inputs
        .par_iter()
        .enumerate()
        .map(|(i, data)| encode(data, (i % 12) as u32, 16 + (i % 9) as u32))
        .collect();
    let decoded: Vec<Vec<u8>> = streams
        .par_iter()
        .map(|s| decompress_to_vec(s).unwrap())
        .collect();
    for (got, want) in decoded.iter().zip(&inputs) {
        assert!(got == want);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Session moved between threads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_session_moves_between_threads() {
    let data = sample_data(40_000);
    let compressed = encode(&data, 9, 18);
    let half = compressed.len() / 2;

    let mut state = BrotliState::new();
    let mut first = Vec::new();
    {
        let mut next_in: &[u8] = &compressed[..half];
        let mut buf = vec![0u8; data.len()];
        let mut next_out: &mut [u8] = &mut buf;
        let mut total_out = 0usize;
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
        assert_eq!(result, BrotliResult::NeedsMoreInput);
        assert!(next_in.is_empty());
        first.extend_from_slice(&buf[..total_out]);
    }

    let rest = compressed[half..].to_vec();
    let (second, result) = thread::spawn(move || {
        let mut next_in: &[u8] = &rest;
        let mut buf = vec![0u8; 64 * 1024];
        let mut next_out: &mut [u8] = &mut buf;
        let mut total_out = 0usize;
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
        (buf[..total_out].to_vec(), result)
    })
    .join()
    .unwrap();

    assert_eq!(result, BrotliResult::Success);
    first.extend_from_slice(&second);
    assert!(first == data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Parallel streaming with varied chunking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parallel_streaming() {
    let data = sample_data(60_000);
    let compressed = encode(&data, 11, 20);
    let ok = (1..=24usize)
        .into_par_iter()
        .map(|k| decode_chunked(&compressed, k * 13, k * 101))
        .all(|out| out.result == BrotliResult::Success && out.output == data);
    assert!(ok);
}
