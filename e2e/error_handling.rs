//! E2E Test Suite 03: Corrupt and truncated input
//!
//! The decoder must reject damaged streams with an error code and never
//! panic, read out of bounds, or loop forever:
//! - every strict prefix of a valid stream is reported as truncated
//! - single-bit flips anywhere in a stream decode or fail cleanly
//! - random garbage is rejected
//! - after an error the session stays failed

#[path = "../tests/common/mod.rs"]
mod common;

use brotli::{decompress_buffer, decompress_to_vec, BrotliError, BrotliResult, BrotliState};

use common::{decode_chunked, encode, sample_data};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Truncation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_every_prefix_is_rejected() {
    let data = sample_data(4_000);
    let compressed = encode(&data, 9, 16);
    for cut in 0..compressed.len() {
        match decompress_to_vec(&compressed[..cut]) {
            Err(BrotliError::TruncatedHeader) | Err(BrotliError::LengthMismatch) => {}
            other => panic!("prefix of {cut} bytes: {other:?}"),
        }
    }
}

#[test]
fn test_truncated_stream_reports_needs_more_input() {
    let data = sample_data(20_000);
    let compressed = encode(&data, 5, 18);
    let half = &compressed[..compressed.len() / 2];
    let out = decode_chunked(half, 100, 4096);
    assert_eq!(out.result, BrotliResult::NeedsMoreInput);
    assert!(data.starts_with(&out.output));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Bit flips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_bit_flips_never_panic() {
    let data = sample_data(2_000);
    for quality in [1, 6, 11] {
        let compressed = encode(&data, quality, 16);
        let mut out = vec![0u8; data.len() * 2];
        for byte in 0..compressed.len() {
            for bit in 0..8 {
                let mut damaged = compressed.clone();
                damaged[byte] ^= 1 << bit;
                let _ = decompress_buffer(&damaged, &mut out);
            }
        }
    }
}

#[test]
fn test_bit_flips_in_streaming_mode() {
    let data = sample_data(1_500);
    let compressed = encode(&data, 9, 16);
    for byte in (0..compressed.len()).step_by(3) {
        let mut damaged = compressed.clone();
        damaged[byte] ^= 0x5a;
        let out = decode_chunked(&damaged, 7, 64);
        assert!(out.output.len() <= 1 << 24);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Garbage input
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_random_garbage() {
    let mut seed = 0x9e37_79b9_7f4a_7c15u64;
    let mut out = vec![0u8; 1 << 16];
    for len in [1usize, 2, 5, 16, 100, 1000, 10_000] {
        for _ in 0..50 {
            let garbage: Vec<u8> = (0..len)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 7;
                    seed ^= seed << 17;
                    seed as u8
                })
                .collect();
            let _ = decompress_buffer(&garbage, &mut out);
        }
    }
}

#[test]
fn test_all_ones_and_all_zeros() {
    let mut out = vec![0u8; 1 << 16];
    assert!(decompress_buffer(&[0xff; 64], &mut out).is_err());
    // WBITS=16 followed by an endless run of zero-length-looking headers.
    assert!(decompress_buffer(&[0x00; 64], &mut out).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Session after failure
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_failed_session_stays_failed() {
    let data = sample_data(3_000);
    let good = encode(&data, 6, 16);
    let mut bad = good.clone();
    bad[0] = 0x11; // reserved WBITS

    let mut state = BrotliState::new();
    let mut next_in: &[u8] = &bad;
    let mut buf = vec![0u8; 8192];
    let mut next_out: &mut [u8] = &mut buf;
    let mut total_out = 0usize;
    let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::Error);
    assert_eq!(state.last_error(), Some(BrotliError::InvalidWindowBits));

    let mut next_in: &[u8] = &good;
    let mut next_out: &mut [u8] = &mut buf;
    let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
    assert_eq!(result, BrotliResult::Error);
    assert_eq!(total_out, 0);
    assert_eq!(next_in.len(), good.len());
}
