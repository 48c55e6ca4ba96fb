//! E2E Test Suite 01: Round-trips against the reference encoder
//!
//! Streams produced by the reference Brotli encoder must decode to the exact
//! input, across:
//! - every quality level (0 = stored-ish fast path, 11 = full context modelling)
//! - window sizes from 10 to 24 bits
//! - empty, tiny, highly repetitive and incompressible inputs
//! - a fixture compressed by the C encoder

#[path = "../tests/common/mod.rs"]
mod common;

use brotli::{decompress_buffer, decompress_to_vec, decompressed_size};

use common::{encode, sample_data};

fn pseudo_random(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 56) as u8
        })
        .collect()
}

fn assert_roundtrip(data: &[u8], quality: u32, lgwin: u32) {
    let compressed = encode(data, quality, lgwin);
    let decoded = decompress_to_vec(&compressed)
        .unwrap_or_else(|e| panic!("q={quality} lgwin={lgwin} len={}: {e}", data.len()));
    assert!(decoded == data, "q={quality} lgwin={lgwin}: output differs");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Every quality level on mixed text
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_quality_levels() {
    let data = sample_data(100_000);
    for quality in 0..=11 {
        assert_roundtrip(&data, quality, 22);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Window sizes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_window_sizes() {
    let data = sample_data(200_000);
    for lgwin in 10..=24 {
        assert_roundtrip(&data, 5, lgwin);
    }
}

#[test]
fn test_small_window_with_long_range_repeats() {
    // Repeats farther apart than a 1 KiB window can reach.
    let block = pseudo_random(3000, 7);
    let mut data = block.clone();
    data.extend_from_slice(&block);
    data.extend_from_slice(&block);
    assert_roundtrip(&data, 9, 10);
    assert_roundtrip(&data, 9, 16);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Edge-case inputs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_input() {
    for quality in [0, 5, 11] {
        assert_roundtrip(b"", quality, 22);
    }
}

#[test]
fn test_single_byte() {
    for quality in [0, 1, 5, 11] {
        assert_roundtrip(b"x", quality, 22);
    }
}

#[test]
fn test_long_run_of_one_byte() {
    assert_roundtrip(&vec![b'a'; 1 << 20], 9, 22);
}

#[test]
fn test_incompressible_data() {
    let data = pseudo_random(300_000, 42);
    for quality in [1, 6, 11] {
        assert_roundtrip(&data, quality, 22);
    }
}

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255u8).cycle().take(65_536).collect();
    assert_roundtrip(&data, 11, 18);
}

#[test]
fn test_dictionary_friendly_text() {
    // Common English words let the encoder reach for static dictionary
    // references and their transforms.
    let text = b"The information contained in this document is provided for the \
        purpose of the project. However, the University of California and the \
        government of the United States make no representation about the \
        International standards. Click here to download the PDF version. ";
    let data: Vec<u8> = text.iter().copied().cycle().take(20_000).collect();
    for quality in [5, 9, 11] {
        assert_roundtrip(&data, quality, 22);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Reference fixture
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ipsum_fixture() {
    let compressed = include_bytes!("../tests/fixtures/ipsum.brotli");
    let expected = include_bytes!("../tests/fixtures/ipsum.raw");
    assert_eq!(decompress_to_vec(compressed).unwrap(), &expected[..]);

    let mut out = vec![0u8; expected.len()];
    assert_eq!(decompress_buffer(compressed, &mut out), Ok(expected.len()));
    assert_eq!(out, &expected[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Size probe agrees with the decoder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decompressed_size_matches_when_known() {
    for len in [0usize, 1, 100, 5000] {
        let data = sample_data(len);
        let compressed = encode(&data, 11, 22);
        if let Some(size) = decompressed_size(&compressed) {
            assert_eq!(size, len);
        }
    }
}
