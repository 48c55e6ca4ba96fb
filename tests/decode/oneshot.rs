// Whole-buffer wrappers and the size probe
//
// Tests verify:
//   - decompress_buffer() reports the decoded length
//   - a short output buffer gives OutputTooSmall
//   - a stream cut inside a body gives LengthMismatch
//   - decompress_to_vec() handles output larger than its internal chunk
//   - decompressed_size() for every header shape it supports

use brotli::{decompress_buffer, decompress_to_vec, decompressed_size, BrotliError};

use crate::common::{abc_copy_stream, dictionary_stream, stored_stream, ABCABC_STORED, EMPTY_STREAM};

#[test]
fn buffer_exact_fit() {
    let mut out = [0u8; 6];
    assert_eq!(decompress_buffer(&ABCABC_STORED, &mut out), Ok(6));
    assert_eq!(&out, b"abcabc");
}

#[test]
fn buffer_larger_than_needed() {
    let mut out = [0xffu8; 64];
    assert_eq!(decompress_buffer(&abc_copy_stream(), &mut out), Ok(6));
    assert_eq!(&out[..6], b"abcabc");
    assert_eq!(out[6], 0xff);
}

#[test]
fn buffer_too_small() {
    let mut out = [0u8; 5];
    assert_eq!(decompress_buffer(&ABCABC_STORED, &mut out), Err(BrotliError::OutputTooSmall));
}

#[test]
fn body_cut_short() {
    let mut out = [0u8; 16];
    assert_eq!(
        decompress_buffer(&ABCABC_STORED[..6], &mut out),
        Err(BrotliError::LengthMismatch)
    );
    let stream = abc_copy_stream();
    assert_eq!(
        decompress_to_vec(&stream[..stream.len() - 1]),
        Err(BrotliError::LengthMismatch)
    );
}

#[test]
fn to_vec_spans_many_chunks() {
    let data: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(decompress_to_vec(&stored_stream(&data)).unwrap(), data);
}

#[test]
fn size_of_empty_stream() {
    assert_eq!(decompressed_size(&EMPTY_STREAM), Some(0));
}

#[test]
fn size_of_compressed_last_meta_block() {
    assert_eq!(decompressed_size(&abc_copy_stream()), Some(6));
    assert_eq!(decompressed_size(&dictionary_stream(10, 0, 10)), Some(10));
}

#[test]
fn size_of_stored_plus_empty_last() {
    assert_eq!(decompressed_size(&ABCABC_STORED), Some(6));
    let data = [1u8; 1000];
    assert_eq!(decompressed_size(&stored_stream(&data)), Some(1000));
}

#[test]
fn size_unknown_for_multi_block_streams() {
    let data = vec![1u8; 70_000];
    assert_eq!(decompressed_size(&stored_stream(&data)), None);
    assert_eq!(decompressed_size(&[]), None);
}
