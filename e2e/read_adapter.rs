//! E2E Test Suite 04: `io::Read` adapter
//!
//! Exercises `brotli::Decompressor` over in-memory and trickling sources:
//! - read_to_end() and io::copy() reproduce the input
//! - tiny internal buffers and tiny caller buffers still work
//! - truncated sources fail with UnexpectedEof, corrupt ones with InvalidData
//! - bytes after the stream remain available through unused_input()

#[path = "../tests/common/mod.rs"]
mod common;

use std::io::{self, Cursor, Read};

use brotli::Decompressor;

use common::{encode, sample_data, stored_stream};

/// A reader that returns at most `step` bytes per call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Whole-stream reads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_read_to_end() {
    let data = sample_data(250_000);
    let compressed = encode(&data, 7, 22);
    let mut decoded = Vec::new();
    Decompressor::new(Cursor::new(&compressed))
        .read_to_end(&mut decoded)
        .unwrap();
    assert!(decoded == data);
}

#[test]
fn test_io_copy() {
    let data = sample_data(80_000);
    let compressed = encode(&data, 11, 20);
    let mut reader = Decompressor::new(&compressed[..]);
    let mut sink = Vec::new();
    let n = io::copy(&mut reader, &mut sink).unwrap();
    assert_eq!(n as usize, data.len());
    assert!(sink == data);
}

#[test]
fn test_empty_stream() {
    let mut decoded = Vec::new();
    Decompressor::new(&[0x06u8][..]).read_to_end(&mut decoded).unwrap();
    assert!(decoded.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Small buffers on both sides
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_one_byte_internal_buffer() {
    let data = sample_data(20_000);
    let compressed = encode(&data, 9, 16);
    let mut decoded = Vec::new();
    Decompressor::with_buffer_size(&compressed[..], 1)
        .read_to_end(&mut decoded)
        .unwrap();
    assert!(decoded == data);
}

#[test]
fn test_trickling_source_and_small_reads() {
    let data = sample_data(30_000);
    let compressed = encode(&data, 6, 18);
    let mut reader = Decompressor::new(Trickle { data: &compressed, step: 3 });
    let mut decoded = Vec::new();
    let mut buf = [0u8; 17];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        decoded.extend_from_slice(&buf[..n]);
    }
    assert!(decoded == data);
    // Further reads keep returning end of stream.
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_zero_length_read() {
    let compressed = encode(b"hello", 5, 16);
    let mut reader = Decompressor::new(&compressed[..]);
    assert_eq!(reader.read(&mut []).unwrap(), 0);
    let mut s = String::new();
    reader.read_to_string(&mut s).unwrap();
    assert_eq!(s, "hello");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_truncated_source() {
    let data = sample_data(10_000);
    let compressed = encode(&data, 5, 16);
    let cut = &compressed[..compressed.len() - 10];
    let err = Decompressor::new(cut).read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn test_corrupt_source() {
    let err = Decompressor::new(&[0x11u8, 0, 0, 0][..])
        .read_to_end(&mut Vec::new())
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(err.to_string().contains("ERROR_invalid_window_bits"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Trailing data and accessors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unused_input_after_stream() {
    let mut source = stored_stream(b"payload");
    source.extend_from_slice(b"TRAILER");
    let mut reader = Decompressor::new(&source[..]);
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, b"payload");
    assert_eq!(reader.unused_input(), b"TRAILER");
}

#[test]
fn test_into_inner_returns_source() {
    let compressed = encode(b"abc", 5, 16);
    let mut reader = Decompressor::new(Cursor::new(compressed.clone()));
    assert_eq!(reader.get_ref().position(), 0);
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded).unwrap();
    reader.get_mut().set_position(0);
    let cursor = reader.into_inner();
    assert_eq!(cursor.get_ref(), &compressed);
}
