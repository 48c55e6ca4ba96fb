// Unit tests for src/huffman/reader.rs: prefix code descriptions
//
// Tests verify:
//   - simple codes with 1..=4 symbols and both 4-symbol shapes
//   - complex codes, including repeat-previous runs
//   - a description split byte by byte decodes identically
//   - duplicate or out-of-range simple symbols are rejected
//   - an incomplete complex code is rejected
//   - alphabet_bits() widths

use brotli::bit_reader::BitReader;
use brotli::decode::types::Interrupt;
use brotli::huffman::reader::alphabet_bits;
use brotli::huffman::{HuffmanTable, PrefixCodeReader};
use brotli::{BrotliError, CustomMem};

use crate::common::{write_simple_code, BitWriter};

fn read_code(alphabet: usize, bytes: &[u8]) -> Result<HuffmanTable, Interrupt> {
    let mut reader = PrefixCodeReader::new();
    let mut br = BitReader::new();
    let mut input = bytes;
    reader.read(alphabet, &CustomMem::default(), &mut br, &mut input)
}

fn decode_codes(table: &HuffmanTable, codes: &[&str]) -> Vec<u16> {
    let mut w = BitWriter::new();
    for c in codes {
        w.code(c);
    }
    let bits = w.finish();
    let mut br = BitReader::new();
    let mut input: &[u8] = &bits;
    codes
        .iter()
        .map(|_| table.read_symbol(&mut br, &mut input).unwrap())
        .collect()
}

// Fixed code for code-length-code lengths, as (bit count, LSB-first value).
fn cl_length(w: &mut BitWriter, value: u8) {
    match value {
        0 => w.bits(2, 0b00),
        1 => w.bits(4, 0b0111),
        2 => w.bits(3, 0b011),
        3 => w.bits(2, 0b10),
        4 => w.bits(2, 0b01),
        5 => w.bits(4, 0b1111),
        _ => unreachable!(),
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Simple codes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn simple_code_one_symbol() {
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 8, &[b'x' as u16]);
    let table = read_code(256, &w.finish()).unwrap();
    assert_eq!(table.lookup(0, 0), Some((b'x' as u16, 0)));
}

#[test]
fn simple_code_two_symbols_sorted_by_value() {
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 10, &[600, 3]);
    let table = read_code(704, &w.finish()).unwrap();
    // Both length 1: the smaller symbol takes code 0.
    assert_eq!(decode_codes(&table, &["0", "1"]), vec![3, 600]);
}

#[test]
fn simple_code_three_symbols() {
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 8, &[b'c' as u16, b'a' as u16, b'b' as u16]);
    let table = read_code(256, &w.finish()).unwrap();
    // The first listed symbol gets the 1-bit code.
    assert_eq!(
        decode_codes(&table, &["0", "10", "11"]),
        vec![b'c' as u16, b'a' as u16, b'b' as u16]
    );
}

#[test]
fn simple_code_four_symbols_flat_shape() {
    let mut w = BitWriter::new();
    w.bits(2, 1).bits(2, 3);
    for s in [7u64, 1, 4, 2] {
        w.bits(5, s);
    }
    w.bits(1, 0); // tree-select: all lengths 2
    let table = read_code(26, &w.finish()).unwrap();
    assert_eq!(decode_codes(&table, &["00", "01", "10", "11"]), vec![1, 2, 4, 7]);
}

#[test]
fn simple_code_four_symbols_skewed_shape() {
    let mut w = BitWriter::new();
    w.bits(2, 1).bits(2, 3);
    for s in [7u64, 1, 4, 2] {
        w.bits(5, s);
    }
    w.bits(1, 1); // tree-select: lengths 1, 2, 3, 3
    let table = read_code(26, &w.finish()).unwrap();
    // 7 -> 0, 1 -> 10, then 2 and 4 share length 3 in symbol order.
    assert_eq!(decode_codes(&table, &["0", "10", "110", "111"]), vec![7, 1, 2, 4]);
}

#[test]
fn simple_code_duplicate_symbols_rejected() {
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 8, &[5, 5]);
    assert_eq!(
        read_code(256, &w.finish()).err(),
        Some(Interrupt::Error(BrotliError::InvalidHuffmanCode))
    );
}

#[test]
fn simple_code_symbol_outside_alphabet_rejected() {
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 5, &[30]);
    assert_eq!(
        read_code(26, &w.finish()).err(),
        Some(Interrupt::Error(BrotliError::InvalidHuffmanCode))
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Complex codes
// ─────────────────────────────────────────────────────────────────────────────

/// Complex code over 4 symbols, all length 2: the code-length code has the
/// single symbol 2, so every symbol length is read with zero bits.
fn four_equal_lengths() -> Vec<u8> {
    let mut w = BitWriter::new();
    w.bits(2, 0); // HSKIP = 0
    cl_length(&mut w, 0); // symbol 1
    cl_length(&mut w, 1); // symbol 2
    for _ in 2..18 {
        cl_length(&mut w, 0);
    }
    w.finish()
}

/// Complex code over 8 symbols, all length 3, written as
/// "3", repeat-previous x6, "3".
fn eight_equal_lengths() -> Vec<u8> {
    let mut w = BitWriter::new();
    w.bits(2, 0);
    // Order: 1, 2, 3, 4, 0, 5, 17, 6, 16. Symbols 3 and 16 get length 1.
    for value in [0, 0, 1, 0, 0, 0, 0, 0, 1] {
        cl_length(&mut w, value);
    }
    // Code-length code: 3 -> "0", 16 -> "1".
    w.code("0");
    w.code("1").bits(2, 3); // repeat 3 + 3 = 6 times
    w.code("0");
    w.finish()
}

#[test]
fn complex_code_single_length_symbol() {
    let table = read_code(4, &four_equal_lengths()).unwrap();
    assert_eq!(decode_codes(&table, &["00", "01", "10", "11"]), vec![0, 1, 2, 3]);
}

#[test]
fn complex_code_with_repeat_previous() {
    let table = read_code(8, &eight_equal_lengths()).unwrap();
    assert_eq!(decode_codes(&table, &["101", "000", "111"]), vec![5, 0, 7]);
}

#[test]
fn complex_code_split_byte_by_byte() {
    let bytes = eight_equal_lengths();
    let mut reader = PrefixCodeReader::new();
    let mut br = BitReader::new();
    let mem = CustomMem::default();
    let mut result = None;
    for (i, b) in bytes.iter().enumerate() {
        let chunk = [*b];
        let mut input: &[u8] = &chunk;
        match reader.read(8, &mem, &mut br, &mut input) {
            Ok(table) => {
                result = Some(table);
                break;
            }
            Err(Interrupt::NeedsMoreInput) => assert!(input.is_empty(), "byte {i} not consumed"),
            Err(e) => panic!("unexpected {e:?} at byte {i}"),
        }
    }
    let table = result.expect("description completes");
    assert_eq!(decode_codes(&table, &["011", "110"]), vec![3, 6]);
}

#[test]
fn complex_code_incomplete_rejected() {
    // Three symbols of length 2 leave a quarter of the code space unused.
    assert_eq!(
        read_code(3, &four_equal_lengths()).err(),
        Some(Interrupt::Error(BrotliError::InvalidHuffmanCode))
    );
}

#[test]
fn reader_is_reusable_after_success() {
    let mut reader = PrefixCodeReader::new();
    let mem = CustomMem::default();
    let mut w = BitWriter::new();
    write_simple_code(&mut w, 8, &[1]);
    write_simple_code(&mut w, 8, &[2, 3]);
    let bytes = w.finish();
    let mut br = BitReader::new();
    let mut input: &[u8] = &bytes;
    let first = reader.read(256, &mem, &mut br, &mut input).unwrap();
    let second = reader.read(256, &mem, &mut br, &mut input).unwrap();
    assert_eq!(first.lookup(0, 0), Some((1, 0)));
    assert_eq!(second.lookup(0b1, 1), Some((3, 1)));
}

#[test]
fn alphabet_bits_is_width_of_largest_symbol() {
    assert_eq!(alphabet_bits(2), 1);
    assert_eq!(alphabet_bits(26), 5);
    assert_eq!(alphabet_bits(256), 8);
    assert_eq!(alphabet_bits(257), 9);
    assert_eq!(alphabet_bits(704), 10);
}
