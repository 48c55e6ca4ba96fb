// Unit tests for src/huffman/table.rs: canonical prefix code tables
//
// Tests verify:
//   - build() accepts exactly complete codes and rejects over/under-subscribed ones
//   - canonical code assignment (shorter codes first, ties by symbol order)
//   - single-symbol tables decode with zero bits
//   - lookup() reports None when the buffered bits cannot finish a code
//   - read_symbol() pauses without consuming and resumes identically
//   - 15-bit codes resolve through second-level tables

use brotli::bit_reader::BitReader;
use brotli::decode::types::Interrupt;
use brotli::huffman::{HuffmanTable, HuffmanTreeGroup};
use brotli::{BrotliError, CustomMem};

use crate::common::BitWriter;

fn build(lengths: &[u8]) -> Result<HuffmanTable, BrotliError> {
    HuffmanTable::build(&CustomMem::default(), lengths)
}

/// Decodes every symbol of `bits` with `table`.
fn decode_all(table: &HuffmanTable, bits: &[u8], count: usize) -> Vec<u16> {
    let mut br = BitReader::new();
    let mut input = bits;
    (0..count)
        .map(|_| table.read_symbol(&mut br, &mut input).unwrap())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn complete_code_accepted() {
    assert!(build(&[1, 2, 3, 3]).is_ok());
    assert!(build(&[2, 2, 2, 2]).is_ok());
}

#[test]
fn over_subscribed_code_rejected() {
    assert_eq!(build(&[1, 1, 1]).err(), Some(BrotliError::InvalidHuffmanCode));
}

#[test]
fn incomplete_code_rejected() {
    assert_eq!(build(&[1, 2]).err(), Some(BrotliError::InvalidHuffmanCode));
    assert_eq!(build(&[2, 2, 2, 0]).err(), Some(BrotliError::InvalidHuffmanCode));
}

#[test]
fn empty_code_rejected() {
    assert_eq!(build(&[0, 0, 0]).err(), Some(BrotliError::InvalidHuffmanCode));
}

#[test]
fn length_above_fifteen_rejected() {
    let mut lengths = [0u8; 4];
    lengths[0] = 16;
    lengths[1] = 1;
    assert_eq!(build(&lengths).err(), Some(BrotliError::InvalidHuffmanCode));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_symbol_consumes_no_bits() {
    let table = build(&[0, 0, 3, 0]).unwrap();
    assert_eq!(table.lookup(0, 0), Some((2, 0)));
    let mut br = BitReader::new();
    let mut input: &[u8] = &[];
    assert_eq!(table.read_symbol(&mut br, &mut input), Ok(2));
}

#[test]
fn canonical_codes_in_symbol_order() {
    // Lengths 1,2,3,3: codes 0, 10, 110, 111.
    let table = build(&[1, 2, 3, 3]).unwrap();
    let mut w = BitWriter::new();
    w.code("111").code("0").code("110").code("10").code("0");
    let bits = w.finish();
    assert_eq!(decode_all(&table, &bits, 5), vec![3, 0, 2, 1, 0]);
}

#[test]
fn absent_symbols_are_skipped() {
    // Only symbols 5 and 9 are present.
    let mut lengths = [0u8; 12];
    lengths[5] = 1;
    lengths[9] = 1;
    let table = build(&lengths).unwrap();
    let mut w = BitWriter::new();
    w.code("1").code("0").code("1");
    let bits = w.finish();
    assert_eq!(decode_all(&table, &bits, 3), vec![9, 5, 9]);
}

#[test]
fn lookup_needs_the_whole_code() {
    let table = build(&[1, 2, 3, 3]).unwrap();
    // "11" is a prefix of two 3-bit codes.
    assert_eq!(table.lookup(0b11, 2), None);
    assert_eq!(table.lookup(0b011, 3), Some((2, 3)));
}

#[test]
fn read_symbol_pauses_and_resumes() {
    // Lengths all 8 over 256 symbols: each symbol is one byte, bit-reversed.
    let table = build(&[8u8; 256]).unwrap();
    let mut br = BitReader::new();
    let mut empty: &[u8] = &[];
    assert_eq!(table.read_symbol(&mut br, &mut empty), Err(Interrupt::NeedsMoreInput));
    let mut input: &[u8] = &[0b0000_0001];
    // First code bit is the LSB: code 10000000 is symbol 128.
    assert_eq!(table.read_symbol(&mut br, &mut input), Ok(128));
}

#[test]
fn fifteen_bit_codes_decode() {
    // Lengths 1..=14 then two codes of 15 bits: a complete, maximally deep code.
    let mut lengths: Vec<u8> = (1..=14).collect();
    lengths.push(15);
    lengths.push(15);
    let table = build(&lengths).unwrap();
    assert!(table.size() > 256);

    let mut w = BitWriter::new();
    w.code(&"1".repeat(15)); // symbol 15
    w.code(&format!("{}0", "1".repeat(14))); // symbol 14
    w.code(&format!("{}0", "1".repeat(9))); // symbol 9
    w.code("0"); // symbol 0
    let bits = w.finish();
    assert_eq!(decode_all(&table, &bits, 4), vec![15, 14, 9, 0]);
}

#[test]
fn equal_length_codes_are_fixed_width() {
    let table = build(&[2, 2, 2, 2]).unwrap();
    let mut w = BitWriter::new();
    w.code("00").code("11").code("01");
    let bits = w.finish();
    assert_eq!(decode_all(&table, &bits, 3), vec![0, 3, 1]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree groups
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tree_group_indexes_trees() {
    let mut group = HuffmanTreeGroup::new(4, 2);
    assert!(group.is_empty());
    group.trees.push(build(&[1, 1, 0, 0]).unwrap());
    group.trees.push(HuffmanTable::single(&CustomMem::default(), 3).unwrap());
    assert_eq!(group.len(), 2);
    assert_eq!(group.tree(1).lookup(0, 0), Some((3, 0)));
}
