//! Two-level canonical Huffman lookup tables.
//!
//! Layout: a 256-entry root table indexed by the next 8 input bits, followed
//! by one second-level table per root slot whose codes are longer than 8
//! bits. A root entry either resolves a symbol directly or links to its
//! second-level table. Codes are stored bit-reversed because the stream is
//! read LSB first.

use crate::bit_reader::{BitReader, BitWindow};
use crate::config::{HUFFMAN_ROOT_BITS, MAX_CODE_LENGTH};
use crate::decode::types::{BrotliError, Interrupt, Step};
use crate::huffman::MAX_ALPHABET_SIZE;
use crate::memory::{CustomMem, MemBlock};

const ROOT_SIZE: usize = 1 << HUFFMAN_ROOT_BITS;
const ROOT_MASK: u64 = ROOT_SIZE as u64 - 1;
const LINK_FLAG: u8 = 0x80;

/// One table slot.
///
/// Leaf: `bits` is the full code length, `value` the symbol.
/// Link: `bits` is `LINK_FLAG | second-level index bits`, `value` the
/// absolute index of the second-level table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanEntry {
    pub bits: u8,
    pub value: u16,
}

/// A decoding table for one prefix code.
#[derive(Debug)]
pub struct HuffmanTable {
    entries: MemBlock<HuffmanEntry>,
}

impl HuffmanTable {
    /// A table that decodes `symbol` while consuming no bits.
    pub fn single(mem: &CustomMem, symbol: u16) -> Result<Self, BrotliError> {
        let mut entries = MemBlock::new(mem, ROOT_SIZE)?;
        entries.fill(HuffmanEntry { bits: 0, value: symbol });
        Ok(HuffmanTable { entries })
    }

    /// Builds a table from per-symbol code lengths (0 = symbol absent).
    ///
    /// The code must be complete: the Kraft sum of the lengths must be
    /// exactly one. A lone symbol is accepted and decodes with zero bits.
    pub fn build(mem: &CustomMem, lengths: &[u8]) -> Result<Self, BrotliError> {
        let max_len = MAX_CODE_LENGTH as usize;
        if lengths.len() > MAX_ALPHABET_SIZE {
            return Err(BrotliError::InvalidHuffmanCode);
        }
        let mut count = [0u32; 16];
        let mut lone_symbol = None;
        for (symbol, &len) in lengths.iter().enumerate() {
            if len as usize > max_len {
                return Err(BrotliError::InvalidHuffmanCode);
            }
            if len > 0 {
                count[len as usize] += 1;
                lone_symbol = Some(symbol as u16);
            }
        }
        let num_symbols: u32 = count.iter().sum();
        match (num_symbols, lone_symbol) {
            (0, _) | (_, None) => return Err(BrotliError::InvalidHuffmanCode),
            (1, Some(symbol)) => return Self::single(mem, symbol),
            _ => {}
        }

        let mut space: u32 = 0;
        for len in 1..=max_len {
            space += count[len] << (max_len - len);
        }
        if space != 1 << max_len {
            return Err(BrotliError::InvalidHuffmanCode);
        }

        let mut next_code = [0u32; 16];
        let mut code = 0u32;
        for len in 1..=max_len {
            code = (code + count[len - 1]) << 1;
            next_code[len] = code;
        }

        // First pass: assign codes and size the second-level tables.
        let mut codes = [0u16; MAX_ALPHABET_SIZE];
        let mut sub_len = [0u8; ROOT_SIZE];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let rev = reverse_bits(next_code[len as usize], len as u32);
            next_code[len as usize] += 1;
            codes[symbol] = rev;
            if u32::from(len) > HUFFMAN_ROOT_BITS {
                let slot = usize::from(rev) & (ROOT_SIZE - 1);
                sub_len[slot] = sub_len[slot].max(len - HUFFMAN_ROOT_BITS as u8);
            }
        }

        let mut sub_start = [0u16; ROOT_SIZE];
        let mut total = ROOT_SIZE;
        for slot in 0..ROOT_SIZE {
            if sub_len[slot] > 0 {
                sub_start[slot] = total as u16;
                total += 1 << sub_len[slot];
            }
        }

        let mut entries: MemBlock<HuffmanEntry> = MemBlock::new(mem, total)?;
        for slot in 0..ROOT_SIZE {
            if sub_len[slot] > 0 {
                entries[slot] = HuffmanEntry {
                    bits: LINK_FLAG | sub_len[slot],
                    value: sub_start[slot],
                };
            }
        }

        // Second pass: replicate each code over every slot it prefixes.
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let rev = usize::from(codes[symbol]);
            let leaf = HuffmanEntry { bits: len, value: symbol as u16 };
            if u32::from(len) <= HUFFMAN_ROOT_BITS {
                let mut slot = rev;
                while slot < ROOT_SIZE {
                    entries[slot] = leaf;
                    slot += 1 << len;
                }
            } else {
                let root_slot = rev & (ROOT_SIZE - 1);
                let start = usize::from(sub_start[root_slot]);
                let size = 1usize << sub_len[root_slot];
                let step = 1usize << (len as u32 - HUFFMAN_ROOT_BITS);
                let mut idx = rev >> HUFFMAN_ROOT_BITS;
                while idx < size {
                    entries[start + idx] = leaf;
                    idx += step;
                }
            }
        }

        Ok(HuffmanTable { entries })
    }

    /// Resolves one symbol from up to 64 LSB-first bits.
    ///
    /// Returns `(symbol, code length)`, or `None` when `avail` bits are not
    /// enough to finish the code.
    #[inline]
    pub fn lookup(&self, bits: u64, avail: u32) -> Option<(u16, u32)> {
        let mut entry = self.entries[(bits & ROOT_MASK) as usize];
        if entry.bits & LINK_FLAG != 0 {
            let sub_bits = u32::from(entry.bits & !LINK_FLAG);
            let idx = ((bits >> HUFFMAN_ROOT_BITS) & ((1u64 << sub_bits) - 1)) as usize;
            entry = self.entries[usize::from(entry.value) + idx];
        }
        let len = u32::from(entry.bits);
        if len > avail {
            return None;
        }
        Some((entry.value, len))
    }

    /// Decodes one symbol from a snapshot, advancing it on success.
    #[inline]
    pub fn decode_window(&self, w: &mut BitWindow) -> Option<u16> {
        let (bits, avail) = w.peek();
        let (symbol, len) = self.lookup(bits, avail)?;
        w.advance(len);
        Some(symbol)
    }

    /// Decodes one symbol straight from the reader.
    #[inline]
    pub fn read_symbol(&self, br: &mut BitReader, input: &mut &[u8]) -> Step<u16> {
        let mut w = br.window(input);
        match self.decode_window(&mut w) {
            Some(symbol) => {
                br.skip_bits(w.used());
                Ok(symbol)
            }
            None => Err(Interrupt::NeedsMoreInput),
        }
    }

    /// Number of table slots, root included.
    pub fn size(&self) -> usize {
        self.entries.len()
    }
}

/// Reverses the low `len` bits of `code`.
#[inline]
fn reverse_bits(code: u32, len: u32) -> u16 {
    (code.reverse_bits() >> (32 - len)) as u16
}
