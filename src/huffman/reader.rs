//! Resumable reader for prefix code descriptions (RFC 7932 section 3.4/3.5).
//!
//! A description is either *simple* (one to four explicitly listed symbols
//! with fixed length shapes) or *complex* (a code-length code followed by
//! run-length coded symbol lengths). The reader stores every partial result
//! so a description split across input chunks decodes identically.

use crate::bit_reader::BitReader;
use crate::decode::types::{BrotliError, Interrupt, Step};
use crate::huffman::table::HuffmanTable;
use crate::huffman::MAX_ALPHABET_SIZE;
use crate::memory::CustomMem;

const CODE_LENGTH_CODES: usize = 18;
const REPEAT_PREVIOUS: u16 = 16;
const REPEAT_ZERO: u16 = 17;
const INITIAL_PREV_CODE_LEN: u8 = 8;
const SYMBOL_SPACE: i32 = 1 << 15;

/// Transmission order of the code-length-code lengths.
const CODE_LENGTH_ORDER: [usize; CODE_LENGTH_CODES] =
    [1, 2, 3, 4, 0, 5, 17, 6, 16, 7, 8, 9, 10, 11, 12, 13, 14, 15];

// Fixed variable-length code for the code-length-code lengths, indexed by
// the next four (LSB-first) bits.
const CL_PREFIX_LENGTH: [u8; 16] = [2, 2, 2, 3, 2, 2, 2, 4, 2, 2, 2, 3, 2, 2, 2, 4];
const CL_PREFIX_VALUE: [u8; 16] = [0, 4, 3, 2, 0, 4, 3, 1, 0, 4, 3, 2, 0, 4, 3, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Hskip,
    SimpleCount,
    SimpleSymbols,
    SimpleTreeSelect,
    CodeLengthLengths,
    SymbolLengths,
}

/// Reads one prefix code description and builds its table.
pub struct PrefixCodeReader {
    stage: Stage,
    alphabet_size: usize,

    num_symbols: usize,
    symbols: [u16; 4],

    cl_index: usize,
    cl_space: i32,
    cl_num_codes: u32,
    cl_lengths: [u8; CODE_LENGTH_CODES],
    cl_table: Option<HuffmanTable>,

    symbol: usize,
    space: i32,
    prev_code_len: u8,
    repeat: usize,
    repeat_code_len: u8,
    lengths: [u8; MAX_ALPHABET_SIZE],
}

impl Default for PrefixCodeReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixCodeReader {
    pub fn new() -> Self {
        PrefixCodeReader {
            stage: Stage::Hskip,
            alphabet_size: 0,
            num_symbols: 0,
            symbols: [0; 4],
            cl_index: 0,
            cl_space: 32,
            cl_num_codes: 0,
            cl_lengths: [0; CODE_LENGTH_CODES],
            cl_table: None,
            symbol: 0,
            space: SYMBOL_SPACE,
            prev_code_len: INITIAL_PREV_CODE_LEN,
            repeat: 0,
            repeat_code_len: 0,
            lengths: [0; MAX_ALPHABET_SIZE],
        }
    }

    /// Discards any partial progress.
    pub fn reset(&mut self) {
        self.stage = Stage::Hskip;
        self.cl_table = None;
    }

    /// Reads a description for an alphabet of `alphabet_size` symbols.
    ///
    /// On a pause the reader keeps its position; call again with the same
    /// `alphabet_size` once more input is available. On success or error the
    /// reader is ready for the next description.
    pub fn read(
        &mut self,
        alphabet_size: usize,
        mem: &CustomMem,
        br: &mut BitReader,
        input: &mut &[u8],
    ) -> Step<HuffmanTable> {
        let result = self.step(alphabet_size, mem, br, input);
        if !matches!(result, Err(Interrupt::NeedsMoreInput)) {
            self.reset();
        }
        result
    }

    fn step(
        &mut self,
        alphabet_size: usize,
        mem: &CustomMem,
        br: &mut BitReader,
        input: &mut &[u8],
    ) -> Step<HuffmanTable> {
        loop {
            match self.stage {
                Stage::Hskip => {
                    if alphabet_size < 2 || alphabet_size > MAX_ALPHABET_SIZE {
                        return Err(BrotliError::InvalidHuffmanCode.into());
                    }
                    let hskip = br.read_bits(2, input)?;
                    self.alphabet_size = alphabet_size;
                    if hskip == 1 {
                        self.stage = Stage::SimpleCount;
                    } else {
                        self.cl_index = hskip as usize;
                        self.cl_space = 32;
                        self.cl_num_codes = 0;
                        self.cl_lengths = [0; CODE_LENGTH_CODES];
                        self.stage = Stage::CodeLengthLengths;
                    }
                }

                // ── Simple codes ─────────────────────────────────────────────
                Stage::SimpleCount => {
                    self.num_symbols = br.read_bits(2, input)? as usize + 1;
                    self.symbol = 0;
                    self.stage = Stage::SimpleSymbols;
                }
                Stage::SimpleSymbols => {
                    let bits = alphabet_bits(self.alphabet_size);
                    while self.symbol < self.num_symbols {
                        let v = br.read_bits(bits, input)? as u16;
                        if usize::from(v) >= self.alphabet_size {
                            return Err(BrotliError::InvalidHuffmanCode.into());
                        }
                        self.symbols[self.symbol] = v;
                        self.symbol += 1;
                    }
                    let listed = &self.symbols[..self.num_symbols];
                    for (i, s) in listed.iter().enumerate() {
                        if listed[i + 1..].contains(s) {
                            return Err(BrotliError::InvalidHuffmanCode.into());
                        }
                    }
                    if self.num_symbols == 4 {
                        self.stage = Stage::SimpleTreeSelect;
                        continue;
                    }
                    return self.build_simple(mem, false);
                }
                Stage::SimpleTreeSelect => {
                    let tree_select = br.read_bits(1, input)? == 1;
                    return self.build_simple(mem, tree_select);
                }

                // ── Complex codes ────────────────────────────────────────────
                Stage::CodeLengthLengths => {
                    while self.cl_index < CODE_LENGTH_CODES {
                        let w = br.window(input);
                        let (bits, avail) = w.peek();
                        let idx = (bits & 0xf) as usize;
                        let len = u32::from(CL_PREFIX_LENGTH[idx]);
                        if len > avail {
                            return Err(Interrupt::NeedsMoreInput);
                        }
                        br.skip_bits(len);
                        let v = CL_PREFIX_VALUE[idx];
                        self.cl_lengths[CODE_LENGTH_ORDER[self.cl_index]] = v;
                        self.cl_index += 1;
                        if v != 0 {
                            self.cl_space -= 32 >> v;
                            self.cl_num_codes += 1;
                            if self.cl_space <= 0 {
                                break;
                            }
                        }
                    }
                    if !(self.cl_num_codes == 1 || self.cl_space == 0) {
                        return Err(BrotliError::InvalidHuffmanCode.into());
                    }
                    self.cl_table = Some(HuffmanTable::build(mem, &self.cl_lengths)?);
                    self.symbol = 0;
                    self.space = SYMBOL_SPACE;
                    self.prev_code_len = INITIAL_PREV_CODE_LEN;
                    self.repeat = 0;
                    self.repeat_code_len = 0;
                    self.lengths[..self.alphabet_size].fill(0);
                    self.stage = Stage::SymbolLengths;
                }
                Stage::SymbolLengths => {
                    self.read_symbol_lengths(br, input)?;
                    if self.space != 0 {
                        return Err(BrotliError::InvalidHuffmanCode.into());
                    }
                    return Ok(HuffmanTable::build(mem, &self.lengths[..self.alphabet_size])?);
                }
            }
        }
    }

    fn build_simple(&mut self, mem: &CustomMem, tree_select: bool) -> Step<HuffmanTable> {
        let shape: &[u8] = match (self.num_symbols, tree_select) {
            (1, _) => return Ok(HuffmanTable::single(mem, self.symbols[0])?),
            (2, _) => &[1, 1],
            (3, _) => &[1, 2, 2],
            (_, false) => &[2, 2, 2, 2],
            (_, true) => &[1, 2, 3, 3],
        };
        let lengths = &mut self.lengths[..self.alphabet_size];
        lengths.fill(0);
        for (&symbol, &len) in self.symbols.iter().zip(shape) {
            lengths[usize::from(symbol)] = len;
        }
        Ok(HuffmanTable::build(mem, lengths)?)
    }

    fn read_symbol_lengths(&mut self, br: &mut BitReader, input: &mut &[u8]) -> Step<()> {
        let Some(cl_table) = self.cl_table.as_ref() else {
            return Err(BrotliError::InvalidHuffmanCode.into());
        };
        while self.symbol < self.alphabet_size && self.space > 0 {
            let mut w = br.window(input);
            let Some(code) = cl_table.decode_window(&mut w) else {
                return Err(Interrupt::NeedsMoreInput);
            };
            if code < REPEAT_PREVIOUS {
                br.skip_bits(w.used());
                let len = code as u8;
                self.lengths[self.symbol] = len;
                self.symbol += 1;
                self.repeat = 0;
                if len != 0 {
                    self.prev_code_len = len;
                    self.space -= SYMBOL_SPACE >> len;
                }
                continue;
            }

            let extra_bits = if code == REPEAT_PREVIOUS { 2 } else { 3 };
            let Some(extra) = w.take(extra_bits) else {
                return Err(Interrupt::NeedsMoreInput);
            };
            br.skip_bits(w.used());

            let new_len = if code == REPEAT_ZERO { 0 } else { self.prev_code_len };
            if self.repeat_code_len != new_len {
                self.repeat = 0;
                self.repeat_code_len = new_len;
            }
            let old_repeat = self.repeat;
            if self.repeat > 0 {
                self.repeat = (self.repeat - 2) << extra_bits;
            }
            self.repeat += extra as usize + 3;
            let delta = self.repeat - old_repeat;
            if self.symbol + delta > self.alphabet_size {
                return Err(BrotliError::InvalidHuffmanCode.into());
            }
            self.lengths[self.symbol..self.symbol + delta].fill(self.repeat_code_len);
            self.symbol += delta;
            if self.repeat_code_len != 0 {
                self.space -= (delta as i32) << (15 - u32::from(self.repeat_code_len));
            }
        }
        Ok(())
    }
}

/// Bits used to transmit one symbol of a simple code.
pub fn alphabet_bits(alphabet_size: usize) -> u32 {
    usize::BITS - (alphabet_size - 1).leading_zeros()
}
