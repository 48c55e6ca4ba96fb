// Shared helpers for the integration and end-to-end suites:
//   - `BitWriter`: LSB-first bit packer for hand-assembled streams
//   - stream builders for stored (uncompressed) and small compressed streams
//   - `encode`: conforming streams from the reference encoder
//   - `decode_chunked`: drive a session with bounded input/output slices

#![allow(dead_code)]

use std::io::Write;

use brotli::{BrotliResult, BrotliState};

// ─────────────────────────────────────────────────────────────────────────────
// Bit-level writer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    nbits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the low `n` bits of `value`, least significant first.
    pub fn bits(&mut self, n: u32, value: u64) -> &mut Self {
        assert!(n <= 56);
        self.acc |= (value & ((1u64 << n) - 1)) << self.nbits;
        self.nbits += n;
        while self.nbits >= 8 {
            self.bytes.push(self.acc as u8);
            self.acc >>= 8;
            self.nbits -= 8;
        }
        self
    }

    /// Appends a prefix code, first code bit first.
    pub fn code(&mut self, code: &str) -> &mut Self {
        for c in code.chars() {
            self.bits(1, u64::from(c == '1'));
        }
        self
    }

    /// Zero-pads to the next byte boundary.
    pub fn align(&mut self) -> &mut Self {
        if self.nbits > 0 {
            let pad = 8 - self.nbits;
            self.bits(pad, 0);
        }
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        assert_eq!(self.nbits, 0, "raw bytes must start on a byte boundary");
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.align();
        std::mem::take(&mut self.bytes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Header pieces
// ─────────────────────────────────────────────────────────────────────────────

/// Writes MNIBBLES and MLEN-1 for a meta-block of `len` bytes.
pub fn write_mlen(w: &mut BitWriter, len: usize) {
    assert!(len >= 1 && len <= 1 << 24);
    let v = (len - 1) as u64;
    let nibbles = if v < 1 << 16 {
        4
    } else if v < 1 << 20 {
        5
    } else {
        6
    };
    w.bits(2, nibbles - 4);
    w.bits(4 * nibbles as u32, v);
}

/// A stream of stored meta-blocks (at most 64 KiB each) carrying `data`,
/// closed by an empty last meta-block. Window is 16 bits.
pub fn stored_stream(data: &[u8]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.bits(1, 0); // WBITS = 16
    for chunk in data.chunks(1 << 16) {
        w.bits(1, 0); // ISLAST
        write_mlen(&mut w, chunk.len());
        w.bits(1, 1); // ISUNCOMPRESSED
        w.align();
        w.bytes(chunk);
    }
    w.bits(1, 1).bits(1, 1); // ISLAST, ISLASTEMPTY
    w.finish()
}

/// The smallest valid stream: WBITS=16, ISLAST, ISLASTEMPTY.
pub const EMPTY_STREAM: [u8; 1] = [0x06];

/// `"abcabc"` as one stored meta-block plus the empty last meta-block.
pub const ABCABC_STORED: [u8; 10] = [0x50, 0x00, 0x10, b'a', b'b', b'c', b'a', b'b', b'c', 0x03];

/// Writes the prologue of a compressed meta-block with one block type per
/// category, NPOSTFIX=0, NDIRECT=0, LSB6 literal context and single-tree
/// context maps.
pub fn write_trivial_prologue(w: &mut BitWriter) {
    w.bits(1, 0).bits(1, 0).bits(1, 0); // NBLTYPESL/I/D = 1
    w.bits(2, 0).bits(4, 0); // NPOSTFIX, NDIRECT
    w.bits(2, 0); // context mode LSB6
    w.bits(1, 0); // NTREESL = 1
    w.bits(1, 0); // NTREESD = 1
}

/// Writes a simple prefix code listing `symbols` (1 to 3 of them).
pub fn write_simple_code(w: &mut BitWriter, alphabet_bits: u32, symbols: &[u16]) {
    assert!((1..=3).contains(&symbols.len()));
    w.bits(2, 1); // HSKIP = 1: simple code
    w.bits(2, symbols.len() as u64 - 1);
    for &s in symbols {
        w.bits(alphabet_bits, u64::from(s));
    }
}

/// A compressed last meta-block: literals "abc", then copy(distance 3,
/// length 3), producing "abcabc".
///
/// Literal code: a=0, b=10, c=11. Command code: the single symbol 153
/// (insert code 3, copy code 1). Distance code: the single symbol 17, whose
/// one extra bit selects distance 3 or 4.
pub fn abc_copy_stream() -> Vec<u8> {
    abc_copy_stream_with(0)
}

/// As [`abc_copy_stream`], with the distance extra bit set to `extra`.
pub fn abc_copy_stream_with(extra: u64) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.bits(1, 0); // WBITS = 16
    w.bits(1, 1).bits(1, 0); // ISLAST, not empty
    write_mlen(&mut w, 6);
    write_trivial_prologue(&mut w);
    write_simple_code(&mut w, 8, &[u16::from(b'a'), u16::from(b'b'), u16::from(b'c')]);
    write_simple_code(&mut w, 10, &[153]);
    write_simple_code(&mut w, 6, &[17]);
    // Command 153 takes no bits and no extra bits.
    w.code("0").code("10").code("11");
    // Distance symbol takes no bits; one extra bit.
    w.bits(1, extra);
    w.finish()
}

/// Splits a copy length into (copy code, extra bit count, extra value).
pub fn copy_length_code(len: usize) -> (u16, u32, u64) {
    const PREFIX: [(u32, usize); 14] = [
        (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 9),
        (1, 10), (1, 12), (2, 14), (2, 18), (3, 22), (3, 30),
    ];
    for (code, &(bits, base)) in PREFIX.iter().enumerate() {
        if len >= base && len < base + (1 << bits) {
            return (code as u16, bits, (len - base) as u64);
        }
    }
    panic!("copy length {len} not covered");
}

/// Splits a distance into (distance code, extra bit count, extra value)
/// for NPOSTFIX = 0, NDIRECT = 0.
pub fn distance_code(distance: usize) -> (u16, u32, u64) {
    let x = distance as u64 + 3;
    let n = 63 - x.leading_zeros() - 1;
    let b = (x >> n) & 1;
    let code = 16 + 2 * (u64::from(n) - 1) + b;
    (code as u16, n, x - ((2 + b) << n))
}

/// A compressed last meta-block of `mlen` bytes made of one command with no
/// literals and a `copy_len`-byte copy at distance `word_id + 1`. At the
/// start of a stream nothing is in the window, so the copy addresses the
/// static dictionary entry `word_id` for that length.
pub fn dictionary_stream(copy_len: usize, word_id: usize, mlen: usize) -> Vec<u8> {
    let (copy_code, copy_bits, copy_extra) = copy_length_code(copy_len);
    let command = if copy_code < 8 { 128 + copy_code } else { 192 + copy_code - 8 };
    let (dist_code, dist_bits, dist_extra) = distance_code(word_id + 1);

    let mut w = BitWriter::new();
    w.bits(1, 0); // WBITS = 16
    w.bits(1, 1).bits(1, 0);
    write_mlen(&mut w, mlen);
    write_trivial_prologue(&mut w);
    // A literal code is required even though no literal is used.
    write_simple_code(&mut w, 8, &[0]);
    write_simple_code(&mut w, 10, &[command]);
    write_simple_code(&mut w, 6, &[dist_code]);
    w.bits(copy_bits, copy_extra);
    w.bits(dist_bits, dist_extra);
    w.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference encoder and chunked driving
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses `data` with the reference encoder.
pub fn encode(data: &[u8], quality: u32, lgwin: u32) -> Vec<u8> {
    let mut enc = brotli_enc::CompressorWriter::new(Vec::new(), 4096, quality, lgwin);
    enc.write_all(data).unwrap();
    enc.into_inner()
}

/// Deterministic mixed-content test data: text runs with periodic noise.
pub fn sample_data(len: usize) -> Vec<u8> {
    let words: [&[u8]; 8] = [
        b"the ", b"quick ", b"brown ", b"fox ", b"jumps ", b"over ", b"lazy ", b"dogs. ",
    ];
    let mut out = Vec::with_capacity(len);
    let mut seed = 0x2545_f491u32;
    while out.len() < len {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        if seed % 11 == 0 {
            out.push((seed >> 8) as u8);
        } else {
            out.extend_from_slice(words[(seed % 8) as usize]);
        }
    }
    out.truncate(len);
    out
}

/// Outcome of [`decode_chunked`]: the produced bytes, the final result and
/// how many calls it took.
pub struct Chunked {
    pub output: Vec<u8>,
    pub result: BrotliResult,
    pub calls: usize,
    pub total_out: usize,
}

/// Feeds `input` `in_chunk` bytes at a time and drains through an
/// `out_chunk`-byte buffer, until the session stops asking for more.
pub fn decode_chunked(input: &[u8], in_chunk: usize, out_chunk: usize) -> Chunked {
    let mut state = BrotliState::new();
    decode_chunked_with(&mut state, input, in_chunk, out_chunk)
}

pub fn decode_chunked_with(
    state: &mut BrotliState<'_>,
    input: &[u8],
    in_chunk: usize,
    out_chunk: usize,
) -> Chunked {
    let mut output = Vec::new();
    let mut buf = vec![0u8; out_chunk];
    let mut pos = 0usize;
    let mut total_out = 0usize;
    let mut calls = 0usize;
    let mut fed = 0usize;
    loop {
        let end = (fed + in_chunk).min(input.len());
        let mut next_in = &input[pos..end];
        let before = next_in.len();
        let mut next_out: &mut [u8] = &mut buf;
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
        calls += 1;
        let written = out_chunk - next_out.len();
        pos += before - next_in.len();
        output.extend_from_slice(&buf[..written]);
        match result {
            BrotliResult::NeedsMoreInput => {
                if end == input.len() {
                    return Chunked { output, result, calls, total_out };
                }
                fed = end;
            }
            BrotliResult::NeedsMoreOutput => {}
            BrotliResult::Success | BrotliResult::Error => {
                return Chunked { output, result, calls, total_out };
            }
        }
    }
}
