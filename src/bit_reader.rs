//! Resumable LSB-first bit reader.
//!
//! The reader keeps up to 64 bits buffered between calls and pulls whole
//! bytes from a caller-supplied input cursor (`&mut &[u8]`) only when a read
//! needs them. A read that cannot be satisfied returns
//! `Interrupt::NeedsMoreInput` without consuming anything: the bytes it did
//! pull stay buffered, so an identical retry after more input succeeds.
//!
//! Compound fields (a symbol followed by its extra bits) are decoded from a
//! [`BitWindow`] snapshot and committed with [`BitReader::skip_bits`] only once
//! every part is present.

use crate::decode::types::{BrotliError, Interrupt, Step};

/// Buffered bit source over a sequence of input slices.
#[derive(Debug, Clone, Default)]
pub struct BitReader {
    val: u64,
    bit_count: u32,
}

impl BitReader {
    pub fn new() -> Self {
        BitReader { val: 0, bit_count: 0 }
    }

    /// Number of bits currently buffered.
    #[inline]
    pub fn bits_available(&self) -> u32 {
        self.bit_count
    }

    /// Pulls bytes from `input` until at least `n` bits are buffered.
    /// Returns `false` when `input` runs dry first.
    #[inline]
    pub fn fill(&mut self, n: u32, input: &mut &[u8]) -> bool {
        debug_assert!(n <= 57);
        while self.bit_count < n {
            let Some((&byte, rest)) = input.split_first() else {
                return false;
            };
            self.val |= u64::from(byte) << self.bit_count;
            self.bit_count += 8;
            *input = rest;
        }
        true
    }

    /// Pulls as many bytes as fit and returns a snapshot of the buffer.
    #[inline]
    pub fn window(&mut self, input: &mut &[u8]) -> BitWindow {
        while self.bit_count <= 56 {
            let Some((&byte, rest)) = input.split_first() else {
                break;
            };
            self.val |= u64::from(byte) << self.bit_count;
            self.bit_count += 8;
            *input = rest;
        }
        BitWindow { val: self.val, avail: self.bit_count, used: 0 }
    }

    /// Reads `n <= 32` bits.
    #[inline]
    pub fn read_bits(&mut self, n: u32, input: &mut &[u8]) -> Step<u32> {
        debug_assert!(n <= 32);
        if !self.fill(n, input) {
            return Err(Interrupt::NeedsMoreInput);
        }
        Ok(self.take(n) as u32)
    }

    /// Reads `n <= 56` bits.
    #[inline]
    pub fn read_bits_u64(&mut self, n: u32, input: &mut &[u8]) -> Step<u64> {
        debug_assert!(n <= 56);
        if !self.fill(n, input) {
            return Err(Interrupt::NeedsMoreInput);
        }
        Ok(self.take(n))
    }

    /// Discards `n` buffered bits.
    #[inline]
    pub fn skip_bits(&mut self, n: u32) {
        debug_assert!(n <= self.bit_count);
        self.take(n);
    }

    #[inline]
    fn take(&mut self, n: u32) -> u64 {
        let v = self.val & low_mask(n);
        self.val = self.val.checked_shr(n).unwrap_or(0);
        self.bit_count -= n;
        v
    }

    /// Skips to the next byte boundary. The skipped bits must be zero.
    pub fn align_to_byte(&mut self) -> Result<(), BrotliError> {
        let pad = self.bit_count & 7;
        if self.take(pad) != 0 {
            return Err(BrotliError::NonZeroPadding);
        }
        Ok(())
    }

    /// `true` when the buffer sits on a byte boundary.
    #[inline]
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_count & 7 == 0
    }

    /// Copies up to `dst.len()` aligned bytes, first from the bit buffer and
    /// then straight from `input`. Returns the number of bytes copied.
    pub fn copy_bytes(&mut self, dst: &mut [u8], input: &mut &[u8]) -> usize {
        debug_assert!(self.is_byte_aligned());
        let mut n = 0;
        while n < dst.len() && self.bit_count >= 8 {
            dst[n] = self.take(8) as u8;
            n += 1;
        }
        let direct = (dst.len() - n).min(input.len());
        dst[n..n + direct].copy_from_slice(&input[..direct]);
        *input = &input[direct..];
        n + direct
    }

    /// Skips up to `count` aligned bytes. Returns the number skipped.
    pub fn skip_bytes(&mut self, count: usize, input: &mut &[u8]) -> usize {
        debug_assert!(self.is_byte_aligned());
        let mut n = 0;
        while n < count && self.bit_count >= 8 {
            self.take(8);
            n += 1;
        }
        let direct = (count - n).min(input.len());
        *input = &input[direct..];
        n + direct
    }

    /// Drops up to `max` whole unread bytes from the top of the buffer and
    /// returns how many were dropped, so the caller can hand them back to
    /// its input cursor.
    pub fn unload_bytes(&mut self, max: usize) -> usize {
        let whole = (self.bit_count / 8) as usize;
        let n = whole.min(max);
        self.bit_count -= (n * 8) as u32;
        self.val &= low_mask(self.bit_count);
        n
    }
}

#[inline]
fn low_mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// A read-only snapshot of buffered bits for all-or-nothing compound reads.
#[derive(Debug, Clone, Copy)]
pub struct BitWindow {
    val: u64,
    avail: u32,
    used: u32,
}

impl BitWindow {
    /// Builds a window over `avail` bits of `val`.
    pub fn new(val: u64, avail: u32) -> Self {
        BitWindow { val: val & low_mask(avail), avail, used: 0 }
    }

    /// Takes `n` bits, or `None` if the snapshot is short.
    #[inline]
    pub fn take(&mut self, n: u32) -> Option<u32> {
        if self.used + n > self.avail {
            return None;
        }
        let v = (self.val.checked_shr(self.used).unwrap_or(0) & low_mask(n)) as u32;
        self.used += n;
        Some(v)
    }

    /// Unconsumed bits, LSB first.
    #[inline]
    pub fn peek(&self) -> (u64, u32) {
        (self.val.checked_shr(self.used).unwrap_or(0), self.avail - self.used)
    }

    /// Marks `n` more bits as consumed.
    #[inline]
    pub fn advance(&mut self, n: u32) {
        debug_assert!(self.used + n <= self.avail);
        self.used += n;
    }

    /// Bits consumed from the snapshot so far.
    #[inline]
    pub fn used(&self) -> u32 {
        self.used
    }
}
