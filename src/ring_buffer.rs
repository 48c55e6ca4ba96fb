//! Sliding output window.
//!
//! Decoded bytes are appended to a circular buffer of `1 << window_bits`
//! bytes. Back-references read from it; the caller drains it through
//! [`RingBuffer::flush_into`]. Bytes not yet flushed are never overwritten:
//! writers see [`RingBuffer::free_space`] shrink to zero and must pause.

use crate::config::WINDOW_GAP;
use crate::decode::types::BrotliError;
use crate::memory::{CustomMem, MemBlock};

#[derive(Debug)]
pub struct RingBuffer {
    buf: MemBlock<u8>,
    mask: usize,
    /// Total bytes ever written, custom dictionary included.
    pos: usize,
    /// Total bytes handed to the caller (or never meant to be).
    flushed: usize,
}

impl RingBuffer {
    /// Allocates a zeroed window of `1 << window_bits` bytes.
    pub fn new(mem: &CustomMem, window_bits: u32) -> Result<Self, BrotliError> {
        let capacity = 1usize << window_bits;
        Ok(RingBuffer {
            buf: MemBlock::new(mem, capacity)?,
            mask: capacity - 1,
            pos: 0,
            flushed: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Longest distance the window format allows, ignoring history length.
    #[inline]
    pub fn max_backward(&self) -> usize {
        self.capacity() - WINDOW_GAP
    }

    /// Longest distance that currently reaches real history.
    #[inline]
    pub fn max_distance(&self) -> usize {
        self.max_backward().min(self.pos)
    }

    /// Total bytes produced so far, custom dictionary included.
    #[inline]
    pub fn total_written(&self) -> usize {
        self.pos
    }

    /// Bytes decoded but not yet flushed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pos - self.flushed
    }

    /// Bytes that can be written before unflushed data would be overwritten.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.pending()
    }

    /// Loads the tail of a custom dictionary as already-flushed history.
    pub fn seed(&mut self, dict: &[u8]) {
        let take = dict.len().min(self.max_backward());
        for &b in &dict[dict.len() - take..] {
            self.buf[self.pos & self.mask] = b;
            self.pos += 1;
        }
        self.flushed = self.pos;
    }

    /// Appends one byte. The caller checks `free_space() > 0`.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        debug_assert!(self.free_space() > 0);
        self.buf[self.pos & self.mask] = byte;
        self.pos += 1;
    }

    /// Appends as much of `data` as fits and returns the count written.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.free_space());
        let mut done = 0;
        while done < n {
            let at = (self.pos + done) & self.mask;
            let chunk = (n - done).min(self.capacity() - at);
            self.buf[at..at + chunk].copy_from_slice(&data[done..done + chunk]);
            done += chunk;
        }
        self.pos += n;
        n
    }

    /// Contiguous free space at the write cursor, at most `max` bytes.
    /// Bytes filled in become visible after [`RingBuffer::commit`].
    pub fn writable(&mut self, max: usize) -> &mut [u8] {
        let at = self.pos & self.mask;
        let n = max.min(self.free_space()).min(self.capacity() - at);
        &mut self.buf[at..at + n]
    }

    /// Publishes `n` bytes written through [`RingBuffer::writable`].
    #[inline]
    pub fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.free_space());
        self.pos += n;
    }

    /// The byte `back` positions before the write cursor (1 = last byte).
    /// Positions before the start of the stream read as zero.
    #[inline]
    pub fn byte_back(&self, back: usize) -> u8 {
        if back > self.pos {
            return 0;
        }
        self.buf[(self.pos - back) & self.mask]
    }

    /// Copies up to `length` bytes from `distance` bytes back, one byte at a
    /// time so overlapping copies repeat the pattern. Stops early when the
    /// window fills; returns the number of bytes copied.
    pub fn copy_back(&mut self, distance: usize, length: usize) -> Result<usize, BrotliError> {
        if distance == 0 || distance > self.max_distance() {
            return Err(BrotliError::InvalidDistance);
        }
        if length == 0 {
            return Err(BrotliError::InvalidLength);
        }
        let n = length.min(self.free_space());
        for _ in 0..n {
            let b = self.buf[(self.pos - distance) & self.mask];
            self.buf[self.pos & self.mask] = b;
            self.pos += 1;
        }
        Ok(n)
    }

    /// Moves pending bytes into `out`, advancing the cursor. Returns the
    /// number of bytes moved.
    pub fn flush_into(&mut self, out: &mut &mut [u8]) -> usize {
        let n = self.pending().min(out.len());
        let mut done = 0;
        while done < n {
            let at = (self.flushed + done) & self.mask;
            let chunk = (n - done).min(self.capacity() - at);
            out[done..done + chunk].copy_from_slice(&self.buf[at..at + chunk]);
            done += chunk;
        }
        self.flushed += n;
        let taken = core::mem::take(out);
        *out = &mut taken[n..];
        n
    }
}
