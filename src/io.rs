//! `std::io::Read` adapter over the streaming decoder.
//!
//! [`Decompressor`] pulls compressed bytes from any `R: Read` into an
//! internal buffer and decodes them on demand, so a Brotli stream can be
//! consumed with `read_to_end`, `io::copy` and friends.

use std::io::{self, Read};

use crate::config::READ_BUFFER_SIZE;
use crate::decode::{BrotliError, BrotliResult, BrotliState};

fn brotli_err_to_io(e: BrotliError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("brotli error: {e}"))
}

/// Streaming Brotli decompressor backed by any `R: Read`.
pub struct Decompressor<'d, R: Read> {
    state: BrotliState<'d>,
    inner: R,
    /// Compressed bytes read from `inner`.
    src_buf: Vec<u8>,
    /// Number of valid bytes in `src_buf`.
    src_buf_size: usize,
    /// Read offset within `src_buf`.
    src_buf_next: usize,
    /// Set once the final meta-block has been drained.
    done: bool,
}

impl<R: Read> Decompressor<'static, R> {
    pub fn new(inner: R) -> Self {
        Self::with_buffer_size(inner, READ_BUFFER_SIZE)
    }

    /// Like [`Decompressor::new`] with an input buffer of `size` bytes.
    pub fn with_buffer_size(inner: R, size: usize) -> Self {
        Decompressor {
            state: BrotliState::new(),
            inner,
            src_buf: vec![0u8; size.max(1)],
            src_buf_size: 0,
            src_buf_next: 0,
            done: false,
        }
    }
}

impl<'d, R: Read> Decompressor<'d, R> {
    /// A decompressor whose window is pre-seeded with `dict`.
    pub fn with_dictionary(inner: R, dict: &'d [u8]) -> Result<Self, BrotliError> {
        let mut state = BrotliState::new();
        state.set_custom_dictionary(dict)?;
        Ok(Decompressor {
            state,
            inner,
            src_buf: vec![0u8; READ_BUFFER_SIZE],
            src_buf_size: 0,
            src_buf_next: 0,
            done: false,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Compressed bytes read from `inner` but not used by the stream.
    ///
    /// After the stream ends these are the bytes that followed it.
    pub fn unused_input(&self) -> &[u8] {
        &self.src_buf[self.src_buf_next..self.src_buf_size]
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<'d, R: Read> Read for Decompressor<'d, R> {
    /// Returns `Ok(0)` once the stream has ended; a source that ends before
    /// the stream does gives `UnexpectedEof`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.done || buf.is_empty() {
            return Ok(0);
        }
        loop {
            let mut next_in = &self.src_buf[self.src_buf_next..self.src_buf_size];
            let avail = next_in.len();
            let mut next_out: &mut [u8] = &mut *buf;
            let mut written = 0usize;
            let result = self.state.decompress_stream(&mut next_in, &mut next_out, &mut written);
            self.src_buf_next += avail - next_in.len();

            match result {
                BrotliResult::Success => {
                    self.done = true;
                    return Ok(written);
                }
                BrotliResult::NeedsMoreOutput => return Ok(written),
                BrotliResult::NeedsMoreInput => {
                    if written > 0 {
                        return Ok(written);
                    }
                    let n = self.inner.read(&mut self.src_buf)?;
                    if n == 0 {
                        let e = self.state.truncation_error();
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("brotli error: {e}"),
                        ));
                    }
                    self.src_buf_size = n;
                    self.src_buf_next = 0;
                }
                BrotliResult::Error => {
                    let e = self.state.last_error().unwrap_or(BrotliError::Corrupt);
                    return Err(brotli_err_to_io(e));
                }
            }
        }
    }
}
