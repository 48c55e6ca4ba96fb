//! The caller-facing streaming driver.
//!
//! `decompress_stream` runs the stage machine as far as the current input
//! and output slices allow, moving decoded bytes from the window into the
//! caller's buffer whenever the engine pauses. Both cursors are advanced by
//! exactly what was consumed or produced.

use crate::decode::metablock::read_window_bits;
use crate::decode::state::BrotliState;
use crate::decode::types::{BrotliError, BrotliResult, CommandStage, DecodeStage, Interrupt, Step};
use crate::ring_buffer::RingBuffer;

impl<'d> BrotliState<'d> {
    /// Decodes as much of `next_in` into `next_out` as resources allow.
    ///
    /// On return `next_in` starts at the first unconsumed byte, `next_out`
    /// at the first unwritten byte, and `total_out` has grown by the number
    /// of bytes written. Once the stream completes, whole bytes that were
    /// read ahead of the final meta-block are handed back to `next_in`.
    pub fn decompress_stream(
        &mut self,
        next_in: &mut &[u8],
        next_out: &mut &mut [u8],
        total_out: &mut usize,
    ) -> BrotliResult {
        if self.stage == DecodeStage::Error {
            return BrotliResult::Error;
        }
        if self.finished {
            self.fail(BrotliError::InvalidUsage);
            return BrotliResult::Error;
        }

        let orig: &[u8] = *next_in;
        let result = self.drive(next_in, next_out, total_out);
        let consumed = orig.len() - next_in.len();
        if consumed > 0 {
            self.started = true;
        }

        if self.stage == DecodeStage::Done {
            let give = self.br.unload_bytes(consumed);
            *next_in = &orig[consumed - give..];
        }
        result
    }

    fn drive(
        &mut self,
        next_in: &mut &[u8],
        next_out: &mut &mut [u8],
        total_out: &mut usize,
    ) -> BrotliResult {
        loop {
            match self.advance(next_in) {
                Ok(()) => {
                    self.flush(next_out, total_out);
                    if self.pending_output() > 0 {
                        return BrotliResult::NeedsMoreOutput;
                    }
                    self.finished = true;
                    return BrotliResult::Success;
                }
                Err(Interrupt::NeedsMoreOutput) => {
                    if self.flush(next_out, total_out) == 0 {
                        return BrotliResult::NeedsMoreOutput;
                    }
                }
                Err(Interrupt::NeedsMoreInput) => {
                    self.flush(next_out, total_out);
                    if self.pending_output() > 0 && next_out.is_empty() {
                        return BrotliResult::NeedsMoreOutput;
                    }
                    return BrotliResult::NeedsMoreInput;
                }
                Err(Interrupt::Error(e)) => {
                    self.fail(e);
                    return BrotliResult::Error;
                }
            }
        }
    }

    fn flush(&mut self, next_out: &mut &mut [u8], total_out: &mut usize) -> usize {
        let Some(ring) = self.ring.as_mut() else {
            return 0;
        };
        let n = ring.flush_into(next_out);
        *total_out += n;
        n
    }

    /// Runs the stage machine until it finishes the stream or pauses.
    fn advance(&mut self, input: &mut &[u8]) -> Step<()> {
        loop {
            match self.stage {
                DecodeStage::Uninitialized => {
                    let window_bits = read_window_bits(&mut self.br, input)?;
                    let mut ring = RingBuffer::new(&self.mem, window_bits)?;
                    ring.seed(self.custom_dict);
                    crate::displaylevel!(4, "window: {} bits\n", window_bits);
                    self.window_bits = window_bits;
                    self.ring = Some(ring);
                    self.stage = DecodeStage::MetaBlockBegin;
                }
                DecodeStage::MetaBlockBegin => self.begin_metablock(input)?,
                DecodeStage::MetaBlockHeader => self.read_metablock_header(input)?,
                DecodeStage::Uncompressed => {
                    self.copy_uncompressed(input)?;
                    self.stage = DecodeStage::MetaBlockDone;
                }
                DecodeStage::Metadata => {
                    self.skip_metadata(input)?;
                    self.stage = DecodeStage::MetaBlockDone;
                }
                DecodeStage::TreesAndContextMaps => {
                    self.read_trees(input)?;
                    self.cmd_stage = CommandStage::Begin;
                    self.stage = DecodeStage::MainLoop;
                }
                DecodeStage::MainLoop => {
                    self.run_commands(input)?;
                    self.stage = DecodeStage::MetaBlockDone;
                }
                DecodeStage::MetaBlockDone => {
                    if self.is_last {
                        self.br.align_to_byte()?;
                        self.stage = DecodeStage::Done;
                    } else {
                        self.stage = DecodeStage::MetaBlockBegin;
                    }
                }
                DecodeStage::Done => return Ok(()),
                DecodeStage::Error => {
                    return Err(self.error.unwrap_or(BrotliError::Corrupt).into());
                }
            }
        }
    }
}

/// Free-function form of [`BrotliState::decompress_stream`].
pub fn decompress_stream(
    state: &mut BrotliState<'_>,
    next_in: &mut &[u8],
    next_out: &mut &mut [u8],
    total_out: &mut usize,
) -> BrotliResult {
    state.decompress_stream(next_in, next_out, total_out)
}
