//! The insert-and-copy command loop of a compressed meta-block.
//!
//! Each command inserts literals, then copies either from the window or
//! from the static dictionary. Every step records its sub-stage so the loop
//! can stop at any symbol boundary, or mid-copy when the window is full of
//! unflushed output.

use crate::context::{distance_context, literal_context, DISTANCE_CONTEXTS, LITERAL_CONTEXTS};
use crate::decode::state::BrotliState;
use crate::decode::types::{BrotliError, CommandCode, CommandStage, Interrupt, Step};
use crate::dictionary::{self, DictionaryRef};
use crate::distance::NUM_SHORT_CODES;

impl<'d> BrotliState<'d> {
    /// Runs commands until the meta-block's declared length is produced.
    pub(crate) fn run_commands(&mut self, input: &mut &[u8]) -> Step<()> {
        loop {
            match self.cmd_stage {
                CommandStage::Begin => {
                    if self.remaining == 0 {
                        return Ok(());
                    }
                    self.blocks[1].advance(&mut self.br, input)?;
                    let tree = self.command_trees.tree(self.blocks[1].current as usize);
                    let symbol = tree.read_symbol(&mut self.br, input);
                    let symbol = match symbol {
                        Ok(s) => s,
                        Err(e) => {
                            // The block counter was charged for this symbol; undo so the
                            // retry charges it again.
                            if self.blocks[1].num_types >= 2 {
                                self.blocks[1].remaining += 1;
                            }
                            return Err(e);
                        }
                    };
                    self.command = CommandCode::from_symbol(symbol).ok_or(BrotliError::Corrupt)?;
                    self.cmd_stage = CommandStage::CommandExtra;
                }
                CommandStage::CommandExtra => {
                    let extra = self.br.read_bits_u64(self.command.extra_bits(), input)?;
                    let (insert_len, copy_len) = self.command.lengths(extra);
                    let (insert_len, copy_len) = (insert_len as usize, copy_len as usize);
                    if insert_len > self.remaining {
                        return Err(BrotliError::LengthMismatch.into());
                    }
                    self.insert_remaining = insert_len;
                    self.copy_length = copy_len;
                    self.cmd_stage = CommandStage::InsertLiterals;
                }
                CommandStage::InsertLiterals => {
                    self.insert_literals(input)?;
                    if self.remaining == 0 {
                        // Literals filled the meta-block; the copy half is ignored.
                        self.cmd_stage = CommandStage::Begin;
                        continue;
                    }
                    if self.command.implicit_distance {
                        self.distance = self.dist_cache.short_code(0)?;
                        self.resolve_copy(false)?;
                    } else {
                        self.cmd_stage = CommandStage::ReadDistance;
                    }
                }
                CommandStage::ReadDistance => {
                    let code = self.read_distance_code(input)?;
                    self.resolve_copy(code != 0)?;
                }
                CommandStage::CopyWindow => {
                    let ring = self.ring.as_mut().ok_or(BrotliError::Corrupt)?;
                    while self.copy_length > 0 {
                        let n = ring.copy_back(self.distance, self.copy_length)?;
                        if n == 0 {
                            return Err(Interrupt::NeedsMoreOutput);
                        }
                        self.copy_length -= n;
                        self.remaining -= n;
                    }
                    self.cmd_stage = CommandStage::Begin;
                }
                CommandStage::CopyDictionary => {
                    let ring = self.ring.as_mut().ok_or(BrotliError::Corrupt)?;
                    while self.dict_word_pos < self.dict_word_len {
                        let n = ring.write(&self.dict_word[self.dict_word_pos..self.dict_word_len]);
                        if n == 0 {
                            return Err(Interrupt::NeedsMoreOutput);
                        }
                        self.dict_word_pos += n;
                        self.remaining -= n;
                    }
                    self.cmd_stage = CommandStage::Begin;
                }
            }
        }
    }

    fn insert_literals(&mut self, input: &mut &[u8]) -> Step<()> {
        let ring = self.ring.as_mut().ok_or(BrotliError::Corrupt)?;
        while self.insert_remaining > 0 {
            if ring.free_space() == 0 {
                return Err(Interrupt::NeedsMoreOutput);
            }
            let block = &mut self.blocks[0];
            let charged = block.num_types >= 2;
            block.advance(&mut self.br, input)?;

            let block_type = block.current as usize;
            let mode = self.context_modes[block_type];
            let ctx = literal_context(mode, ring.byte_back(1), ring.byte_back(2));
            let tree_index = self.literal_map[block_type * LITERAL_CONTEXTS + ctx];
            let tree = self.literal_trees.tree(usize::from(tree_index));
            match tree.read_symbol(&mut self.br, input) {
                Ok(literal) => ring.push(literal as u8),
                Err(e) => {
                    if charged {
                        block.remaining += 1;
                    }
                    return Err(e);
                }
            }
            self.insert_remaining -= 1;
            self.remaining -= 1;
        }
        Ok(())
    }

    /// Reads a distance symbol and its extra bits as one unit, resolving it
    /// to `self.distance`. Returns the distance code.
    fn read_distance_code(&mut self, input: &mut &[u8]) -> Step<u32> {
        let block = &mut self.blocks[2];
        let charged = block.num_types >= 2;
        block.advance(&mut self.br, input)?;

        let block_type = block.current as usize;
        let ctx = distance_context(self.copy_length as u32);
        let tree_index = self.distance_map[block_type * DISTANCE_CONTEXTS + ctx];
        let tree = self.distance_trees.tree(usize::from(tree_index));

        let mut w = self.br.window(input);
        let decoded = tree.decode_window(&mut w).and_then(|code| {
            let extra = w.take(self.dist_params.extra_bits(u32::from(code)))?;
            Some((u32::from(code), extra))
        });
        let Some((code, extra)) = decoded else {
            if charged {
                block.remaining += 1;
            }
            return Err(Interrupt::NeedsMoreInput);
        };
        self.br.skip_bits(w.used());

        self.distance = if code < NUM_SHORT_CODES {
            self.dist_cache.short_code(code)?
        } else {
            self.dist_params.distance(code, extra)
        };
        Ok(code)
    }

    /// Chooses between a window copy and a dictionary reference for the
    /// pending command, validating it against the meta-block length.
    fn resolve_copy(&mut self, update_cache: bool) -> Step<()> {
        let ring = self.ring.as_ref().ok_or(BrotliError::Corrupt)?;
        let max_distance = ring.max_distance();
        if self.distance > max_distance {
            let word_id = self.distance - max_distance - 1;
            let word = DictionaryRef::from_word_id(self.copy_length, word_id)?;
            let len =
                dictionary::expand(word.length, word.index, word.transform, &mut self.dict_word)?;
            if len > self.remaining {
                return Err(BrotliError::LengthMismatch.into());
            }
            self.dict_word_len = len;
            self.dict_word_pos = 0;
            self.cmd_stage = CommandStage::CopyDictionary;
            return Ok(());
        }
        if self.copy_length > self.remaining {
            return Err(BrotliError::LengthMismatch.into());
        }
        if update_cache {
            self.dist_cache.push(self.distance);
        }
        self.cmd_stage = CommandStage::CopyWindow;
        Ok(())
    }
}
