//! Meta-block header and compressed-block prologue parsing.
//!
//! Everything here is resumable: each field is read atomically and the
//! position (header sub-stage, category index, tree index, context-map
//! index) is stored in the session before the next field is attempted.

use crate::bit_reader::BitReader;
use crate::context::{ContextMode, DISTANCE_CONTEXTS, LITERAL_CONTEXTS};
use crate::decode::state::BrotliState;
use crate::decode::types::{
    BrotliError, DecodeStage, HeaderStage, Interrupt, Step, TreesStage, NUM_BLOCK_COUNT_SYMBOLS,
    NUM_COMMAND_SYMBOLS, NUM_LITERAL_SYMBOLS,
};
use crate::distance::DistanceParams;
use crate::huffman::{HuffmanTable, HuffmanTreeGroup, PrefixCodeReader};
use crate::memory::{CustomMem, MemBlock};

// ─────────────────────────────────────────────────────────────────────────────
// Small field readers
// ─────────────────────────────────────────────────────────────────────────────

/// Reads the variable-length 8-bit count used for NBLTYPES and NTREES
/// (the returned value is one less than the count).
pub(crate) fn read_var_u8(br: &mut BitReader, input: &mut &[u8]) -> Step<u32> {
    let mut w = br.window(input);
    let value = (|| {
        if w.take(1)? == 0 {
            return Some(0);
        }
        let n = w.take(3)?;
        if n == 0 {
            return Some(1);
        }
        Some((1 << n) + w.take(n)?)
    })();
    match value {
        Some(v) => {
            br.skip_bits(w.used());
            Ok(v)
        }
        None => Err(Interrupt::NeedsMoreInput),
    }
}

/// Reads the stream header's window size exponent.
pub(crate) fn read_window_bits(br: &mut BitReader, input: &mut &[u8]) -> Step<u32> {
    let mut w = br.window(input);
    let value = (|| {
        if w.take(1)? == 0 {
            return Some(Ok(16));
        }
        let n = w.take(3)?;
        if n != 0 {
            return Some(Ok(17 + n));
        }
        match w.take(3)? {
            0 => Some(Ok(17)),
            1 => Some(Err(BrotliError::InvalidWindowBits)),
            m => Some(Ok(8 + m)),
        }
    })();
    match value {
        Some(v) => {
            br.skip_bits(w.used());
            Ok(v?)
        }
        None => Err(Interrupt::NeedsMoreInput),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context maps
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MapStage {
    #[default]
    NumTrees,
    RleMax,
    Code,
    Values,
    InverseMtf,
}

/// Resumable reader for one context map.
#[derive(Default)]
pub(crate) struct ContextMapReader {
    stage: MapStage,
    num_trees: usize,
    max_rle: u32,
    table: Option<HuffmanTable>,
    map: MemBlock<u8>,
    index: usize,
}

impl ContextMapReader {
    /// Reads a map of `size` entries. Returns the tree count and the map.
    pub fn read(
        &mut self,
        size: usize,
        mem: &CustomMem,
        codes: &mut PrefixCodeReader,
        br: &mut BitReader,
        input: &mut &[u8],
    ) -> Step<(usize, MemBlock<u8>)> {
        let result = self.step(size, mem, codes, br, input);
        if !matches!(result, Err(Interrupt::NeedsMoreInput)) {
            self.stage = MapStage::NumTrees;
            self.table = None;
        }
        result
    }

    fn step(
        &mut self,
        size: usize,
        mem: &CustomMem,
        codes: &mut PrefixCodeReader,
        br: &mut BitReader,
        input: &mut &[u8],
    ) -> Step<(usize, MemBlock<u8>)> {
        loop {
            match self.stage {
                MapStage::NumTrees => {
                    let num_trees = read_var_u8(br, input)? as usize + 1;
                    self.num_trees = num_trees;
                    self.map = MemBlock::new(mem, size)?;
                    self.index = 0;
                    if num_trees < 2 {
                        return Ok((num_trees, core::mem::take(&mut self.map)));
                    }
                    self.stage = MapStage::RleMax;
                }
                MapStage::RleMax => {
                    let mut w = br.window(input);
                    let flag = w.take(1).ok_or(Interrupt::NeedsMoreInput)?;
                    self.max_rle = if flag == 1 {
                        w.take(4).ok_or(Interrupt::NeedsMoreInput)? + 1
                    } else {
                        0
                    };
                    br.skip_bits(w.used());
                    self.stage = MapStage::Code;
                }
                MapStage::Code => {
                    let alphabet = self.num_trees + self.max_rle as usize;
                    self.table = Some(codes.read(alphabet, mem, br, input)?);
                    self.stage = MapStage::Values;
                }
                MapStage::Values => {
                    self.read_values(br, input)?;
                    self.stage = MapStage::InverseMtf;
                }
                MapStage::InverseMtf => {
                    if br.read_bits(1, input)? == 1 {
                        inverse_move_to_front(&mut self.map);
                    }
                    if self.map.iter().any(|&t| usize::from(t) >= self.num_trees) {
                        return Err(BrotliError::InvalidContextMap.into());
                    }
                    return Ok((self.num_trees, core::mem::take(&mut self.map)));
                }
            }
        }
    }

    fn read_values(&mut self, br: &mut BitReader, input: &mut &[u8]) -> Step<()> {
        let Some(table) = self.table.as_ref() else {
            return Err(BrotliError::InvalidContextMap.into());
        };
        let size = self.map.len();
        while self.index < size {
            let mut w = br.window(input);
            let symbol = u32::from(table.decode_window(&mut w).ok_or(Interrupt::NeedsMoreInput)?);
            if symbol == 0 {
                self.map[self.index] = 0;
                self.index += 1;
            } else if symbol <= self.max_rle {
                let extra = w.take(symbol).ok_or(Interrupt::NeedsMoreInput)?;
                let run = (1usize << symbol) + extra as usize;
                if self.index + run > size {
                    return Err(BrotliError::InvalidContextMap.into());
                }
                self.map[self.index..self.index + run].fill(0);
                self.index += run;
            } else {
                self.map[self.index] = (symbol - self.max_rle) as u8;
                self.index += 1;
            }
            br.skip_bits(w.used());
        }
        Ok(())
    }
}

/// Undoes move-to-front coding in place.
pub fn inverse_move_to_front(values: &mut [u8]) {
    let mut mtf: [u8; 256] = core::array::from_fn(|i| i as u8);
    for v in values.iter_mut() {
        let index = usize::from(*v);
        let value = mtf[index];
        *v = value;
        mtf.copy_within(0..index, 1);
        mtf[0] = value;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Meta-block header
// ─────────────────────────────────────────────────────────────────────────────

impl<'d> BrotliState<'d> {
    /// Reads ISLAST and resets per-meta-block state.
    pub(crate) fn begin_metablock(&mut self, input: &mut &[u8]) -> Step<()> {
        self.is_last = self.br.read_bits(1, input)? == 1;
        self.is_uncompressed = false;
        self.header_length = 0;
        self.nibble_index = 0;
        self.remaining = 0;
        self.header_stage = if self.is_last {
            HeaderStage::IsLastEmpty
        } else {
            HeaderStage::Nibbles
        };
        self.stage = DecodeStage::MetaBlockHeader;
        Ok(())
    }

    /// Reads the rest of the meta-block header and picks the body stage.
    pub(crate) fn read_metablock_header(&mut self, input: &mut &[u8]) -> Step<()> {
        loop {
            match self.header_stage {
                HeaderStage::IsLastEmpty => {
                    if self.br.read_bits(1, input)? == 1 {
                        crate::displaylevel!(4, "meta-block: last, empty\n");
                        self.stage = DecodeStage::MetaBlockDone;
                        return Ok(());
                    }
                    self.header_stage = HeaderStage::Nibbles;
                }
                HeaderStage::Nibbles => {
                    let v = self.br.read_bits(2, input)?;
                    if v == 3 {
                        self.header_stage = HeaderStage::MetadataReserved;
                    } else {
                        self.num_nibbles = v + 4;
                        self.nibble_index = 0;
                        self.header_length = 0;
                        self.header_stage = HeaderStage::Size;
                    }
                }
                HeaderStage::Size => {
                    while self.nibble_index < self.num_nibbles {
                        let v = self.br.read_bits(4, input)?;
                        if self.nibble_index + 1 == self.num_nibbles && self.num_nibbles > 4 && v == 0
                        {
                            return Err(BrotliError::ExuberantNibble.into());
                        }
                        self.header_length |= (v as usize) << (4 * self.nibble_index);
                        self.nibble_index += 1;
                    }
                    self.remaining = self.header_length + 1;
                    if self.is_last {
                        self.enter_compressed();
                        return Ok(());
                    }
                    self.header_stage = HeaderStage::Uncompressed;
                }
                HeaderStage::Uncompressed => {
                    self.is_uncompressed = self.br.read_bits(1, input)? == 1;
                    crate::displaylevel!(
                        4,
                        "meta-block: len={} uncompressed={}\n",
                        self.remaining,
                        self.is_uncompressed
                    );
                    if self.is_uncompressed {
                        self.br.align_to_byte()?;
                        self.stage = DecodeStage::Uncompressed;
                    } else {
                        self.enter_compressed();
                    }
                    return Ok(());
                }
                HeaderStage::MetadataReserved => {
                    if self.br.read_bits(1, input)? != 0 {
                        return Err(BrotliError::ReservedBitSet.into());
                    }
                    self.header_stage = HeaderStage::MetadataBytes;
                }
                HeaderStage::MetadataBytes => {
                    self.num_nibbles = self.br.read_bits(2, input)?;
                    self.nibble_index = 0;
                    self.header_length = 0;
                    if self.num_nibbles == 0 {
                        self.remaining = 0;
                        self.br.align_to_byte()?;
                        self.stage = DecodeStage::Metadata;
                        return Ok(());
                    }
                    self.header_stage = HeaderStage::MetadataSize;
                }
                HeaderStage::MetadataSize => {
                    while self.nibble_index < self.num_nibbles {
                        let v = self.br.read_bits(8, input)?;
                        if self.nibble_index + 1 == self.num_nibbles && self.num_nibbles > 1 && v == 0
                        {
                            return Err(BrotliError::ExuberantNibble.into());
                        }
                        self.header_length |= (v as usize) << (8 * self.nibble_index);
                        self.nibble_index += 1;
                    }
                    self.remaining = self.header_length + 1;
                    crate::displaylevel!(4, "meta-block: metadata len={}\n", self.remaining);
                    self.br.align_to_byte()?;
                    self.stage = DecodeStage::Metadata;
                    return Ok(());
                }
            }
        }
    }

    fn enter_compressed(&mut self) {
        self.stage = DecodeStage::TreesAndContextMaps;
        self.trees_stage = TreesStage::NumBlockTypes;
        self.class = 0;
    }

    /// Copies a stored meta-block body into the window.
    pub(crate) fn copy_uncompressed(&mut self, input: &mut &[u8]) -> Step<()> {
        let Some(ring) = self.ring.as_mut() else {
            return Err(BrotliError::Corrupt.into());
        };
        while self.remaining > 0 {
            let dst = ring.writable(self.remaining);
            if dst.is_empty() {
                return Err(Interrupt::NeedsMoreOutput);
            }
            let n = self.br.copy_bytes(dst, input);
            if n == 0 {
                return Err(Interrupt::NeedsMoreInput);
            }
            ring.commit(n);
            self.remaining -= n;
        }
        Ok(())
    }

    /// Skips a metadata meta-block body.
    pub(crate) fn skip_metadata(&mut self, input: &mut &[u8]) -> Step<()> {
        let n = self.br.skip_bytes(self.remaining, input);
        self.remaining -= n;
        if self.remaining > 0 {
            return Err(Interrupt::NeedsMoreInput);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compressed meta-block prologue
    // ─────────────────────────────────────────────────────────────────────────

    /// Reads block-type schedules, distance parameters, context modes,
    /// context maps and the three tree groups.
    pub(crate) fn read_trees(&mut self, input: &mut &[u8]) -> Step<()> {
        loop {
            match self.trees_stage {
                TreesStage::NumBlockTypes => {
                    let num_types = read_var_u8(&mut self.br, input)? + 1;
                    self.blocks[self.class].reset(num_types);
                    self.trees_stage = if num_types >= 2 {
                        TreesStage::BlockTypeCode
                    } else {
                        self.next_class()
                    };
                }
                TreesStage::BlockTypeCode => {
                    let alphabet = self.blocks[self.class].num_types as usize + 2;
                    let table = self.code_reader.read(alphabet, &self.mem, &mut self.br, input)?;
                    self.blocks[self.class].type_tree = Some(table);
                    self.trees_stage = TreesStage::BlockCountCode;
                }
                TreesStage::BlockCountCode => {
                    let table = self.code_reader.read(
                        NUM_BLOCK_COUNT_SYMBOLS,
                        &self.mem,
                        &mut self.br,
                        input,
                    )?;
                    self.blocks[self.class].count_tree = Some(table);
                    self.trees_stage = TreesStage::FirstBlockCount;
                }
                TreesStage::FirstBlockCount => {
                    self.blocks[self.class].read_block_count(&mut self.br, input)?;
                    self.trees_stage = self.next_class();
                }
                TreesStage::DistanceParams => {
                    let v = self.br.read_bits(6, input)?;
                    let postfix_bits = v & 3;
                    let num_direct = (v >> 2) << postfix_bits;
                    self.dist_params = DistanceParams::new(postfix_bits, num_direct);
                    let num_literal_types = self.blocks[0].num_types as usize;
                    self.context_modes = MemBlock::new(&self.mem, num_literal_types)?;
                    self.mode_index = 0;
                    self.trees_stage = TreesStage::ContextModes;
                }
                TreesStage::ContextModes => {
                    while self.mode_index < self.context_modes.len() {
                        let tag = self.br.read_bits(2, input)?;
                        self.context_modes[self.mode_index] = ContextMode::from_tag(tag)?;
                        self.mode_index += 1;
                    }
                    self.trees_stage = TreesStage::LiteralContextMap;
                }
                TreesStage::LiteralContextMap => {
                    let size = self.blocks[0].num_types as usize * LITERAL_CONTEXTS;
                    let (num_trees, map) = self.map_reader.read(
                        size,
                        &self.mem,
                        &mut self.code_reader,
                        &mut self.br,
                        input,
                    )?;
                    self.num_literal_trees = num_trees;
                    self.literal_map = map;
                    self.trees_stage = TreesStage::DistanceContextMap;
                }
                TreesStage::DistanceContextMap => {
                    let size = self.blocks[2].num_types as usize * DISTANCE_CONTEXTS;
                    let (num_trees, map) = self.map_reader.read(
                        size,
                        &self.mem,
                        &mut self.code_reader,
                        &mut self.br,
                        input,
                    )?;
                    self.num_distance_trees = num_trees;
                    self.distance_map = map;
                    self.literal_trees =
                        HuffmanTreeGroup::new(NUM_LITERAL_SYMBOLS, self.num_literal_trees);
                    self.trees_stage = TreesStage::LiteralTrees;
                }
                TreesStage::LiteralTrees => {
                    read_tree_group(
                        &mut self.literal_trees,
                        self.num_literal_trees,
                        &mut self.code_reader,
                        &self.mem,
                        &mut self.br,
                        input,
                    )?;
                    self.command_trees = HuffmanTreeGroup::new(
                        NUM_COMMAND_SYMBOLS,
                        self.blocks[1].num_types as usize,
                    );
                    self.trees_stage = TreesStage::CommandTrees;
                }
                TreesStage::CommandTrees => {
                    let n = self.blocks[1].num_types as usize;
                    read_tree_group(
                        &mut self.command_trees,
                        n,
                        &mut self.code_reader,
                        &self.mem,
                        &mut self.br,
                        input,
                    )?;
                    self.distance_trees = HuffmanTreeGroup::new(
                        self.dist_params.alphabet_size(),
                        self.num_distance_trees,
                    );
                    self.trees_stage = TreesStage::DistanceTrees;
                }
                TreesStage::DistanceTrees => {
                    read_tree_group(
                        &mut self.distance_trees,
                        self.num_distance_trees,
                        &mut self.code_reader,
                        &self.mem,
                        &mut self.br,
                        input,
                    )?;
                    return Ok(());
                }
            }
        }
    }

    /// Moves to the next block category, or on to the distance parameters
    /// after the third.
    fn next_class(&mut self) -> TreesStage {
        self.class += 1;
        if self.class < 3 {
            TreesStage::NumBlockTypes
        } else {
            TreesStage::DistanceParams
        }
    }
}

fn read_tree_group(
    group: &mut HuffmanTreeGroup,
    num_trees: usize,
    codes: &mut PrefixCodeReader,
    mem: &CustomMem,
    br: &mut BitReader,
    input: &mut &[u8],
) -> Step<()> {
    while group.len() < num_trees {
        let table = codes.read(group.alphabet_size, mem, br, input)?;
        group.trees.push(table);
    }
    Ok(())
}
