//! Decoder session state.
//!
//! `BrotliState` holds every piece of progress the decoder can be suspended
//! in: bit reader contents, the current stage and sub-stage, partially read
//! prefix codes and context maps, block-type trackers, the pending command,
//! and the output window. The parsing steps live in `metablock.rs` and
//! `commands.rs`; the caller-facing driver is in `stream.rs`.

use libc::c_void;

use crate::bit_reader::{BitReader, BitWindow};
use crate::config::MAX_TRANSFORMED_WORD_LENGTH;
use crate::context::ContextMode;
use crate::decode::metablock::ContextMapReader;
use crate::decode::types::{
    BrotliError, CommandCode, CommandStage, DecodeStage, HeaderStage, Interrupt, Step, TreesStage,
    BLOCK_LENGTH_PREFIX,
};
use crate::distance::{DistanceCache, DistanceParams};
use crate::huffman::{HuffmanTable, HuffmanTreeGroup, PrefixCodeReader};
use crate::memory::{BrotliAllocFunc, BrotliFreeFunc, CustomMem, MemBlock};
use crate::ring_buffer::RingBuffer;

/// Block length used when a category has a single block type: large enough
/// that it never runs out inside one meta-block.
pub(crate) const UNLIMITED_BLOCK_LENGTH: u32 = 1 << 24;

// ─────────────────────────────────────────────────────────────────────────────
// Block-type tracking
// ─────────────────────────────────────────────────────────────────────────────

/// Block-type schedule of one category (literal, command or distance).
#[derive(Debug)]
pub(crate) struct BlockTypeState {
    pub num_types: u32,
    pub type_tree: Option<HuffmanTable>,
    pub count_tree: Option<HuffmanTable>,
    pub current: u32,
    pub previous: u32,
    /// Symbols left in the current block.
    pub remaining: u32,
}

impl Default for BlockTypeState {
    fn default() -> Self {
        BlockTypeState {
            num_types: 1,
            type_tree: None,
            count_tree: None,
            current: 0,
            previous: 1,
            remaining: UNLIMITED_BLOCK_LENGTH,
        }
    }
}

impl BlockTypeState {
    /// Resets to a fresh meta-block with `num_types` block types.
    pub fn reset(&mut self, num_types: u32) {
        *self = BlockTypeState { num_types, ..BlockTypeState::default() };
    }

    /// Reads a block-count code plus its extra bits as one unit.
    pub fn read_block_count(&mut self, br: &mut BitReader, input: &mut &[u8]) -> Step<()> {
        let Some(count_tree) = self.count_tree.as_ref() else {
            return Err(BrotliError::InvalidBlockCount.into());
        };
        let mut w = br.window(input);
        let length = decode_block_length(count_tree, &mut w).ok_or(Interrupt::NeedsMoreInput)?;
        br.skip_bits(w.used());
        self.remaining = length;
        Ok(())
    }

    /// Consumes one symbol's worth of the current block, switching blocks
    /// first when the current one is exhausted. The switch command (type
    /// code, count code, count extra bits) is read all-or-nothing.
    pub fn advance(&mut self, br: &mut BitReader, input: &mut &[u8]) -> Step<()> {
        if self.num_types < 2 {
            return Ok(());
        }
        if self.remaining == 0 {
            self.switch(br, input)?;
        }
        self.remaining -= 1;
        Ok(())
    }

    fn switch(&mut self, br: &mut BitReader, input: &mut &[u8]) -> Step<()> {
        let (Some(type_tree), Some(count_tree)) = (self.type_tree.as_ref(), self.count_tree.as_ref())
        else {
            return Err(BrotliError::InvalidBlockCount.into());
        };
        let mut w = br.window(input);
        let code = type_tree.decode_window(&mut w).ok_or(Interrupt::NeedsMoreInput)?;
        let length = decode_block_length(count_tree, &mut w).ok_or(Interrupt::NeedsMoreInput)?;
        br.skip_bits(w.used());

        let mut next = match code {
            0 => self.previous,
            1 => self.current + 1,
            c => u32::from(c) - 2,
        };
        if next >= self.num_types {
            next -= self.num_types;
        }
        self.previous = self.current;
        self.current = next;
        self.remaining = length;
        Ok(())
    }
}

fn decode_block_length(count_tree: &HuffmanTable, w: &mut BitWindow) -> Option<u32> {
    let code = count_tree.decode_window(w)?;
    let (base, nbits) = *BLOCK_LENGTH_PREFIX.get(usize::from(code))?;
    Some(base + w.take(nbits)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Session state
// ─────────────────────────────────────────────────────────────────────────────

/// A streaming decoder session.
///
/// The lifetime `'d` bounds the optional custom dictionary, which is
/// borrowed rather than copied.
pub struct BrotliState<'d> {
    pub(crate) mem: CustomMem,
    pub(crate) stage: DecodeStage,
    pub(crate) error: Option<BrotliError>,
    /// Set once `Success` has been reported.
    pub(crate) finished: bool,
    /// Set once any input has been consumed.
    pub(crate) started: bool,

    pub(crate) br: BitReader,
    pub(crate) window_bits: u32,
    pub(crate) ring: Option<RingBuffer>,
    pub(crate) custom_dict: &'d [u8],

    // ── Meta-block header ────────────────────────────────────────────────────
    pub(crate) header_stage: HeaderStage,
    pub(crate) is_last: bool,
    pub(crate) is_uncompressed: bool,
    pub(crate) num_nibbles: u32,
    pub(crate) nibble_index: u32,
    pub(crate) header_length: usize,
    /// Bytes of the current meta-block body still to produce (or skip).
    pub(crate) remaining: usize,

    // ── Compressed meta-block prologue ───────────────────────────────────────
    pub(crate) trees_stage: TreesStage,
    pub(crate) class: usize,
    pub(crate) blocks: [BlockTypeState; 3],
    pub(crate) code_reader: PrefixCodeReader,
    pub(crate) map_reader: ContextMapReader,
    pub(crate) dist_params: DistanceParams,
    pub(crate) mode_index: usize,
    pub(crate) context_modes: MemBlock<ContextMode>,
    pub(crate) literal_map: MemBlock<u8>,
    pub(crate) num_literal_trees: usize,
    pub(crate) distance_map: MemBlock<u8>,
    pub(crate) num_distance_trees: usize,
    pub(crate) literal_trees: HuffmanTreeGroup,
    pub(crate) command_trees: HuffmanTreeGroup,
    pub(crate) distance_trees: HuffmanTreeGroup,

    // ── Command loop ─────────────────────────────────────────────────────────
    pub(crate) cmd_stage: CommandStage,
    pub(crate) command: CommandCode,
    pub(crate) insert_remaining: usize,
    pub(crate) copy_length: usize,
    pub(crate) distance: usize,
    pub(crate) dist_cache: DistanceCache,
    pub(crate) dict_word: [u8; MAX_TRANSFORMED_WORD_LENGTH],
    pub(crate) dict_word_len: usize,
    pub(crate) dict_word_pos: usize,
}

impl<'d> Default for BrotliState<'d> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> BrotliState<'d> {
    /// A session that allocates from the global allocator.
    pub fn new() -> Self {
        Self::with_allocator(CustomMem::default())
    }

    /// A session whose large buffers come from `mem`.
    pub fn with_allocator(mem: CustomMem) -> Self {
        crate::display::init_display_level_from_env();
        BrotliState {
            mem,
            stage: DecodeStage::Uninitialized,
            error: None,
            finished: false,
            started: false,
            br: BitReader::new(),
            window_bits: 0,
            ring: None,
            custom_dict: &[],
            header_stage: HeaderStage::default(),
            is_last: false,
            is_uncompressed: false,
            num_nibbles: 0,
            nibble_index: 0,
            header_length: 0,
            remaining: 0,
            trees_stage: TreesStage::default(),
            class: 0,
            blocks: Default::default(),
            code_reader: PrefixCodeReader::new(),
            map_reader: ContextMapReader::default(),
            dist_params: DistanceParams::default(),
            mode_index: 0,
            context_modes: MemBlock::empty(),
            literal_map: MemBlock::empty(),
            num_literal_trees: 0,
            distance_map: MemBlock::empty(),
            num_distance_trees: 0,
            literal_trees: HuffmanTreeGroup::default(),
            command_trees: HuffmanTreeGroup::default(),
            distance_trees: HuffmanTreeGroup::default(),
            cmd_stage: CommandStage::default(),
            command: CommandCode { insert_code: 0, copy_code: 0, implicit_distance: false },
            insert_remaining: 0,
            copy_length: 0,
            distance: 0,
            dist_cache: DistanceCache::default(),
            dict_word: [0; MAX_TRANSFORMED_WORD_LENGTH],
            dict_word_len: 0,
            dict_word_pos: 0,
        }
    }

    /// Registers a custom dictionary that pre-seeds the window.
    ///
    /// Only the last `(1 << WBITS) - 16` bytes are used. The bytes act as
    /// history for back-references but are never emitted. Must be called
    /// before the first input byte is consumed.
    pub fn set_custom_dictionary(&mut self, dict: &'d [u8]) -> Result<(), BrotliError> {
        if self.started || self.stage != DecodeStage::Uninitialized {
            return Err(BrotliError::InvalidUsage);
        }
        self.custom_dict = dict;
        Ok(())
    }

    /// Current top-level stage.
    pub fn stage(&self) -> DecodeStage {
        self.stage
    }

    /// The error that ended the session, if any.
    pub fn last_error(&self) -> Option<BrotliError> {
        self.error
    }

    /// Window size exponent from the stream header; 0 before it is read.
    pub fn window_bits(&self) -> u32 {
        self.window_bits
    }

    /// `true` once the final meta-block has been fully decoded.
    pub fn is_finished(&self) -> bool {
        self.stage == DecodeStage::Done
    }

    /// Decoded bytes still waiting to be flushed to the caller.
    pub fn pending_output(&self) -> usize {
        self.ring.as_ref().map_or(0, RingBuffer::pending)
    }

    /// The error a finishing wrapper reports when input runs out here.
    pub fn truncation_error(&self) -> BrotliError {
        match self.stage {
            DecodeStage::Uncompressed | DecodeStage::Metadata | DecodeStage::MainLoop => {
                BrotliError::LengthMismatch
            }
            _ => BrotliError::TruncatedHeader,
        }
    }

    /// Records a terminal error.
    pub(crate) fn fail(&mut self, e: BrotliError) {
        if self.error.is_none() {
            crate::debugoutput!("ERROR at stage {:?}: {}\n", self.stage, e);
            self.error = Some(e);
        }
        self.stage = DecodeStage::Error;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Creates a boxed session, optionally with an allocation hook pair.
///
/// Supplying exactly one hook is rejected with `InvalidParameter`.
pub fn create_state(
    alloc_fn: Option<BrotliAllocFunc>,
    free_fn: Option<BrotliFreeFunc>,
    opaque: *mut c_void,
) -> Result<Box<BrotliState<'static>>, BrotliError> {
    let mem = CustomMem::new(alloc_fn, free_fn, opaque)?;
    Ok(Box::new(BrotliState::with_allocator(mem)))
}

/// Releases a session and every buffer it owns.
pub fn destroy_state(state: Box<BrotliState<'_>>) {
    drop(state);
}
