//! Decoder result codes, error taxonomy, state-machine stages and the fixed
//! prefix-code tables of the stream format (RFC 7932 sections 6, 5 and 9.2).

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Result codes
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one streaming decode call.
///
/// Discriminants match the C `BrotliResult` enum so the value can be returned
/// across the C ABI unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum BrotliResult {
    /// Decoding failed; see `BrotliState::last_error`.
    Error = 0,
    /// The last meta-block was decoded and all output flushed.
    Success = 1,
    /// All input was consumed; call again with more.
    NeedsMoreInput = 2,
    /// The output buffer is full; call again with more room.
    NeedsMoreOutput = 3,
}

// ─────────────────────────────────────────────────────────────────────────────
// Error codes
// ─────────────────────────────────────────────────────────────────────────────

/// Decoder error codes. Every error is terminal for its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrotliError {
    /// Input ended inside a stream or meta-block header.
    TruncatedHeader,
    /// Prefix code description is malformed, over-subscribed or incomplete.
    InvalidHuffmanCode,
    /// Block-type count or block-count code is out of range.
    InvalidBlockCount,
    /// Context map run-length or value out of range.
    InvalidContextMap,
    /// Context mode tag outside 0..=3.
    InvalidContextMode,
    /// Static dictionary length class, index or transform out of range.
    InvalidDictionaryReference,
    /// Backward distance is zero or beyond both window and dictionary.
    InvalidDistance,
    /// Copy length of zero or insert length beyond the meta-block.
    InvalidLength,
    /// Commands produce a different byte count than the meta-block declares,
    /// or the input ends inside a meta-block body.
    LengthMismatch,
    /// API called out of order (after success, or dictionary set too late).
    InvalidUsage,
    /// Catch-all for malformed data with no more specific code.
    Corrupt,
    /// Window-bits field decodes to a reserved value.
    InvalidWindowBits,
    /// Meta-block length uses more nibbles than needed.
    ExuberantNibble,
    /// A reserved bit is set.
    ReservedBitSet,
    /// Padding bits before a byte boundary are not zero.
    NonZeroPadding,
    /// An allocation hook returned null or a misaligned block.
    AllocationFailed,
    /// Inconsistent arguments (e.g. only one allocation hook).
    InvalidParameter,
    /// One-shot output buffer too small for the decoded data.
    OutputTooSmall,
}

impl BrotliError {
    /// Stable, human-readable error name.
    pub fn error_name(&self) -> &'static str {
        match self {
            BrotliError::TruncatedHeader => "ERROR_truncated_header",
            BrotliError::InvalidHuffmanCode => "ERROR_invalid_huffman_code",
            BrotliError::InvalidBlockCount => "ERROR_invalid_block_count",
            BrotliError::InvalidContextMap => "ERROR_invalid_context_map",
            BrotliError::InvalidContextMode => "ERROR_invalid_context_mode",
            BrotliError::InvalidDictionaryReference => "ERROR_invalid_dictionary_reference",
            BrotliError::InvalidDistance => "ERROR_invalid_distance",
            BrotliError::InvalidLength => "ERROR_invalid_length",
            BrotliError::LengthMismatch => "ERROR_length_mismatch",
            BrotliError::InvalidUsage => "ERROR_invalid_usage",
            BrotliError::Corrupt => "ERROR_corrupt",
            BrotliError::InvalidWindowBits => "ERROR_invalid_window_bits",
            BrotliError::ExuberantNibble => "ERROR_exuberant_nibble",
            BrotliError::ReservedBitSet => "ERROR_reserved_bit_set",
            BrotliError::NonZeroPadding => "ERROR_nonzero_padding",
            BrotliError::AllocationFailed => "ERROR_allocation_failed",
            BrotliError::InvalidParameter => "ERROR_invalid_parameter",
            BrotliError::OutputTooSmall => "ERROR_output_too_small",
        }
    }
}

impl fmt::Display for BrotliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_name())
    }
}

impl std::error::Error for BrotliError {}

// ─────────────────────────────────────────────────────────────────────────────
// Internal control flow
// ─────────────────────────────────────────────────────────────────────────────

/// Why a decoding step stopped short.
///
/// Pauses are not errors: the step left the session in a state from which an
/// identical call with more input (or output room) continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    NeedsMoreInput,
    NeedsMoreOutput,
    Error(BrotliError),
}

impl From<BrotliError> for Interrupt {
    #[inline]
    fn from(e: BrotliError) -> Self {
        Interrupt::Error(e)
    }
}

/// Result of one resumable decoding step.
pub type Step<T> = Result<T, Interrupt>;

// ─────────────────────────────────────────────────────────────────────────────
// State-machine stages
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level decoder stage. Every variant is a legal suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeStage {
    /// Stream header (window bits) not read yet.
    #[default]
    Uninitialized,
    /// Before the ISLAST bit of the next meta-block.
    MetaBlockBegin,
    /// Inside the meta-block header fields.
    MetaBlockHeader,
    /// Copying a stored (uncompressed) meta-block body.
    Uncompressed,
    /// Skipping a metadata meta-block body.
    Metadata,
    /// Reading block-type schedules, context maps and tree groups.
    TreesAndContextMaps,
    /// Decoding insert-and-copy commands.
    MainLoop,
    /// Meta-block body complete; flush and move on.
    MetaBlockDone,
    /// ISLAST meta-block finished; draining output.
    Done,
    /// Terminal failure.
    Error,
}

/// Position inside the meta-block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum HeaderStage {
    #[default]
    IsLastEmpty,
    Nibbles,
    Size,
    MetadataReserved,
    MetadataBytes,
    MetadataSize,
    Uncompressed,
}

/// Position inside the compressed meta-block prologue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TreesStage {
    /// Block-type count for class `0..3` (literal, command, distance).
    #[default]
    NumBlockTypes,
    BlockTypeCode,
    BlockCountCode,
    FirstBlockCount,
    DistanceParams,
    ContextModes,
    LiteralContextMap,
    DistanceContextMap,
    LiteralTrees,
    CommandTrees,
    DistanceTrees,
}

/// Position inside the command loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum CommandStage {
    #[default]
    Begin,
    CommandExtra,
    InsertLiterals,
    ReadDistance,
    CopyWindow,
    CopyDictionary,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixed prefix tables
// ─────────────────────────────────────────────────────────────────────────────

/// `(extra bits, base)` for the 24 insert-length codes.
pub(crate) const INSERT_LENGTH_PREFIX: [(u32, u32); 24] = [
    (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (1, 6), (1, 8),
    (2, 10), (2, 14), (3, 18), (3, 26), (4, 34), (4, 50), (5, 66), (5, 98),
    (6, 130), (7, 194), (8, 322), (9, 578), (10, 1090), (12, 2114), (14, 6210), (24, 22594),
];

/// `(extra bits, base)` for the 24 copy-length codes.
pub(crate) const COPY_LENGTH_PREFIX: [(u32, u32); 24] = [
    (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 9),
    (1, 10), (1, 12), (2, 14), (2, 18), (3, 22), (3, 30), (4, 38), (4, 54),
    (5, 70), (5, 102), (6, 134), (7, 198), (8, 326), (9, 582), (10, 1094), (24, 2118),
];

/// `(base, extra bits)` for the 26 block-count codes.
pub(crate) const BLOCK_LENGTH_PREFIX: [(u32, u32); 26] = [
    (1, 2), (5, 2), (9, 2), (13, 2), (17, 3), (25, 3), (33, 3), (41, 3),
    (49, 4), (65, 4), (81, 4), (97, 4), (113, 5), (145, 5), (177, 5), (209, 5),
    (241, 6), (305, 6), (369, 7), (497, 8), (753, 9), (1265, 10), (2289, 11), (4337, 12),
    (8433, 13), (16625, 24),
];

/// Insert/copy code bases for each 64-symbol cell of the command alphabet:
/// `(insert code base, copy code base, implicit zero distance)`.
const COMMAND_CELLS: [(u16, u16, bool); 11] = [
    (0, 0, true),
    (0, 8, true),
    (0, 0, false),
    (0, 8, false),
    (8, 0, false),
    (8, 8, false),
    (0, 16, false),
    (16, 0, false),
    (8, 16, false),
    (16, 8, false),
    (16, 16, false),
];

/// Alphabet sizes of the three per-meta-block code groups.
pub(crate) const NUM_LITERAL_SYMBOLS: usize = 256;
pub(crate) const NUM_COMMAND_SYMBOLS: usize = 704;
pub(crate) const NUM_BLOCK_COUNT_SYMBOLS: usize = 26;

/// A decoded insert-and-copy symbol, before extra bits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CommandCode {
    pub insert_code: u8,
    pub copy_code: u8,
    /// Distance code 0 is implied (no distance symbol is read).
    pub implicit_distance: bool,
}

impl CommandCode {
    /// Splits a command symbol (0..704) into its insert and copy codes.
    pub fn from_symbol(symbol: u16) -> Option<Self> {
        let (insert_base, copy_base, implicit) = *COMMAND_CELLS.get(usize::from(symbol >> 6))?;
        Some(CommandCode {
            insert_code: (insert_base + ((symbol >> 3) & 7)) as u8,
            copy_code: (copy_base + (symbol & 7)) as u8,
            implicit_distance: implicit,
        })
    }

    /// Total extra bits following the symbol.
    pub fn extra_bits(&self) -> u32 {
        INSERT_LENGTH_PREFIX[usize::from(self.insert_code)].0
            + COPY_LENGTH_PREFIX[usize::from(self.copy_code)].0
    }

    /// Applies extra bits (insert extras in the low bits) to produce
    /// `(insert length, copy length)`.
    pub fn lengths(&self, extra: u64) -> (u32, u32) {
        let (i_bits, i_base) = INSERT_LENGTH_PREFIX[usize::from(self.insert_code)];
        let (_, c_base) = COPY_LENGTH_PREFIX[usize::from(self.copy_code)];
        let i_extra = (extra & ((1u64 << i_bits) - 1)) as u32;
        let c_extra = (extra >> i_bits) as u32;
        (i_base + i_extra, c_base + c_extra)
    }
}
