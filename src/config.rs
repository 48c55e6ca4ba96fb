// config.rs — Compile-time configuration constants.
//
// Stream-format limits come from RFC 7932; the remaining values are tuning
// knobs for this implementation. Runtime overrides are limited to the
// diagnostic display level (see `display::init_display_level_from_env`).

// Smallest and largest sliding-window exponent a stream header may declare.
// The window holds `(1 << WBITS) - 16` bytes of history.
pub const WINDOW_BITS_MIN: u32 = 10;
pub const WINDOW_BITS_MAX: u32 = 24;

// Bytes of the ring buffer that can never be referenced by a backward
// distance. Maximum distance is `(1 << WBITS) - WINDOW_GAP`.
pub const WINDOW_GAP: usize = 16;

// Number of bits resolved by the first-level Huffman lookup table.
// Longer codes continue into a second-level table.
pub const HUFFMAN_ROOT_BITS: u32 = 8;

// Longest code length a prefix code may assign.
pub const MAX_CODE_LENGTH: u32 = 15;

// Longest code length of the code-length code (the code that encodes the
// per-symbol lengths of a complex prefix code).
pub const MAX_CODE_LENGTH_CODE_LENGTH: u32 = 5;

// Size of the static dictionary transform table.
pub const NUM_TRANSFORMS: usize = 121;

// Upper bound on a single dictionary word after its transform is applied:
// longest base word (24) plus the longest prefix and suffix.
pub const MAX_TRANSFORMED_WORD_LENGTH: usize = 64;

// Internal input buffer size of the `io::Decompressor` read adapter.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

// Default diagnostic verbosity: 0 = silent, 1 = errors (debug builds only),
// 4 = per-meta-block tracing. Overridden by BROTLI_DISPLAY_LEVEL.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 1;

// Name of the environment variable read by `init_display_level_from_env`.
pub const DISPLAY_LEVEL_ENV: &str = "BROTLI_DISPLAY_LEVEL";
