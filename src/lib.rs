// brotlir — streaming Brotli (RFC 7932) decompressor

pub mod config;
pub mod display;
pub mod memory;
pub mod bit_reader;
pub mod huffman;
pub mod context;
pub mod dictionary;
pub mod ring_buffer;
pub mod distance;
pub mod decode;
pub mod io;

#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants (decoder API 0.5.0) ────────────────────────────────────
pub const BROTLI_VERSION_MAJOR: u32 = 0;
pub const BROTLI_VERSION_MINOR: u32 = 5;
pub const BROTLI_VERSION_RELEASE: u32 = 0;
pub const BROTLI_VERSION_NUMBER: u32 =
    (BROTLI_VERSION_MAJOR << 24) | (BROTLI_VERSION_MINOR << 12) | BROTLI_VERSION_RELEASE;
pub const BROTLI_VERSION_STRING: &str = "0.5.0";

/// Returns the runtime version number, `major << 24 | minor << 12 | release`.
pub fn version_number() -> u32 {
    BROTLI_VERSION_NUMBER
}

/// Returns the runtime version string, e.g. `"0.5.0"`.
pub fn version_string() -> &'static str {
    BROTLI_VERSION_STRING
}

/// Size in bytes of a decoder session, excluding its heap buffers.
pub fn size_of_state() -> usize {
    core::mem::size_of::<decode::BrotliState<'static>>()
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use decode::{
    create_state, decompress_buffer, decompress_stream, decompress_to_vec, decompressed_size,
    destroy_state, BrotliError, BrotliResult, BrotliState, DecodeStage,
};
pub use io::Decompressor;
pub use memory::{BrotliAllocFunc, BrotliFreeFunc, CustomMem};
