//! The resumable decoder: session state, stage machine and wrappers.

pub mod commands;
pub mod metablock;
pub mod oneshot;
pub mod state;
pub mod stream;
pub mod types;

pub use oneshot::{decompress_buffer, decompress_to_vec, decompressed_size};
pub use state::{create_state, destroy_state, BrotliState};
pub use stream::decompress_stream;
pub use types::{BrotliError, BrotliResult, DecodeStage};
