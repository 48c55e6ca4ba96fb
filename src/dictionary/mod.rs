//! The built-in static dictionary (RFC 7932 section 8 and appendix A).
//!
//! Words of length 4..=24 are stored back to back, grouped by length. A
//! backward distance that reaches past everything decoded so far selects a
//! word and a transform instead of window bytes.

pub mod transform;

use crate::config::{MAX_TRANSFORMED_WORD_LENGTH, NUM_TRANSFORMS};
use crate::decode::types::BrotliError;

pub use transform::{Transform, TransformKind, TRANSFORMS};

/// Raw dictionary bytes, shared read-only by every session.
pub static DICTIONARY: &[u8; 122_784] = include_bytes!("dictionary.bin");

pub const MIN_WORD_LENGTH: usize = 4;
pub const MAX_WORD_LENGTH: usize = 24;

/// Byte offset of the first word of each length.
pub const OFFSETS_BY_LENGTH: [u32; 25] = [
    0, 0, 0, 0, 0, 4096, 9216, 21504, 35840, 44032, 53248, 63488, 74752, 87040, 93696, 100864,
    104704, 106752, 108928, 113536, 115968, 118528, 119872, 121280, 122016,
];

/// log2 of the number of words of each length.
pub const SIZE_BITS_BY_LENGTH: [u8; 25] = [
    0, 0, 0, 0, 10, 10, 11, 11, 10, 10, 10, 10, 10, 9, 9, 8, 7, 7, 8, 7, 7, 6, 6, 5, 5,
];

/// A resolved dictionary reference: base word plus transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryRef {
    pub length: usize,
    pub index: usize,
    pub transform: usize,
}

impl DictionaryRef {
    /// Splits a word id (distance past the window, minus one) for a copy
    /// of `length` bytes.
    ///
    /// Lengths outside 4..=24 and transform ids past the table yield
    /// `InvalidDistance`: the distance addresses neither window nor
    /// dictionary.
    pub fn from_word_id(length: usize, word_id: usize) -> Result<Self, BrotliError> {
        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length) {
            return Err(BrotliError::InvalidDistance);
        }
        let bits = SIZE_BITS_BY_LENGTH[length];
        let index = word_id & ((1usize << bits) - 1);
        let transform = word_id >> bits;
        if transform >= NUM_TRANSFORMS {
            return Err(BrotliError::InvalidDistance);
        }
        Ok(DictionaryRef { length, index, transform })
    }
}

/// Returns base word `index` of length `length`.
pub fn word(length: usize, index: usize) -> Result<&'static [u8], BrotliError> {
    if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length)
        || index >> SIZE_BITS_BY_LENGTH[length] != 0
    {
        return Err(BrotliError::InvalidDictionaryReference);
    }
    let start = OFFSETS_BY_LENGTH[length] as usize + index * length;
    DICTIONARY
        .get(start..start + length)
        .ok_or(BrotliError::InvalidDictionaryReference)
}

/// Expands word `index` of length class `length` through transform
/// `transform_id` into `dst`, returning the number of bytes written.
pub fn expand(
    length: usize,
    index: usize,
    transform_id: usize,
    dst: &mut [u8; MAX_TRANSFORMED_WORD_LENGTH],
) -> Result<usize, BrotliError> {
    let base = word(length, index)?;
    let transform = TRANSFORMS
        .get(transform_id)
        .ok_or(BrotliError::InvalidDictionaryReference)?;
    Ok(transform.apply(base, dst))
}
