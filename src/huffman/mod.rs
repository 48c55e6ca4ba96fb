//! Canonical prefix codes: table construction, lookup, and the resumable
//! reader for code descriptions.

pub mod reader;
pub mod table;

pub use reader::PrefixCodeReader;
pub use table::{HuffmanEntry, HuffmanTable};

/// Largest alphabet any prefix code in the format uses (insert-and-copy).
pub const MAX_ALPHABET_SIZE: usize = 704;

/// The prefix codes of one category (literal, command or distance) for a
/// meta-block, indexed by tree id from the context map.
#[derive(Debug, Default)]
pub struct HuffmanTreeGroup {
    pub alphabet_size: usize,
    pub trees: Vec<HuffmanTable>,
}

impl HuffmanTreeGroup {
    /// An empty group expecting `num_trees` codes over `alphabet_size` symbols.
    pub fn new(alphabet_size: usize, num_trees: usize) -> Self {
        HuffmanTreeGroup {
            alphabet_size,
            trees: Vec::with_capacity(num_trees),
        }
    }

    #[inline]
    pub fn tree(&self, index: usize) -> &HuffmanTable {
        &self.trees[index]
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
