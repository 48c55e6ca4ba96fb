//! Backward distances: the last-distance cache and distance code
//! translation (RFC 7932 section 4).

use crate::decode::types::BrotliError;

/// Distance codes below this index refer to the cache.
pub const NUM_SHORT_CODES: u32 = 16;

const SHORT_CODE_SLOT: [usize; 16] = [0, 1, 2, 3, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
const SHORT_CODE_DELTA: [i64; 16] = [0, 0, 0, 0, -1, 1, -2, 2, -3, 3, -1, 1, -2, 2, -3, 3];

/// The four most recent distances, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceCache {
    recent: [usize; 4],
}

impl Default for DistanceCache {
    fn default() -> Self {
        DistanceCache { recent: [4, 11, 15, 16] }
    }
}

impl DistanceCache {
    /// Most recent distance first.
    pub fn recent(&self) -> [usize; 4] {
        self.recent
    }

    /// Resolves short code `code` (0..16) against the cache.
    pub fn short_code(&self, code: u32) -> Result<usize, BrotliError> {
        let i = code as usize;
        let d = self.recent[SHORT_CODE_SLOT[i]] as i64 + SHORT_CODE_DELTA[i];
        if d <= 0 {
            return Err(BrotliError::InvalidDistance);
        }
        Ok(d as usize)
    }

    /// Records a distance as the most recent.
    pub fn push(&mut self, distance: usize) {
        self.recent = [distance, self.recent[0], self.recent[1], self.recent[2]];
    }
}

/// Per-meta-block distance code parameters (NPOSTFIX, NDIRECT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DistanceParams {
    pub postfix_bits: u32,
    pub num_direct: u32,
}

impl DistanceParams {
    pub fn new(postfix_bits: u32, num_direct: u32) -> Self {
        DistanceParams { postfix_bits, num_direct }
    }

    /// Size of the distance alphabet.
    pub fn alphabet_size(&self) -> usize {
        (NUM_SHORT_CODES + self.num_direct + (48 << self.postfix_bits)) as usize
    }

    /// Extra bits following distance symbol `code`.
    pub fn extra_bits(&self, code: u32) -> u32 {
        if code < NUM_SHORT_CODES + self.num_direct {
            return 0;
        }
        1 + ((code - self.num_direct - NUM_SHORT_CODES) >> (self.postfix_bits + 1))
    }

    /// Distance for a direct or postfix code (`code >= 16`) with its extra bits.
    pub fn distance(&self, code: u32, extra: u32) -> usize {
        debug_assert!(code >= NUM_SHORT_CODES);
        if code < NUM_SHORT_CODES + self.num_direct {
            return (code - NUM_SHORT_CODES + 1) as usize;
        }
        let rel = u64::from(code - self.num_direct - NUM_SHORT_CODES);
        let postfix_mask = (1u64 << self.postfix_bits) - 1;
        let ndistbits = 1 + (rel >> (self.postfix_bits + 1));
        let hcode = rel >> self.postfix_bits;
        let lcode = rel & postfix_mask;
        let offset = ((2 + (hcode & 1)) << ndistbits) - 4;
        let d = ((offset + u64::from(extra)) << self.postfix_bits)
            + lcode
            + u64::from(self.num_direct)
            + 1;
        d as usize
    }
}
