//! The 121 word transforms applied to static dictionary words.
//!
//! A transform wraps the base word in a fixed prefix and suffix and may
//! trim it or change its case first.

use crate::config::NUM_TRANSFORMS;

/// What happens to the base word between prefix and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Identity,
    /// Drop the last `n` bytes (1..=9).
    OmitLast(u8),
    /// Drop the first `n` bytes (1..=9).
    OmitFirst(u8),
    UppercaseFirst,
    UppercaseAll,
}

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub prefix: &'static [u8],
    pub kind: TransformKind,
    pub suffix: &'static [u8],
}

const fn t(prefix: &'static [u8], kind: TransformKind, suffix: &'static [u8]) -> Transform {
    Transform { prefix, kind, suffix }
}

pub static TRANSFORMS: [Transform; NUM_TRANSFORMS] = [
    t(b"", TransformKind::Identity, b""),
    t(b"", TransformKind::Identity, b" "),
    t(b" ", TransformKind::Identity, b" "),
    t(b"", TransformKind::OmitFirst(1), b""),
    t(b"", TransformKind::UppercaseFirst, b" "),
    t(b"", TransformKind::Identity, b" the "),
    t(b" ", TransformKind::Identity, b""),
    t(b"s ", TransformKind::Identity, b" "),
    t(b"", TransformKind::Identity, b" of "),
    t(b"", TransformKind::UppercaseFirst, b""),
    t(b"", TransformKind::Identity, b" and "),
    t(b"", TransformKind::OmitFirst(2), b""),
    t(b"", TransformKind::OmitLast(1), b""),
    t(b", ", TransformKind::Identity, b" "),
    t(b"", TransformKind::Identity, b", "),
    t(b" ", TransformKind::UppercaseFirst, b" "),
    t(b"", TransformKind::Identity, b" in "),
    t(b"", TransformKind::Identity, b" to "),
    t(b"e ", TransformKind::Identity, b" "),
    t(b"", TransformKind::Identity, b"\""),
    t(b"", TransformKind::Identity, b"."),
    t(b"", TransformKind::Identity, b"\">"),
    t(b"", TransformKind::Identity, b"\n"),
    t(b"", TransformKind::OmitLast(3), b""),
    t(b"", TransformKind::Identity, b"]"),
    t(b"", TransformKind::Identity, b" for "),
    t(b"", TransformKind::OmitFirst(3), b""),
    t(b"", TransformKind::OmitLast(2), b""),
    t(b"", TransformKind::Identity, b" a "),
    t(b"", TransformKind::Identity, b" that "),
    t(b" ", TransformKind::UppercaseFirst, b""),
    t(b"", TransformKind::Identity, b". "),
    t(b".", TransformKind::Identity, b""),
    t(b" ", TransformKind::Identity, b", "),
    t(b"", TransformKind::OmitFirst(4), b""),
    t(b"", TransformKind::Identity, b" with "),
    t(b"", TransformKind::Identity, b"'"),
    t(b"", TransformKind::Identity, b" from "),
    t(b"", TransformKind::Identity, b" by "),
    t(b"", TransformKind::OmitFirst(5), b""),
    t(b"", TransformKind::OmitFirst(6), b""),
    t(b" the ", TransformKind::Identity, b""),
    t(b"", TransformKind::OmitLast(4), b""),
    t(b"", TransformKind::Identity, b". The "),
    t(b"", TransformKind::UppercaseAll, b""),
    t(b"", TransformKind::Identity, b" on "),
    t(b"", TransformKind::Identity, b" as "),
    t(b"", TransformKind::Identity, b" is "),
    t(b"", TransformKind::OmitLast(7), b""),
    t(b"", TransformKind::OmitLast(1), b"ing "),
    t(b"", TransformKind::Identity, b"\n\t"),
    t(b"", TransformKind::Identity, b":"),
    t(b" ", TransformKind::Identity, b". "),
    t(b"", TransformKind::Identity, b"ed "),
    t(b"", TransformKind::OmitFirst(9), b""),
    t(b"", TransformKind::OmitFirst(7), b""),
    t(b"", TransformKind::OmitLast(6), b""),
    t(b"", TransformKind::Identity, b"("),
    t(b"", TransformKind::UppercaseFirst, b", "),
    t(b"", TransformKind::OmitLast(8), b""),
    t(b"", TransformKind::Identity, b" at "),
    t(b"", TransformKind::Identity, b"ly "),
    t(b" the ", TransformKind::Identity, b" of "),
    t(b"", TransformKind::OmitLast(5), b""),
    t(b"", TransformKind::OmitLast(9), b""),
    t(b" ", TransformKind::UppercaseFirst, b", "),
    t(b"", TransformKind::UppercaseFirst, b"\""),
    t(b".", TransformKind::Identity, b"("),
    t(b"", TransformKind::UppercaseAll, b" "),
    t(b"", TransformKind::UppercaseFirst, b"\">"),
    t(b"", TransformKind::Identity, b"=\""),
    t(b" ", TransformKind::Identity, b"."),
    t(b".com/", TransformKind::Identity, b""),
    t(b" the ", TransformKind::Identity, b" of the "),
    t(b"", TransformKind::UppercaseFirst, b"'"),
    t(b"", TransformKind::Identity, b". This "),
    t(b"", TransformKind::Identity, b","),
    t(b".", TransformKind::Identity, b" "),
    t(b"", TransformKind::UppercaseFirst, b"("),
    t(b"", TransformKind::UppercaseFirst, b"."),
    t(b"", TransformKind::Identity, b" not "),
    t(b" ", TransformKind::Identity, b"=\""),
    t(b"", TransformKind::Identity, b"er "),
    t(b" ", TransformKind::UppercaseAll, b" "),
    t(b"", TransformKind::Identity, b"al "),
    t(b" ", TransformKind::UppercaseAll, b""),
    t(b"", TransformKind::Identity, b"='"),
    t(b"", TransformKind::UppercaseAll, b"\""),
    t(b"", TransformKind::UppercaseFirst, b". "),
    t(b" ", TransformKind::Identity, b"("),
    t(b"", TransformKind::Identity, b"ful "),
    t(b" ", TransformKind::UppercaseFirst, b". "),
    t(b"", TransformKind::Identity, b"ive "),
    t(b"", TransformKind::Identity, b"less "),
    t(b"", TransformKind::UppercaseAll, b"'"),
    t(b"", TransformKind::Identity, b"est "),
    t(b" ", TransformKind::UppercaseFirst, b"."),
    t(b"", TransformKind::UppercaseAll, b"\">"),
    t(b" ", TransformKind::Identity, b"='"),
    t(b"", TransformKind::UppercaseFirst, b","),
    t(b"", TransformKind::Identity, b"ize "),
    t(b"", TransformKind::UppercaseAll, b"."),
    t(b"\xc2\xa0", TransformKind::Identity, b""),
    t(b" ", TransformKind::Identity, b","),
    t(b"", TransformKind::UppercaseFirst, b"=\""),
    t(b"", TransformKind::UppercaseAll, b"=\""),
    t(b"", TransformKind::Identity, b"ous "),
    t(b"", TransformKind::UppercaseAll, b", "),
    t(b"", TransformKind::UppercaseFirst, b"='"),
    t(b" ", TransformKind::UppercaseFirst, b","),
    t(b" ", TransformKind::UppercaseAll, b"=\""),
    t(b" ", TransformKind::UppercaseAll, b", "),
    t(b"", TransformKind::UppercaseAll, b","),
    t(b"", TransformKind::UppercaseAll, b"("),
    t(b"", TransformKind::UppercaseAll, b". "),
    t(b" ", TransformKind::UppercaseAll, b"."),
    t(b"", TransformKind::UppercaseAll, b"='"),
    t(b" ", TransformKind::UppercaseAll, b". "),
    t(b" ", TransformKind::UppercaseFirst, b"=\""),
    t(b" ", TransformKind::UppercaseAll, b"='"),
    t(b" ", TransformKind::UppercaseFirst, b"='"),
];

impl Transform {
    /// Writes `prefix + transformed(word) + suffix` into `dst` and returns the
    /// number of bytes written. `dst` must hold at least
    /// `prefix.len() + word.len() + suffix.len()` bytes.
    pub fn apply(&self, word: &[u8], dst: &mut [u8]) -> usize {
        let mut n = self.prefix.len();
        dst[..n].copy_from_slice(self.prefix);

        let body = match self.kind {
            TransformKind::OmitFirst(k) => &word[usize::from(k).min(word.len())..],
            TransformKind::OmitLast(k) => &word[..word.len().saturating_sub(usize::from(k))],
            _ => word,
        };
        let start = n;
        dst[start..start + body.len()].copy_from_slice(body);
        n += body.len();

        match self.kind {
            TransformKind::UppercaseFirst if n > start => {
                to_upper_case(&mut dst[start..n]);
            }
            TransformKind::UppercaseAll => {
                let mut i = start;
                while i < n {
                    i += to_upper_case(&mut dst[i..n]);
                }
            }
            _ => {}
        }

        dst[n..n + self.suffix.len()].copy_from_slice(self.suffix);
        n + self.suffix.len()
    }
}

/// Upper-cases the character starting at `p[0]` with the format's
/// simplified rule and returns its width in bytes. Bytes past the end of
/// `p` are left alone.
fn to_upper_case(p: &mut [u8]) -> usize {
    if p[0] < 0xc0 {
        if p[0].is_ascii_lowercase() {
            p[0] ^= 32;
        }
        return 1;
    }
    if p[0] < 0xe0 {
        if let Some(b) = p.get_mut(1) {
            *b ^= 32;
        }
        return 2;
    }
    if let Some(b) = p.get_mut(2) {
        *b ^= 5;
    }
    3
}
