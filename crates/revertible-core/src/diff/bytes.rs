//! Positional byte-buffer diffing.
//!
//! Byte payloads wrap in [`ByteBuf`] because a positional impl on `Vec<u8>`
//! itself would overlap the identity-keyed `Vec<T>` impl. The newtype
//! derefs to `Vec<u8>`, so call sites stay close to plain vectors.
//!
//! Adjacent edits come out of the edit script as contiguous runs, so the
//! removal op drains whole ranges and the insertion op splices whole chunks
//! instead of shuffling single bytes.

use std::ops::{Deref, DerefMut, Range};

use crate::diff::script::sequence_edits;
use crate::reversion::{Reversion, ReversionOp};
use crate::revertible::Revertible;

/// A positional byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl ByteBuf {
    pub fn new() -> Self {
        ByteBuf(Vec::new())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteBuf {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBuf(bytes)
    }
}

impl From<&[u8]> for ByteBuf {
    fn from(bytes: &[u8]) -> Self {
        ByteBuf(bytes.to_vec())
    }
}

impl Deref for ByteBuf {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for ByteBuf {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

pub(crate) struct BinRemove {
    /// Half-open byte ranges into the current value, ascending.
    pub(crate) ranges: Vec<Range<usize>>,
}

impl ReversionOp<ByteBuf> for BinRemove {
    fn apply(&self, target: &mut ByteBuf) {
        for range in self.ranges.iter().rev() {
            if range.end <= target.len() {
                target.drain(range.clone());
            }
        }
    }
}

pub(crate) struct BinInsert {
    /// `(byte position in the previous value, chunk)`, ascending.
    pub(crate) inserts: Vec<(usize, Vec<u8>)>,
}

impl ReversionOp<ByteBuf> for BinInsert {
    fn apply(&self, target: &mut ByteBuf) {
        for (pos, chunk) in &self.inserts {
            let pos = (*pos).min(target.len());
            target.splice(pos..pos, chunk.iter().copied());
        }
    }
}

impl Revertible for ByteBuf {
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous {
            return None;
        }
        let edits = sequence_edits(&self.0, &previous.0);
        let mut reversion = Reversion::new();
        if !edits.removals.is_empty() {
            reversion.push(BinRemove {
                ranges: edits.removals,
            });
        }
        if !edits.insertions.is_empty() {
            reversion.push(BinInsert {
                inserts: edits.insertions,
            });
        }
        reversion.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(current: &[u8], previous: &[u8]) {
        let current = ByteBuf::from(current);
        let previous = ByteBuf::from(previous);
        let reversion = current.reversion_to(&previous).unwrap();
        let mut value = current;
        reversion.apply(&mut value);
        assert_eq!(value, previous);
    }

    #[test]
    fn equal_buffers_produce_nothing() {
        let buf = ByteBuf::from(&b"data"[..]);
        assert!(buf.reversion_to(&buf.clone()).is_none());
    }

    #[test]
    fn edits_round_trip() {
        round_trip(b"zaybecd", b"abcd");
        round_trip(b"abcd", b"zaybecd");
        round_trip(b"", b"payload");
        round_trip(b"payload", b"");
        round_trip(b"\x00\x01\x02\x03", b"\x00\xff\xff\x03");
    }

    #[test]
    fn contiguous_edit_is_one_range() {
        // One inserted block and one deleted block: exactly two ops, each
        // holding a single contiguous range.
        let current = ByteBuf::from(&b"headINSERTEDtail"[..]);
        let previous = ByteBuf::from(&b"headOLDtail"[..]);
        let reversion = current.reversion_to(&previous).unwrap();
        assert_eq!(reversion.len(), 2);
    }
}
