//! Positional string diffing.
//!
//! Strings are diffed as plain ordered char sequences; there is no identity
//! to track. The reversion is at most two ops: a removal set over the
//! current value (applied descending) and an insertion set positioned in
//! the previous value's index space (applied ascending, once removals have
//! reduced the buffer to the previous shape).

use std::ops::Range;

use crate::diff::script::sequence_edits;
use crate::reversion::{Reversion, ReversionOp};
use crate::revertible::Revertible;

/// Deletes char ranges from the current value, last range first.
pub(crate) struct StrRemove {
    /// Half-open char ranges, ascending.
    pub(crate) ranges: Vec<Range<usize>>,
}

impl ReversionOp<String> for StrRemove {
    fn apply(&self, target: &mut String) {
        for range in self.ranges.iter().rev() {
            if let Some(bytes) = char_range_to_bytes(target, range) {
                target.replace_range(bytes, "");
            }
        }
    }
}

/// Re-inserts chunks at their previous char positions, first chunk first.
pub(crate) struct StrInsert {
    /// `(char position in the previous value, chunk)`, ascending.
    pub(crate) inserts: Vec<(usize, String)>,
}

impl ReversionOp<String> for StrInsert {
    fn apply(&self, target: &mut String) {
        for (pos, chunk) in &self.inserts {
            if let Some(byte) = char_pos_to_byte(target, *pos) {
                target.insert_str(byte, chunk);
            }
        }
    }
}

/// Maps a char position to its byte offset; `None` if out of bounds.
fn char_pos_to_byte(s: &str, pos: usize) -> Option<usize> {
    if pos == 0 {
        return Some(0);
    }
    let mut count = 0usize;
    for (byte, _) in s.char_indices() {
        if count == pos {
            return Some(byte);
        }
        count += 1;
    }
    if count == pos {
        Some(s.len())
    } else {
        None
    }
}

fn char_range_to_bytes(s: &str, range: &Range<usize>) -> Option<Range<usize>> {
    let start = char_pos_to_byte(s, range.start)?;
    let end = char_pos_to_byte(s, range.end)?;
    Some(start..end)
}

impl Revertible for String {
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous {
            return None;
        }
        let current: Vec<char> = self.chars().collect();
        let prev: Vec<char> = previous.chars().collect();
        let edits = sequence_edits(&current, &prev);

        let mut reversion = Reversion::new();
        if !edits.removals.is_empty() {
            reversion.push(StrRemove {
                ranges: edits.removals,
            });
        }
        if !edits.insertions.is_empty() {
            reversion.push(StrInsert {
                inserts: edits
                    .insertions
                    .into_iter()
                    .map(|(pos, chunk)| (pos, chunk.into_iter().collect()))
                    .collect(),
            });
        }
        reversion.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(current: &str, previous: &str) {
        let current = current.to_string();
        let previous = previous.to_string();
        let reversion = current
            .reversion_to(&previous)
            .expect("values differ, a reversion must exist");
        let mut value = current.clone();
        reversion.apply(&mut value);
        assert_eq!(value, previous, "current={current:?}");
    }

    #[test]
    fn equal_strings_produce_nothing() {
        let s = String::from("same");
        assert!(s.reversion_to(&s.clone()).is_none());
    }

    #[test]
    fn insertions_are_removed() {
        // "abcd" grew into "zaybecd"; the removal set alone restores it.
        round_trip("zaybecd", "abcd");
    }

    #[test]
    fn removals_are_reinserted() {
        round_trip("abcd", "zaybecd");
    }

    #[test]
    fn mixed_edits_round_trip() {
        round_trip("the quick brown fox", "the slow brown dog");
        round_trip("", "something");
        round_trip("something", "");
        round_trip("abab", "baba");
    }

    #[test]
    fn multibyte_chars_round_trip() {
        round_trip("héllo wörld", "hello world");
        round_trip("ab🦀cd", "abcd");
        round_trip("abcd", "a🦀b🦀cd");
    }

    #[test]
    fn at_most_two_ops() {
        let current = String::from("zaybecd");
        let previous = String::from("abxd");
        let reversion = current.reversion_to(&previous).unwrap();
        assert!(reversion.len() <= 2);
    }
}
