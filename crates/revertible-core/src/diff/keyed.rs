//! Identity-keyed array diffing.
//!
//! Elements of a `Vec<T: Identifiable>` carry a stable identity independent
//! of position, which makes the diff move-aware: a retained element that
//! changed position yields a move op resolved by identity at apply time,
//! never by raw index, because earlier removal/insertion ops have already
//! shifted positions by the time it runs.
//!
//! Replay order is fixed: removals (descending current positions), then
//! insertions (ascending previous positions), then moves (ascending target
//! positions), then nested element reversions through identity lenses.

use std::collections::HashMap;
use std::hash::Hash;

use crate::lens::Lens;
use crate::reversion::{Reversion, ReversionOp};
use crate::revertible::Revertible;

/// A stable, type-specific key distinguishing collection elements across
/// edits. Identities are assumed unique within one collection; on lookup
/// the first match wins.
pub trait Identifiable {
    type Id: Eq + Hash + Clone + Send + Sync + 'static;

    fn identity(&self) -> Self::Id;
}

// ── Ops ───────────────────────────────────────────────────────────────────

pub(crate) struct VecRemove {
    /// Positions in the current value, descending.
    pub(crate) positions: Vec<usize>,
}

impl<T: Send + Sync> ReversionOp<Vec<T>> for VecRemove {
    fn apply(&self, target: &mut Vec<T>) {
        for &pos in &self.positions {
            if pos < target.len() {
                target.remove(pos);
            }
        }
    }
}

pub(crate) struct VecInsert<T> {
    /// `(position in the previous value, element)`, ascending.
    pub(crate) inserts: Vec<(usize, T)>,
}

impl<T: Clone + Send + Sync> ReversionOp<Vec<T>> for VecInsert<T> {
    fn apply(&self, target: &mut Vec<T>) {
        for (pos, element) in &self.inserts {
            let pos = (*pos).min(target.len());
            target.insert(pos, element.clone());
        }
    }
}

pub(crate) struct VecMove<T: Identifiable> {
    pub(crate) id: T::Id,
    /// Position in the previous value.
    pub(crate) to: usize,
}

impl<T: Identifiable + Send + Sync> ReversionOp<Vec<T>> for VecMove<T> {
    fn apply(&self, target: &mut Vec<T>) {
        let Some(from) = target.iter().position(|e| e.identity() == self.id) else {
            return;
        };
        let element = target.remove(from);
        let to = self.to.min(target.len());
        target.insert(to, element);
    }
}

// ── Diff ──────────────────────────────────────────────────────────────────

fn identity_lens<T: Identifiable + 'static>(id: T::Id) -> Lens<Vec<T>, T> {
    let id_mut = id.clone();
    Lens::new(
        move |v: &Vec<T>| v.iter().find(|e| e.identity() == id),
        move |v: &mut Vec<T>| v.iter_mut().find(|e| e.identity() == id_mut),
    )
}

impl<T> Revertible for Vec<T>
where
    T: Identifiable + Revertible,
{
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous {
            return None;
        }

        let current_index: HashMap<T::Id, usize> = self
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.identity(), pos))
            .collect();
        let previous_index: HashMap<T::Id, usize> = previous
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.identity(), pos))
            .collect();

        let mut reversion = Reversion::new();

        // 1. Newly inserted elements are removed, highest position first.
        let mut removals: Vec<usize> = self
            .iter()
            .enumerate()
            .filter(|(_, e)| !previous_index.contains_key(&e.identity()))
            .map(|(pos, _)| pos)
            .collect();
        if !removals.is_empty() {
            removals.sort_unstable_by(|a, b| b.cmp(a));
            reversion.push(VecRemove {
                positions: removals,
            });
        }

        // 2. Deleted elements are re-inserted at their previous positions,
        //    lowest first.
        let inserts: Vec<(usize, T)> = previous
            .iter()
            .enumerate()
            .filter(|(_, e)| !current_index.contains_key(&e.identity()))
            .map(|(pos, e)| (pos, e.clone()))
            .collect();
        if !inserts.is_empty() {
            reversion.push(VecInsert { inserts });
        }

        // 3. Out-of-place elements move back, ascending by target position
        //    so already-settled prefixes stay put. Positions are tracked in
        //    the shape the buffer has after steps 1 and 2 have run, not in
        //    the raw snapshots: re-inserting deleted elements shifts
        //    retained ones, so a raw-index comparison misses displacements.
        let mut shaped: Vec<T::Id> = self
            .iter()
            .map(|e| e.identity())
            .filter(|id| previous_index.contains_key(id))
            .collect();
        for (pos, element) in previous.iter().enumerate() {
            let id = element.identity();
            if !current_index.contains_key(&id) {
                shaped.insert(pos.min(shaped.len()), id);
            }
        }
        for (prev_pos, element) in previous.iter().enumerate() {
            let id = element.identity();
            if shaped[prev_pos] != id {
                let from = shaped
                    .iter()
                    .position(|candidate| *candidate == id)
                    .unwrap_or(prev_pos);
                shaped.remove(from);
                shaped.insert(prev_pos, id.clone());
                reversion.push(VecMove::<T> { id, to: prev_pos });
            }
        }

        // 4. Retained elements with changed content get a nested reversion,
        //    projected through an identity lens.
        for element in self {
            let id = element.identity();
            if let Some(&prev_pos) = previous_index.get(&id) {
                if let Some(nested) = element.reversion_to(&previous[prev_pos]) {
                    reversion.extend(nested.project(&identity_lens(id)));
                }
            }
        }

        reversion.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        label: String,
    }

    impl Item {
        fn new(id: u64, label: &str) -> Self {
            Item {
                id,
                label: label.into(),
            }
        }
    }

    impl Identifiable for Item {
        type Id = u64;

        fn identity(&self) -> u64 {
            self.id
        }
    }

    impl Revertible for Item {
        fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
            let mut reverter = crate::Reverter::new();
            reverter.field(
                &self.label,
                &previous.label,
                Lens::field(|i: &Item| &i.label, |i: &mut Item| &mut i.label),
            );
            reverter.finish()
        }
    }

    fn round_trip(current: Vec<Item>, previous: Vec<Item>) {
        let reversion = current.reversion_to(&previous).unwrap();
        let mut value = current;
        reversion.apply(&mut value);
        assert_eq!(value, previous);
    }

    #[test]
    fn equal_arrays_produce_nothing() {
        let items = vec![Item::new(1, "a"), Item::new(2, "b")];
        assert!(items.reversion_to(&items.clone()).is_none());
    }

    #[test]
    fn insert_delete_and_move_together() {
        // id 1 deleted, id 4 inserted, id 3 retained but moved.
        let previous = vec![Item::new(1, "a"), Item::new(2, "b"), Item::new(3, "c")];
        let current = vec![Item::new(3, "c"), Item::new(2, "b"), Item::new(4, "d")];
        round_trip(current, previous);
    }

    #[test]
    fn pure_reorder() {
        let previous = vec![Item::new(1, "a"), Item::new(2, "b"), Item::new(3, "c")];
        let current = vec![Item::new(3, "c"), Item::new(1, "a"), Item::new(2, "b")];
        round_trip(current, previous);
    }

    #[test]
    fn moved_and_modified_element() {
        let previous = vec![Item::new(1, "one"), Item::new(2, "two"), Item::new(3, "three")];
        let current = vec![Item::new(2, "TWO"), Item::new(3, "three"), Item::new(1, "one")];
        round_trip(current, previous);
    }

    #[test]
    fn retained_element_displaced_by_reinsertions() {
        // id 2 sits at index 1 in both snapshots, but re-inserting the
        // deleted ids 1 and 3 shifts it; it still needs a move.
        let previous = vec![
            Item::new(1, "a"),
            Item::new(2, "b"),
            Item::new(3, "c"),
            Item::new(4, "d"),
        ];
        let current = vec![Item::new(4, "d"), Item::new(2, "b")];
        round_trip(current, previous);
    }

    #[test]
    fn grow_from_empty_and_shrink_to_empty() {
        round_trip(vec![Item::new(1, "a"), Item::new(2, "b")], vec![]);
        round_trip(vec![], vec![Item::new(1, "a"), Item::new(2, "b")]);
    }

    #[test]
    fn nested_edit_resolved_by_identity_not_index() {
        // The edited element also moved; the nested reversion must follow
        // the identity, not the index it had when the diff was computed.
        let previous = vec![Item::new(1, "keep"), Item::new(2, "old")];
        let current = vec![Item::new(2, "new"), Item::new(1, "keep")];
        round_trip(current, previous);
    }
}
