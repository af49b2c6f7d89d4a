//! Set diffing.
//!
//! Sets carry membership only: no positions, no moves, no nested edits.
//! The reversion is the symmetric difference, as removals of elements that
//! joined and insertions of elements that left.

use std::collections::HashSet;
use std::hash::Hash;

use crate::reversion::{Reversion, ReversionOp};
use crate::revertible::Revertible;

struct SetRemove<T> {
    values: Vec<T>,
}

impl<T: Eq + Hash + Send + Sync> ReversionOp<HashSet<T>> for SetRemove<T> {
    fn apply(&self, target: &mut HashSet<T>) {
        for value in &self.values {
            target.remove(value);
        }
    }
}

struct SetInsert<T> {
    values: Vec<T>,
}

impl<T: Eq + Hash + Clone + Send + Sync> ReversionOp<HashSet<T>> for SetInsert<T> {
    fn apply(&self, target: &mut HashSet<T>) {
        for value in &self.values {
            target.insert(value.clone());
        }
    }
}

impl<T> Revertible for HashSet<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous {
            return None;
        }

        let mut reversion = Reversion::new();

        let joined: Vec<T> = self.difference(previous).cloned().collect();
        if !joined.is_empty() {
            reversion.push(SetRemove { values: joined });
        }

        let left: Vec<T> = previous.difference(self).cloned().collect();
        if !left.is_empty() {
            reversion.push(SetInsert { values: left });
        }

        reversion.into_option()
    }
}
