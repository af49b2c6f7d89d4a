//! Dictionary diffing.
//!
//! For a dictionary the key is the identity, so retained entries can never
//! change identity and there is nothing to move in a `HashMap`. An
//! `IndexMap` additionally carries insertion order, which makes positions
//! meaningful again: retained keys that changed index move back to their
//! previous index, resolved by key at apply time.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::lens::Lens;
use crate::reversion::{Reversion, ReversionOp};
use crate::revertible::Revertible;

/// Key bounds shared by both dictionary shapes.
pub trait MapKey: Eq + Hash + Clone + Send + Sync + 'static {}

impl<K: Eq + Hash + Clone + Send + Sync + 'static> MapKey for K {}

// ── HashMap ───────────────────────────────────────────────────────────────

struct MapRemove<K> {
    keys: Vec<K>,
}

impl<K: MapKey, V: Send + Sync> ReversionOp<HashMap<K, V>> for MapRemove<K> {
    fn apply(&self, target: &mut HashMap<K, V>) {
        for key in &self.keys {
            target.remove(key);
        }
    }
}

struct MapInsert<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: MapKey, V: Clone + Send + Sync> ReversionOp<HashMap<K, V>> for MapInsert<K, V> {
    fn apply(&self, target: &mut HashMap<K, V>) {
        for (key, value) in &self.entries {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn map_value_lens<K: MapKey, V: 'static>(key: K) -> Lens<HashMap<K, V>, V> {
    let key_mut = key.clone();
    Lens::new(
        move |m: &HashMap<K, V>| m.get(&key),
        move |m: &mut HashMap<K, V>| m.get_mut(&key_mut),
    )
}

impl<K, V> Revertible for HashMap<K, V>
where
    K: MapKey,
    V: Revertible,
{
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous {
            return None;
        }

        let mut reversion = Reversion::new();

        // 1. Keys only in the current value are removed.
        let removals: Vec<K> = self
            .keys()
            .filter(|k| !previous.contains_key(*k))
            .cloned()
            .collect();
        if !removals.is_empty() {
            reversion.push(MapRemove { keys: removals });
        }

        // 2. Keys deleted since `previous` are re-inserted.
        let inserts: Vec<(K, V)> = previous
            .iter()
            .filter(|(k, _)| !self.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !inserts.is_empty() {
            reversion.push(MapInsert { entries: inserts });
        }

        // 3. Retained keys with changed values get nested reversions.
        for (key, current_value) in self {
            if let Some(previous_value) = previous.get(key) {
                if let Some(nested) = current_value.reversion_to(previous_value) {
                    reversion.extend(nested.project(&map_value_lens(key.clone())));
                }
            }
        }

        reversion.into_option()
    }
}

// ── IndexMap ──────────────────────────────────────────────────────────────

struct IndexedRemove {
    /// Positions in the current value, descending.
    positions: Vec<usize>,
}

impl<K: MapKey, V: Send + Sync> ReversionOp<IndexMap<K, V>> for IndexedRemove {
    fn apply(&self, target: &mut IndexMap<K, V>) {
        for &pos in &self.positions {
            if pos < target.len() {
                target.shift_remove_index(pos);
            }
        }
    }
}

struct IndexedInsert<K, V> {
    /// `(position in the previous value, key, value)`, ascending.
    inserts: Vec<(usize, K, V)>,
}

impl<K: MapKey, V: Clone + Send + Sync> ReversionOp<IndexMap<K, V>> for IndexedInsert<K, V> {
    fn apply(&self, target: &mut IndexMap<K, V>) {
        for (pos, key, value) in &self.inserts {
            let pos = (*pos).min(target.len());
            target.shift_insert(pos, key.clone(), value.clone());
        }
    }
}

struct IndexedMove<K> {
    key: K,
    /// Position in the previous value.
    to: usize,
}

impl<K: MapKey, V: Send + Sync> ReversionOp<IndexMap<K, V>> for IndexedMove<K> {
    fn apply(&self, target: &mut IndexMap<K, V>) {
        if target.is_empty() {
            return;
        }
        if let Some(from) = target.get_index_of(&self.key) {
            let to = self.to.min(target.len() - 1);
            target.move_index(from, to);
        }
    }
}

fn indexed_value_lens<K: MapKey, V: 'static>(key: K) -> Lens<IndexMap<K, V>, V> {
    let key_mut = key.clone();
    Lens::new(
        move |m: &IndexMap<K, V>| m.get(&key),
        move |m: &mut IndexMap<K, V>| m.get_mut(&key_mut),
    )
}

impl<K, V> Revertible for IndexMap<K, V>
where
    K: MapKey,
    V: Revertible,
{
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
        if self == previous && self.iter().zip(previous).all(|(a, b)| a.0 == b.0) {
            return None;
        }

        let mut reversion = Reversion::new();

        // 1. Entries only in the current value are removed, highest
        //    position first.
        let mut removals: Vec<usize> = self
            .keys()
            .enumerate()
            .filter(|(_, k)| !previous.contains_key(*k))
            .map(|(pos, _)| pos)
            .collect();
        if !removals.is_empty() {
            removals.sort_unstable_by(|a, b| b.cmp(a));
            reversion.push(IndexedRemove {
                positions: removals,
            });
        }

        // 2. Deleted entries are re-inserted at their previous positions,
        //    lowest first.
        let inserts: Vec<(usize, K, V)> = previous
            .iter()
            .enumerate()
            .filter(|(_, (k, _))| !self.contains_key(*k))
            .map(|(pos, (k, v))| (pos, k.clone(), v.clone()))
            .collect();
        if !inserts.is_empty() {
            reversion.push(IndexedInsert { inserts });
        }

        // 3. Out-of-place keys move back, ascending by target position.
        //    Positions are tracked in the shape the map has after steps 1
        //    and 2 have run: re-inserted entries shift retained keys, so a
        //    raw-index comparison misses displacements.
        let mut shaped: Vec<&K> = self
            .keys()
            .filter(|k| previous.contains_key(*k))
            .collect();
        for (pos, key) in previous.keys().enumerate() {
            if !self.contains_key(key) {
                shaped.insert(pos.min(shaped.len()), key);
            }
        }
        for (prev_pos, key) in previous.keys().enumerate() {
            if shaped[prev_pos] != key {
                let from = shaped
                    .iter()
                    .position(|candidate| *candidate == key)
                    .unwrap_or(prev_pos);
                shaped.remove(from);
                shaped.insert(prev_pos, key);
                reversion.push(IndexedMove {
                    key: key.clone(),
                    to: prev_pos,
                });
            }
        }

        // 4. Retained keys with changed values get nested reversions.
        for (key, current_value) in self {
            if let Some(previous_value) = previous.get(key) {
                if let Some(nested) = current_value.reversion_to(previous_value) {
                    reversion.extend(nested.project(&indexed_value_lens(key.clone())));
                }
            }
        }

        reversion.into_option()
    }
}
