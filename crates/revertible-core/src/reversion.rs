//! Reversions: applyable, composable units of reverse state change.
//!
//! A [`Reversion`] carries everything needed to rewind a value in place,
//! including any captured prior data. It is immutable once built. Composite
//! reversions hold an ordered op list and apply the ops in list order; the
//! per-shape differs in [`crate::diff`] rely on that ordering for index and
//! key validity.

use std::fmt;

use crate::lens::Lens;

// ── Op interface ──────────────────────────────────────────────────────────

/// A single reverse-edit primitive over a value of type `Root`.
pub(crate) trait ReversionOp<Root>: Send + Sync {
    fn apply(&self, target: &mut Root);
}

// ── Reversion ─────────────────────────────────────────────────────────────

/// An ordered collection of reverse edits restoring an earlier state of a
/// value of type `Root`.
pub struct Reversion<Root> {
    ops: Vec<Box<dyn ReversionOp<Root>>>,
}

impl<Root> Default for Reversion<Root> {
    fn default() -> Self {
        Reversion { ops: Vec::new() }
    }
}

impl<Root> fmt::Debug for Reversion<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reversion").field("ops", &self.ops.len()).finish()
    }
}

impl<Root: 'static> Reversion<Root> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(op: impl ReversionOp<Root> + 'static) -> Self {
        Reversion {
            ops: vec![Box::new(op)],
        }
    }

    pub(crate) fn push(&mut self, op: impl ReversionOp<Root> + 'static) {
        self.ops.push(Box::new(op));
    }

    pub(crate) fn extend(&mut self, other: Reversion<Root>) {
        self.ops.extend(other.ops);
    }

    /// `None` when no ops were collected, i.e. nothing changed.
    pub(crate) fn into_option(self) -> Option<Self> {
        if self.ops.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Rewinds `target` in place to the captured previous state.
    pub fn apply(&self, target: &mut Root) {
        for op in &self.ops {
            op.apply(target);
        }
    }

    /// Lifts this reversion into one over `Parent` by projecting every
    /// sub-edit through `lens` individually.
    pub fn project<Parent: 'static>(self, lens: &Lens<Parent, Root>) -> Reversion<Parent> {
        Reversion {
            ops: self
                .ops
                .into_iter()
                .map(|op| {
                    Box::new(Projected {
                        lens: lens.clone(),
                        op,
                    }) as Box<dyn ReversionOp<Parent>>
                })
                .collect(),
        }
    }
}

impl<Root: Clone + Send + Sync + 'static> Reversion<Root> {
    /// A reversion that restores the whole value by overwriting it.
    pub(crate) fn overwrite(previous: Root) -> Self {
        Reversion::single(Overwrite { value: previous })
    }
}

// ── Concrete ops ──────────────────────────────────────────────────────────

/// Whole-value overwrite; the fallback for scalars and sum-type case
/// changes.
pub(crate) struct Overwrite<T> {
    pub(crate) value: T,
}

impl<T: Clone + Send + Sync> ReversionOp<T> for Overwrite<T> {
    fn apply(&self, target: &mut T) {
        *target = self.value.clone();
    }
}

/// A child-typed op routed through a lens into its parent.
///
/// A lens that no longer resolves (case switched, element since removed)
/// has nothing left to restore, so the edit is skipped.
struct Projected<Parent, Child> {
    lens: Lens<Parent, Child>,
    op: Box<dyn ReversionOp<Child>>,
}

impl<Parent: 'static, Child: 'static> ReversionOp<Parent> for Projected<Parent, Child> {
    fn apply(&self, target: &mut Parent) {
        if let Some(child) = self.lens.resolve_mut(target) {
            self.op.apply(child);
        }
    }
}
