//! A recorded history entry: one reverse patch, one forward patch, and an
//! optional batch-boundary tag.

use revertible_core::Reversion;

#[derive(Debug)]
pub(crate) struct ReversionAction<Root, T> {
    /// Rewinds current → previous.
    pub(crate) undo: Reversion<Root>,
    /// Replays previous → current.
    pub(crate) redo: Reversion<Root>,
    /// Opaque batch-boundary label, if one was set.
    pub(crate) tag: Option<T>,
}

impl<Root, T> ReversionAction<Root, T> {
    /// Swaps the undo/redo roles, keeping the tag.
    pub(crate) fn invert(self) -> Self {
        ReversionAction {
            undo: self.redo,
            redo: self.undo,
            tag: self.tag,
        }
    }
}
