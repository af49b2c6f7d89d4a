//! Undo/redo history on top of the structural reversion engine.
//!
//! The caller mutates a value and hands the new state to a
//! [`VersioningController`], which diffs it against its live reference
//! snapshot, records the forward and reverse patches as one history action
//! and keeps the reference in lock-step. `undo`/`redo` replay those
//! patches, moving actions between the LIFO stacks of the current scope.
//! Rapid bursts of appends can be coalesced into a single recorded change
//! per quiescence window.
//!
//! Diff/patch primitives are re-exported from `revertible-core`.

mod action;
mod binding;
mod coalesce;

pub mod controller;
pub mod error;
pub mod stack;

pub use controller::VersioningController;
pub use error::RevertError;
pub use stack::HistoryStack;

pub use revertible_core::{ByteBuf, Identifiable, Lens, Reversion, Reverter, Revertible};
