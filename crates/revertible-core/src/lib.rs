//! Structural reversion primitives.
//!
//! A [`Reversion`] is a composable, applyable description of how to turn a
//! value back into a previously-known state. This crate holds the pure part
//! of the engine: per-shape minimal-diff algorithms, the lens machinery that
//! lifts a reversion computed for a nested field into a reversion for its
//! containing value, and the [`Reverter`] accumulator aggregate types use to
//! report their tracked fields.
//!
//! Everything here is synchronous and total: diffing two same-shaped values
//! cannot fail, and applying a reversion to an in-memory value cannot fail.
//! History bookkeeping lives in the `revertible` crate on top of this one.

pub mod diff;
pub mod lens;
pub mod reverter;
pub mod reversion;
pub mod revertible;

pub use diff::bytes::ByteBuf;
pub use diff::keyed::Identifiable;
pub use lens::Lens;
pub use reverter::Reverter;
pub use reversion::Reversion;
pub use revertible::Revertible;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
