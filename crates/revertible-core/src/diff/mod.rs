//! Per-shape minimal-diff algorithms.
//!
//! Each submodule implements [`crate::Revertible`] for one family of
//! shapes: scalars and std wrappers, positional sequences (strings, byte
//! buffers) and identity-keyed collections (identified arrays, dictionaries,
//! sets). The shared edit-script engine lives in [`script`].

pub mod bytes;
pub mod keyed;
pub mod map;
pub mod scalar;
pub(crate) mod script;
pub mod set;
pub mod string;
