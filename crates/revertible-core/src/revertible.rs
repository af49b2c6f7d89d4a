//! The per-type reversion capability.

use crate::reversion::Reversion;

/// A type whose values can report the minimal reversion back to a previous
/// snapshot of themselves.
///
/// Implementations exist for scalars, strings, byte buffers
/// ([`crate::ByteBuf`]), identity-keyed collections and the common std
/// wrappers. Aggregate (record and sum) types implement it by driving a
/// [`crate::Reverter`] over their tracked fields:
///
/// ```
/// use revertible_core::{Lens, Reverter, Revertible, Reversion};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl Revertible for Person {
///     fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
///         let mut reverter = Reverter::new();
///         reverter.field(&self.name, &previous.name,
///             Lens::field(|p: &Person| &p.name, |p: &mut Person| &mut p.name));
///         reverter.field(&self.age, &previous.age,
///             Lens::field(|p: &Person| &p.age, |p: &mut Person| &mut p.age));
///         reverter.finish()
///     }
/// }
/// ```
///
/// The `Send + Sync + 'static` bounds let reversions cross task boundaries;
/// the history layer shares them between caller threads and its coalescing
/// task.
pub trait Revertible: Clone + PartialEq + Send + Sync + 'static {
    /// Minimal reversion turning `self` (the current value) back into
    /// `previous`, or `None` when the two are equal.
    ///
    /// This is a total, pure function: it never fails and touches no state
    /// outside its two arguments.
    fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>>;
}
