//! Field accessors used to project reversions into containing values.
//!
//! A lens pairs a read accessor with a mutable accessor from a parent value
//! to one of its children. Resolution is fallible so that a single type
//! covers plain record fields, enum-case payloads that only exist while the
//! case is active, and identity lookups into collections. Composition via
//! [`Lens::then`] is associative: projecting through `a.then(&b)` is the
//! same as projecting through `a` and then `b` one at a time.

use std::sync::Arc;

type Getter<P, C> = Arc<dyn for<'a> Fn(&'a P) -> Option<&'a C> + Send + Sync>;
type GetterMut<P, C> = Arc<dyn for<'a> Fn(&'a mut P) -> Option<&'a mut C> + Send + Sync>;

/// A paired read/write accessor addressing a sub-value within a container.
pub struct Lens<Parent, Child> {
    get: Getter<Parent, Child>,
    get_mut: GetterMut<Parent, Child>,
}

impl<Parent, Child> Clone for Lens<Parent, Child> {
    fn clone(&self) -> Self {
        Lens {
            get: Arc::clone(&self.get),
            get_mut: Arc::clone(&self.get_mut),
        }
    }
}

impl<Parent: 'static, Child: 'static> Lens<Parent, Child> {
    /// Builds a lens from a fallible accessor pair.
    pub fn new(
        get: impl for<'a> Fn(&'a Parent) -> Option<&'a Child> + Send + Sync + 'static,
        get_mut: impl for<'a> Fn(&'a mut Parent) -> Option<&'a mut Child> + Send + Sync + 'static,
    ) -> Self {
        Lens {
            get: Arc::new(get),
            get_mut: Arc::new(get_mut),
        }
    }

    /// Lens for a record field that is always present.
    pub fn field(
        get: fn(&Parent) -> &Child,
        get_mut: fn(&mut Parent) -> &mut Child,
    ) -> Self {
        Self::new(move |p| Some(get(p)), move |p| Some(get_mut(p)))
    }

    /// Lens for an enum-case payload, valid only while the case is active.
    ///
    /// Semantically identical to [`Lens::new`]; the separate name marks the
    /// call sites where resolution is expected to fail once the value has
    /// switched cases.
    pub fn case(
        get: impl for<'a> Fn(&'a Parent) -> Option<&'a Child> + Send + Sync + 'static,
        get_mut: impl for<'a> Fn(&'a mut Parent) -> Option<&'a mut Child> + Send + Sync + 'static,
    ) -> Self {
        Self::new(get, get_mut)
    }

    pub fn resolve<'a>(&self, parent: &'a Parent) -> Option<&'a Child> {
        (self.get)(parent)
    }

    pub fn resolve_mut<'a>(&self, parent: &'a mut Parent) -> Option<&'a mut Child> {
        (self.get_mut)(parent)
    }

    /// Composes this lens with a lens from `Child` deeper into `Grandchild`.
    pub fn then<Grandchild: 'static>(
        &self,
        inner: &Lens<Child, Grandchild>,
    ) -> Lens<Parent, Grandchild> {
        let outer_get = Arc::clone(&self.get);
        let outer_get_mut = Arc::clone(&self.get_mut);
        let inner_get = Arc::clone(&inner.get);
        let inner_get_mut = Arc::clone(&inner.get_mut);
        Lens {
            get: Arc::new(move |p| outer_get(p).and_then(|c| inner_get(c))),
            get_mut: Arc::new(move |p| outer_get_mut(p).and_then(|c| inner_get_mut(c))),
        }
    }
}
