//! Non-owning back-reference from a controller to the owner of its tracked
//! value.
//!
//! A bound controller must not extend its owner's lifetime, so it holds a
//! `Weak` to the owner's shared cell plus a lens addressing the tracked
//! field. An owner that has been torn down turns into an observable
//! [`RevertError::TargetUnavailable`] instead of a dangling access.

use std::sync::Weak;

use parking_lot::Mutex;
use revertible_core::Lens;

use crate::error::RevertError;

pub(crate) trait OwnerBinding<V>: Send {
    /// Reads the tracked field out of the owner.
    fn read(&self) -> Result<V, RevertError>;

    /// Writes the rewound value back into the owner.
    fn write_back(&self, value: &V) -> Result<(), RevertError>;
}

pub(crate) struct WeakBinding<O, V> {
    owner: Weak<Mutex<O>>,
    lens: Lens<O, V>,
}

impl<O, V> WeakBinding<O, V> {
    pub(crate) fn new(owner: Weak<Mutex<O>>, lens: Lens<O, V>) -> Self {
        WeakBinding { owner, lens }
    }
}

impl<O, V> OwnerBinding<V> for WeakBinding<O, V>
where
    O: Send + 'static,
    V: Clone + Send + 'static,
{
    fn read(&self) -> Result<V, RevertError> {
        let owner = self
            .owner
            .upgrade()
            .ok_or(RevertError::TargetUnavailable)?;
        let guard = owner.lock();
        self.lens
            .resolve(&guard)
            .cloned()
            .ok_or(RevertError::TargetUnavailable)
    }

    fn write_back(&self, value: &V) -> Result<(), RevertError> {
        let owner = self
            .owner
            .upgrade()
            .ok_or(RevertError::TargetUnavailable)?;
        let mut guard = owner.lock();
        let slot = self
            .lens
            .resolve_mut(&mut guard)
            .ok_or(RevertError::TargetUnavailable)?;
        *slot = value.clone();
        Ok(())
    }
}
