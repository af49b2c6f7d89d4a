//! The public history API: scope stack, reference value and append paths.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use revertible_core::{Lens, Revertible};
use tracing::{debug, trace};

use crate::binding::{OwnerBinding, WeakBinding};
use crate::coalesce::{self, CoalesceState};
use crate::error::RevertError;
use crate::stack::HistoryStack;

// ── Shared state ──────────────────────────────────────────────────────────

pub(crate) struct Shared<V: Revertible, T> {
    pub(crate) state: Mutex<ControllerState<V, T>>,
}

pub(crate) struct ControllerState<V: Revertible, T> {
    /// Scope stack; index 0 is the root scope and is never removed.
    pub(crate) scopes: Vec<HistoryStack<V, T>>,
    /// Live mirror of the tracked value, kept in lock-step by every
    /// append/undo/redo.
    pub(crate) reference: V,
    pub(crate) binding: Option<Box<dyn OwnerBinding<V>>>,
    pub(crate) coalesce: CoalesceState<V>,
}

fn top_mut<V: Revertible, T: Eq + Clone>(
    scopes: &mut Vec<HistoryStack<V, T>>,
) -> &mut HistoryStack<V, T> {
    // The root scope is never removable, so the stack is never empty.
    if scopes.is_empty() {
        scopes.push(HistoryStack::new());
    }
    let last = scopes.len() - 1;
    &mut scopes[last]
}

/// The append core, run with the controller lock held; also the delivery
/// target of the coalescer.
pub(crate) fn append_locked<V: Revertible, T: Eq + Clone>(
    state: &mut ControllerState<V, T>,
    value: V,
) {
    let changed = top_mut(&mut state.scopes).append(&value, &state.reference, None);
    if changed {
        state.reference = value;
        debug!("append recorded");
    } else {
        trace!("append ignored, value unchanged");
    }
}

fn write_back<V: Revertible, T>(state: &ControllerState<V, T>) -> Result<(), RevertError> {
    match &state.binding {
        Some(binding) => binding.write_back(&state.reference),
        None => Ok(()),
    }
}

// ── Controller ────────────────────────────────────────────────────────────

/// Owns the scope stack and reference snapshot for one tracked value and
/// exposes the whole append/undo/redo/tag surface.
///
/// All state lives behind one mutex inside an `Arc`, so a clone of the
/// controller is a second handle onto the same history and the controller
/// is safe to drive from several execution contexts at once. Within one
/// controller, operations are totally ordered by that lock.
///
/// `T` is the tag type used for batch boundaries; any `Eq + Clone` label
/// works, `String` by default.
pub struct VersioningController<V: Revertible, T = String> {
    shared: Arc<Shared<V, T>>,
    debounce: Option<Duration>,
}

impl<V: Revertible, T> Clone for VersioningController<V, T> {
    fn clone(&self) -> Self {
        VersioningController {
            shared: Arc::clone(&self.shared),
            debounce: self.debounce,
        }
    }
}

impl<V, T> VersioningController<V, T>
where
    V: Revertible,
    T: Eq + Clone + Send + 'static,
{
    /// A controller owning its tracked value, starting from `initial`.
    pub fn new(initial: V) -> Self {
        Self::from_state(initial, None)
    }

    /// A controller bound to one field of a longer-lived owner.
    ///
    /// The controller keeps only a non-owning handle to `owner`; successful
    /// undo/redo calls write the rewound value back through `lens`. Fails
    /// with [`RevertError::TargetUnavailable`] when the lens does not
    /// resolve on the current owner value.
    pub fn bound<O: Send + 'static>(
        owner: &Arc<Mutex<O>>,
        lens: Lens<O, V>,
    ) -> Result<Self, RevertError> {
        let initial = lens
            .resolve(&owner.lock())
            .cloned()
            .ok_or(RevertError::TargetUnavailable)?;
        let binding = WeakBinding::new(Arc::downgrade(owner), lens);
        Ok(Self::from_state(initial, Some(Box::new(binding))))
    }

    fn from_state(initial: V, binding: Option<Box<dyn OwnerBinding<V>>>) -> Self {
        VersioningController {
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState {
                    scopes: vec![HistoryStack::new()],
                    reference: initial,
                    binding,
                    coalesce: CoalesceState::Idle,
                }),
            }),
            debounce: None,
        }
    }

    /// Coalesces appends arriving within `window` of each other into a
    /// single recorded change carrying the most recent value.
    ///
    /// Appending on a debounced controller must happen inside a Tokio
    /// runtime; the wait runs as an independently cancellable task that
    /// holds no strong reference to the controller.
    pub fn debounced(mut self, window: Duration) -> Self {
        self.debounce = Some(window);
        self
    }

    // ── Append ────────────────────────────────────────────────────────

    /// Records the change from the reference snapshot to `value`.
    ///
    /// A value equal to the reference is a no-op. On a debounced
    /// controller the value enters the coalescing window instead of being
    /// diffed immediately.
    pub fn append(&self, value: V) {
        match self.debounce {
            Some(window) => coalesce::emit(&self.shared, window, value),
            None => append_locked(&mut self.shared.state.lock(), value),
        }
    }

    /// Reads the tracked field out of the bound owner and appends it.
    ///
    /// Fails with [`RevertError::TargetUnavailable`] on an unbound
    /// controller or a torn-down owner.
    pub fn append_from_owner(&self) -> Result<(), RevertError> {
        let value = {
            let state = self.shared.state.lock();
            let Some(binding) = &state.binding else {
                return Err(RevertError::TargetUnavailable);
            };
            binding.read()?
        };
        self.append(value);
        Ok(())
    }

    // ── Undo / redo ───────────────────────────────────────────────────

    /// Rewinds one action of the current scope.
    ///
    /// On a bound controller the rewound value is written back to the
    /// owner; if the owner is gone the action still counts as consumed —
    /// it has already moved to the redo stack, and the reference snapshot
    /// (which remains authoritative) has been rewound.
    pub fn undo(&self) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).undo(&mut state.reference) {
            debug!("undo applied");
            write_back(state)?;
        }
        Ok(())
    }

    /// Replays one undone action of the current scope. Same owner
    /// write-back contract as [`VersioningController::undo`].
    pub fn redo(&self) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).redo(&mut state.reference) {
            debug!("redo applied");
            write_back(state)?;
        }
        Ok(())
    }

    /// Rewinds every action of the current scope.
    pub fn undo_current_scope(&self) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).undo_all(&mut state.reference) {
            write_back(state)?;
        }
        Ok(())
    }

    /// Replays every undone action of the current scope.
    pub fn redo_current_scope(&self) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).redo_all(&mut state.reference) {
            write_back(state)?;
        }
        Ok(())
    }

    // ── Tags ──────────────────────────────────────────────────────────

    /// Rewinds up to and including the action tagged `tag`; a no-op for an
    /// unknown tag.
    pub fn undo_to(&self, tag: &T) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).undo_to(&mut state.reference, tag) {
            write_back(state)?;
        }
        Ok(())
    }

    /// Replays up to and including the action tagged `tag`; a no-op for an
    /// unknown tag.
    pub fn redo_to(&self, tag: &T) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if top_mut(&mut state.scopes).redo_to(&mut state.reference, tag) {
            write_back(state)?;
        }
        Ok(())
    }

    /// Marks the current version of the current scope with `tag`.
    pub fn tag_current_version(&self, tag: T) {
        let mut guard = self.shared.state.lock();
        top_mut(&mut guard.scopes).tag_current_version(tag);
    }

    /// Retires `tag` as a batch boundary without discarding any edits.
    pub fn clear_tag(&self, tag: &T) {
        let mut guard = self.shared.state.lock();
        top_mut(&mut guard.scopes).clear_tag(tag);
    }

    // ── Scopes ────────────────────────────────────────────────────────

    /// Opens a fresh, empty scope on top of the scope stack.
    pub fn push_new_scope(&self) {
        let mut guard = self.shared.state.lock();
        guard.scopes.push(HistoryStack::new());
        trace!(level = guard.scopes.len() - 1, "scope pushed");
    }

    /// Drops the current scope and its recorded history, keeping the edits
    /// applied. The root scope is never discarded.
    pub fn discard_current_scope(&self) {
        let mut guard = self.shared.state.lock();
        if guard.scopes.len() > 1 {
            guard.scopes.pop();
            trace!(level = guard.scopes.len() - 1, "scope discarded");
        }
    }

    /// Rewinds the current scope completely, then discards it.
    pub fn undo_and_discard_current_scope(&self) -> Result<(), RevertError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let rewound = top_mut(&mut state.scopes).undo_all(&mut state.reference);
        if state.scopes.len() > 1 {
            state.scopes.pop();
        }
        if rewound {
            write_back(state)?;
        }
        Ok(())
    }

    /// Current scope depth; the root scope is level 0.
    pub fn scope_level(&self) -> usize {
        self.shared.state.lock().scopes.len().saturating_sub(1)
    }

    // ── Introspection ─────────────────────────────────────────────────

    pub fn has_undo(&self) -> bool {
        let mut guard = self.shared.state.lock();
        top_mut(&mut guard.scopes).has_undo()
    }

    pub fn has_redo(&self) -> bool {
        let mut guard = self.shared.state.lock();
        top_mut(&mut guard.scopes).has_redo()
    }

    /// A copy of the reference snapshot.
    pub fn value(&self) -> V {
        self.shared.state.lock().reference.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(initial: &str) -> VersioningController<String> {
        VersioningController::new(initial.to_string())
    }

    #[test]
    fn append_undo_redo_keep_reference_in_lock_step() {
        let history = controller("one");
        history.append("two".to_string());
        history.append("three".to_string());
        assert_eq!(history.value(), "three");

        history.undo().unwrap();
        assert_eq!(history.value(), "two");
        history.redo().unwrap();
        assert_eq!(history.value(), "three");
    }

    #[test]
    fn append_of_unchanged_value_records_nothing() {
        let history = controller("same");
        history.append("same".to_string());
        assert!(!history.has_undo());
    }

    #[test]
    fn new_append_invalidates_redo() {
        let history = controller("a");
        history.append("b".to_string());
        history.undo().unwrap();
        assert!(history.has_redo());

        history.append("c".to_string());
        assert!(!history.has_redo());
        assert_eq!(history.value(), "c");
    }

    #[test]
    fn scopes_isolate_history() {
        let history = controller("base");
        history.append("root edit".to_string());

        history.push_new_scope();
        assert_eq!(history.scope_level(), 1);
        assert!(!history.has_undo(), "fresh scope starts empty");

        history.append("scoped edit".to_string());
        history.undo_current_scope().unwrap();
        assert_eq!(history.value(), "root edit");

        history.discard_current_scope();
        assert_eq!(history.scope_level(), 0);
        assert!(history.has_undo(), "root history is untouched");
    }

    #[test]
    fn undo_and_discard_rewinds_then_pops() {
        let history = controller("base");
        history.push_new_scope();
        history.append("scratch".to_string());

        history.undo_and_discard_current_scope().unwrap();
        assert_eq!(history.value(), "base");
        assert_eq!(history.scope_level(), 0);
    }

    #[test]
    fn root_scope_is_never_discarded() {
        let history = controller("base");
        history.discard_current_scope();
        assert_eq!(history.scope_level(), 0);
        history.append("still works".to_string());
        assert!(history.has_undo());
    }

    #[test]
    fn tag_scoped_undo_through_controller() {
        let history = controller("base");
        history.append("edit1".to_string());
        history.append("edit2".to_string());
        history.tag_current_version("checkpoint".to_string());
        history.append("edit3".to_string());

        history.undo_to(&"checkpoint".to_string()).unwrap();
        assert_eq!(history.value(), "edit1");
        assert!(history.has_undo());
    }

    #[test]
    fn clones_share_one_history() {
        let history = controller("base");
        let other = history.clone();
        history.append("edit".to_string());
        assert_eq!(other.value(), "edit");
        other.undo().unwrap();
        assert_eq!(history.value(), "base");
    }

    // ── Owner-bound controllers ───────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct Owner {
        title: String,
        body: String,
    }

    fn body_lens() -> Lens<Owner, String> {
        Lens::field(|o: &Owner| &o.body, |o: &mut Owner| &mut o.body)
    }

    #[test]
    fn bound_controller_writes_back_on_undo() {
        let owner = Arc::new(Mutex::new(Owner {
            title: "doc".into(),
            body: "v1".into(),
        }));
        let history = VersioningController::<String>::bound(&owner, body_lens()).unwrap();

        owner.lock().body = "v2".into();
        history.append_from_owner().unwrap();

        history.undo().unwrap();
        assert_eq!(owner.lock().body, "v1");
        assert_eq!(owner.lock().title, "doc", "untracked fields untouched");

        history.redo().unwrap();
        assert_eq!(owner.lock().body, "v2");
    }

    #[test]
    fn dead_owner_consumes_history_entry() {
        let owner = Arc::new(Mutex::new(Owner {
            title: "doc".into(),
            body: "v1".into(),
        }));
        let history = VersioningController::<String>::bound(&owner, body_lens()).unwrap();
        owner.lock().body = "v2".into();
        history.append_from_owner().unwrap();

        drop(owner);
        assert_eq!(history.undo(), Err(RevertError::TargetUnavailable));
        // The action was consumed and the reference rewound regardless.
        assert!(!history.has_undo());
        assert!(history.has_redo());
        assert_eq!(history.value(), "v1");
    }

    #[test]
    fn dead_owner_bulk_ops_succeed_when_nothing_applies() {
        let owner = Arc::new(Mutex::new(Owner {
            title: "doc".into(),
            body: "v1".into(),
        }));
        let history = VersioningController::<String>::bound(&owner, body_lens()).unwrap();
        drop(owner);

        // Empty stacks and unknown tags consume nothing, so no write-back
        // is attempted and the dead owner stays invisible.
        assert_eq!(history.undo_current_scope(), Ok(()));
        assert_eq!(history.redo_current_scope(), Ok(()));
        assert_eq!(history.undo_to(&"missing".to_string()), Ok(()));
        assert_eq!(history.redo_to(&"missing".to_string()), Ok(()));
        assert_eq!(history.undo_and_discard_current_scope(), Ok(()));
    }

    #[test]
    fn dead_owner_bulk_undo_still_fails_when_actions_apply() {
        let owner = Arc::new(Mutex::new(Owner {
            title: "doc".into(),
            body: "v1".into(),
        }));
        let history = VersioningController::<String>::bound(&owner, body_lens()).unwrap();
        owner.lock().body = "v2".into();
        history.append_from_owner().unwrap();

        drop(owner);
        assert_eq!(
            history.undo_current_scope(),
            Err(RevertError::TargetUnavailable)
        );
        assert_eq!(history.value(), "v1");
    }

    #[test]
    fn unbound_controller_cannot_append_from_owner() {
        let history = controller("base");
        assert_eq!(
            history.append_from_owner(),
            Err(RevertError::TargetUnavailable)
        );
    }
}
