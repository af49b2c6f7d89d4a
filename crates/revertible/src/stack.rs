//! LIFO undo/redo stacks with tag-bounded bulk operations.

use revertible_core::Revertible;

use crate::action::ReversionAction;

/// One scope's history: an undo stack, a redo stack and an optional
/// sentinel tag describing the state before the stack's earliest action.
///
/// The stack never touches values on its own; every operation is handed the
/// live value to mutate so the caller can keep it in lock-step.
#[derive(Debug)]
pub struct HistoryStack<Root: Revertible, T = String> {
    undo_stack: Vec<ReversionAction<Root, T>>,
    redo_stack: Vec<ReversionAction<Root, T>>,
    sentinel_tag: Option<T>,
}

impl<Root: Revertible, T: Eq + Clone> Default for HistoryStack<Root, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Root: Revertible, T: Eq + Clone> HistoryStack<Root, T> {
    pub fn new() -> Self {
        HistoryStack {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            sentinel_tag: None,
        }
    }

    pub fn has_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Records the change from `previous` to `current`.
    ///
    /// A no-op returning `false` when the two are equal. Otherwise the new
    /// action lands on the undo stack and the redo stack is cleared: a
    /// genuinely-changed value invalidates every replayable future.
    pub fn append(&mut self, current: &Root, previous: &Root, tag: Option<T>) -> bool {
        let Some(undo) = current.reversion_to(previous) else {
            return false;
        };
        let redo = previous.reversion_to(current).unwrap_or_default();
        self.undo_stack.push(ReversionAction { undo, redo, tag });
        self.redo_stack.clear();
        true
    }

    /// Moves exactly one action from the undo stack to the redo stack,
    /// rewinding `value`. Returns `false` on an empty stack.
    pub fn undo(&mut self, value: &mut Root) -> bool {
        let Some(action) = self.undo_stack.pop() else {
            return false;
        };
        action.undo.apply(value);
        self.redo_stack.push(action.invert());
        true
    }

    /// Moves exactly one action from the redo stack back to the undo stack,
    /// replaying it onto `value`. Returns `false` on an empty stack.
    pub fn redo(&mut self, value: &mut Root) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        action.undo.apply(value);
        self.undo_stack.push(action.invert());
        true
    }

    /// Drains the undo stack; `true` if at least one action was applied.
    pub fn undo_all(&mut self, value: &mut Root) -> bool {
        let mut applied = false;
        while self.undo(value) {
            applied = true;
        }
        applied
    }

    /// Drains the redo stack; `true` if at least one action was applied.
    pub fn redo_all(&mut self, value: &mut Root) -> bool {
        let mut applied = false;
        while self.redo(value) {
            applied = true;
        }
        applied
    }

    /// Undoes up to and including the action carrying `tag`.
    ///
    /// A tag that appears in neither the undo actions nor the sentinel is
    /// not an error; the call is a no-op returning `false`. A sentinel
    /// match drains the whole stack.
    pub fn undo_to(&mut self, value: &mut Root, tag: &T) -> bool {
        let known = self.undo_stack.iter().any(|a| a.tag.as_ref() == Some(tag))
            || self.sentinel_tag.as_ref() == Some(tag);
        if !known {
            return false;
        }
        let mut applied = false;
        while let Some(top) = self.undo_stack.last() {
            let boundary = top.tag.as_ref() == Some(tag);
            applied |= self.undo(value);
            if boundary {
                break;
            }
        }
        applied
    }

    /// Redoes up to and including the action carrying `tag`; a no-op
    /// returning `false` when no redoable action carries it.
    pub fn redo_to(&mut self, value: &mut Root, tag: &T) -> bool {
        let known = self.redo_stack.iter().any(|a| a.tag.as_ref() == Some(tag));
        if !known {
            return false;
        }
        let mut applied = false;
        while let Some(top) = self.redo_stack.last() {
            let boundary = top.tag.as_ref() == Some(tag);
            applied |= self.redo(value);
            if boundary {
                break;
            }
        }
        applied
    }

    /// Attaches `tag` to the most recently appended action, or to the stack
    /// itself while no actions exist yet.
    pub fn tag_current_version(&mut self, tag: T) {
        match self.undo_stack.last_mut() {
            Some(action) => action.tag = Some(tag),
            None => self.sentinel_tag = Some(tag),
        }
    }

    /// Retires a batch boundary: strips `tag` from every action carrying it
    /// (and from the sentinel) without touching the actions' patches.
    pub fn clear_tag(&mut self, tag: &T) {
        for action in self
            .undo_stack
            .iter_mut()
            .chain(self.redo_stack.iter_mut())
        {
            if action.tag.as_ref() == Some(tag) {
                action.tag = None;
            }
        }
        if self.sentinel_tag.as_ref() == Some(tag) {
            self.sentinel_tag = None;
        }
    }
}
