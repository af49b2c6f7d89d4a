//! Debounced append coalescing.
//!
//! A per-controller state machine with two states. `emit` on an idle
//! controller opens a quiescence window and spawns a single waiter task;
//! emitting again while the window is pending just overwrites the stored
//! value, pushes the due time out and marks the wait superseded — no second
//! task is ever scheduled. A wake that finds itself superseded re-arms to
//! the new due time; a wake that arrives uninterrupted delivers the stored
//! value to the append path. Net effect: one diff per quiescence window,
//! always carrying the most recently emitted value.
//!
//! The waiter holds only a `Weak` handle to the controller state, so a wake
//! firing after the controller was torn down observes "target gone" and
//! does nothing.

use std::sync::{Arc, Weak};
use std::time::Duration;

use revertible_core::Revertible;
use tokio::time::Instant;
use tracing::trace;

use crate::controller::{append_locked, Shared};

pub(crate) enum CoalesceState<V> {
    Idle,
    Pending {
        value: V,
        due: Instant,
        superseded: bool,
    },
}

pub(crate) fn emit<V, T>(shared: &Arc<Shared<V, T>>, window: Duration, value: V)
where
    V: Revertible,
    T: Eq + Clone + Send + 'static,
{
    let due = Instant::now() + window;
    let mut guard = shared.state.lock();
    match &mut guard.coalesce {
        CoalesceState::Pending {
            value: stored,
            due: stored_due,
            superseded,
        } => {
            *stored = value;
            *stored_due = due;
            *superseded = true;
            trace!("coalesce window extended");
        }
        state @ CoalesceState::Idle => {
            *state = CoalesceState::Pending {
                value,
                due,
                superseded: false,
            };
            trace!("coalesce window opened");
            tokio::spawn(wait_for_quiescence(Arc::downgrade(shared), due));
        }
    }
}

async fn wait_for_quiescence<V, T>(target: Weak<Shared<V, T>>, mut due: Instant)
where
    V: Revertible,
    T: Eq + Clone + Send + 'static,
{
    loop {
        tokio::time::sleep_until(due).await;
        let Some(shared) = target.upgrade() else {
            // Controller torn down mid-wait; nothing left to mutate.
            return;
        };
        let mut guard = shared.state.lock();
        match std::mem::replace(&mut guard.coalesce, CoalesceState::Idle) {
            CoalesceState::Pending {
                value,
                due: extended,
                superseded: true,
            } => {
                guard.coalesce = CoalesceState::Pending {
                    value,
                    due: extended,
                    superseded: false,
                };
                due = extended;
            }
            CoalesceState::Pending { value, .. } => {
                trace!("coalesce window closed, delivering");
                append_locked(&mut guard, value);
                return;
            }
            CoalesceState::Idle => return,
        }
        drop(guard);
        drop(shared);
    }
}
