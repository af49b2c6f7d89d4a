//! Error type for the history layer.

use thiserror::Error;

/// Failures surfaced by history operations.
///
/// Diff computation and in-memory patch application are total; the only
/// failure in this layer is an owner-bound controller whose owner has been
/// torn down concurrently with an undo/redo call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RevertError {
    /// The owner bound to this controller is no longer available.
    #[error("reversion target is no longer available")]
    TargetUnavailable,
}
