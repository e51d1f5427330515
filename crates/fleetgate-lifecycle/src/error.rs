//! Error types for scale-in lifecycle reconciliation.

use fleetgate_state::StateError;
use thiserror::Error;

/// Result type alias for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Errors that can occur while reconciling the scale-in lifecycle hook.
///
/// Every variant means "acknowledgment status unknown" to the caller: the
/// operation must be retried, which the idempotent checks in the reconciler
/// make safe.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("fleet manager query failed: {0}")]
    Fleet(String),

    #[error("complete-lifecycle-action call failed: {0}")]
    Completer(String),

    #[error("tracked-instance store error: {0}")]
    State(#[from] StateError),
}
