//! Fleet-manager trait seams.
//!
//! The fleet manager is an external collaborator; this core consumes two
//! narrow capabilities through object-safe traits injected at construction,
//! so tests can substitute recording mocks and the embedding worker can
//! plug in whatever client stack it uses.

use fleetgate_state::InstanceStatus;

use crate::error::LifecycleResult;

/// One entry from the fleet manager's fleet-wide lifecycle listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetInstance {
    pub instance_id: String,
    /// Scaling group the instance belongs to.
    pub group_name: String,
    pub lifecycle_state: InstanceStatus,
}

/// Read side of the fleet manager: the describe-instances listing.
///
/// An instance that has already been fully terminated and removed simply
/// does not appear in the listing; an empty result is never an error.
pub trait FleetQuery: Send + Sync {
    fn describe_instances(&self) -> LifecycleResult<Vec<FleetInstance>>;
}

/// Acknowledgment call against the fleet manager.
///
/// A silently-failed acknowledgment would leave the instance stuck in the
/// wait state until the hook's own timeout, so failure must propagate.
/// The fleet manager tolerates the call being issued more than once for
/// the same hook and instance.
pub trait LifecycleActionCompleter: Send + Sync {
    fn complete(&self, hook_name: &str, instance_id: &str) -> LifecycleResult<()>;
}
