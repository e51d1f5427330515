//! fleetgate-lifecycle — scale-in lifecycle reconciliation.
//!
//! When the cluster autoscaler removes capacity, the fleet manager pauses
//! the chosen instance's termination behind a lifecycle hook and waits for
//! an acknowledgment. The worker running on that instance uses this crate
//! to detect the pending hook and acknowledge it exactly once.
//!
//! # Architecture
//!
//! ```text
//! ScaleInMonitor (polling loop, drain signal)
//!   └── ScaleInReconciler::handle_scale_in()
//!         ├── InstanceStateSource (chosen at construction)
//!         │     ├── LiveQuerySource   → FleetQuery::describe_instances()
//!         │     └── TrackedStoreSource → fleetgate_state::InstanceStore
//!         └── LifecycleActionCompleter::complete(hook, instance_id)
//! ```
//!
//! # Exactly-once acknowledgment
//!
//! In tracked-store mode the durable `Terminated` record is checked before
//! every acknowledgment, so retries and crash-restarts never re-acknowledge.
//! In live mode each check re-queries the fleet manager; duplicate
//! completion calls across racing workers are tolerated by the fleet
//! manager's API. Within one invocation the ordering is fixed: source read,
//! then completer call, then acknowledgment write.

pub mod error;
pub mod fleet;
pub mod monitor;
pub mod reconciler;
pub mod source;

pub use error::{LifecycleError, LifecycleResult};
pub use fleet::{FleetInstance, FleetQuery, LifecycleActionCompleter};
pub use monitor::ScaleInMonitor;
pub use reconciler::ScaleInReconciler;
pub use source::{
    InstanceStateSource, LiveQuerySource, TerminationCheck, TrackedStoreSource,
    source_from_config,
};
