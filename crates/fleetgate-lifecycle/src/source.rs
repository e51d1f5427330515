//! Instance-state sources — where the reconciler learns an instance's
//! lifecycle phase.
//!
//! Two variants, chosen once at construction from configuration:
//!
//! - [`LiveQuerySource`] asks the fleet manager directly. Authoritative,
//!   but rate-limited and ephemeral: nothing is remembered between calls.
//! - [`TrackedStoreSource`] reads a durable [`InstanceStore`] record.
//!   Cheaper than the live query, and the durable `Terminated` state is
//!   what makes re-invocation after a crash-restart exactly-once.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use fleetgate_core::FleetgateConfig;
use fleetgate_state::{InstanceStatus, InstanceStore};

use crate::error::LifecycleResult;
use crate::fleet::FleetQuery;

/// Outcome of checking an instance's termination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCheck {
    /// No state known for this instance (not in the listing / no record).
    NotFound,
    /// Termination is paused behind the hook; acknowledgment is due.
    AwaitingAck,
    /// Acknowledgment already happened in a previous invocation.
    Acknowledged,
    /// Some other lifecycle phase; nothing to do.
    NotTerminating,
}

/// Source of truth for an instance's termination state.
pub trait InstanceStateSource: Send + Sync {
    /// Determine the instance's current termination state.
    fn termination_status(&self, instance_id: &str) -> LifecycleResult<TerminationCheck>;

    /// Durably record that the acknowledgment completed at `at_epoch`
    /// (unix seconds). No-op for ephemeral sources.
    fn record_acknowledged(&self, instance_id: &str, at_epoch: u64) -> LifecycleResult<()>;
}

/// Queries the fleet manager's listing on every check.
pub struct LiveQuerySource {
    fleet: Arc<dyn FleetQuery>,
}

impl LiveQuerySource {
    pub fn new(fleet: Arc<dyn FleetQuery>) -> Self {
        Self { fleet }
    }
}

impl InstanceStateSource for LiveQuerySource {
    fn termination_status(&self, instance_id: &str) -> LifecycleResult<TerminationCheck> {
        let instances = self.fleet.describe_instances()?;
        let entry = instances.iter().find(|i| i.instance_id == instance_id);
        let check = match entry {
            None => TerminationCheck::NotFound,
            Some(i) if i.lifecycle_state == InstanceStatus::TerminatingWait => {
                TerminationCheck::AwaitingAck
            }
            Some(i) => {
                debug!(%instance_id, state = ?i.lifecycle_state, "instance not in termination wait");
                TerminationCheck::NotTerminating
            }
        };
        Ok(check)
    }

    fn record_acknowledged(&self, _instance_id: &str, _at_epoch: u64) -> LifecycleResult<()> {
        // Live mode is ephemeral; the next check re-queries the fleet manager.
        Ok(())
    }
}

/// Reads the durable tracked-instance record.
pub struct TrackedStoreSource {
    store: InstanceStore,
}

impl TrackedStoreSource {
    pub fn new(store: InstanceStore) -> Self {
        Self { store }
    }
}

impl InstanceStateSource for TrackedStoreSource {
    fn termination_status(&self, instance_id: &str) -> LifecycleResult<TerminationCheck> {
        let check = match self.store.get_instance(instance_id)? {
            None => TerminationCheck::NotFound,
            Some(record) => match record.status {
                InstanceStatus::TerminatingWait => TerminationCheck::AwaitingAck,
                InstanceStatus::Terminated => TerminationCheck::Acknowledged,
                status => {
                    // Not an expected live-tracked state; taking no action
                    // is always safe.
                    warn!(%instance_id, ?status, "tracked record has unexpected status");
                    TerminationCheck::NotTerminating
                }
            },
        };
        Ok(check)
    }

    fn record_acknowledged(&self, instance_id: &str, at_epoch: u64) -> LifecycleResult<()> {
        match self.store.get_instance(instance_id)? {
            Some(record) => self.store.put_instance(&record.terminated_at(at_epoch))?,
            None => {
                warn!(%instance_id, "tracked record vanished before acknowledgment write");
            }
        }
        Ok(())
    }
}

/// Build the state source the configuration selects: the tracked store
/// when one is configured, the live fleet-manager query otherwise.
pub fn source_from_config(
    config: &FleetgateConfig,
    fleet: Arc<dyn FleetQuery>,
) -> LifecycleResult<Box<dyn InstanceStateSource>> {
    match &config.tracked_store {
        Some(section) if config.tracked_store_enabled() => {
            let store = InstanceStore::open(Path::new(&section.path))?;
            Ok(Box::new(TrackedStoreSource::new(store)))
        }
        _ => Ok(Box::new(LiveQuerySource::new(fleet))),
    }
}
