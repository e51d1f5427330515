//! Domain types for the tracked-instance store.
//!
//! These types mirror the fleet manager's view of an instance's lifecycle,
//! reduced to the phases the scale-in reconciler cares about. Records are
//! JSON-serialized for storage in the redb table.

use serde::{Deserialize, Serialize};

/// Unique identifier of an instance within the fleet.
pub type InstanceId = String;

/// Lifecycle phase of an instance as seen by the fleet manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Phase not recognized or not yet observed.
    Unknown,
    /// Instance is launching.
    Pending,
    /// Instance is serving normally.
    InService,
    /// Termination is paused behind the scale-in lifecycle hook,
    /// waiting for an acknowledgment.
    TerminatingWait,
    /// The hook was acknowledged; termination is proceeding or done.
    Terminated,
}

/// Persisted record of one instance's termination lifecycle.
///
/// A record is created when a `TerminatingWait` instance is first observed
/// and moves forward exactly once, to `Terminated`, when the acknowledgment
/// completes. `termination_time` is set iff the status is `Terminated`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedInstance {
    pub instance_id: InstanceId,
    pub status: InstanceStatus,
    /// Unix timestamp (seconds) when termination was first observed.
    pub request_time: u64,
    /// Unix timestamp (seconds) when the acknowledgment completed.
    pub termination_time: Option<u64>,
    /// Retention hint for the store's expiry policy, in days. Not part
    /// of the transition logic.
    pub ttl_days: u32,
}

impl TrackedInstance {
    /// Create a fresh record for a newly observed termination wait.
    pub fn terminating(instance_id: &str, request_time: u64, ttl_days: u32) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            status: InstanceStatus::TerminatingWait,
            request_time,
            termination_time: None,
            ttl_days,
        }
    }

    /// The record with status moved to `Terminated` at `at_epoch`.
    ///
    /// `request_time` and `ttl_days` are preserved.
    pub fn terminated_at(&self, at_epoch: u64) -> Self {
        Self {
            status: InstanceStatus::Terminated,
            termination_time: Some(at_epoch),
            ..self.clone()
        }
    }

    /// Unix timestamp (seconds) after which the retention policy may
    /// expire this record.
    pub fn expiry_epoch(&self) -> u64 {
        self.request_time + u64::from(self.ttl_days) * 86_400
    }
}
