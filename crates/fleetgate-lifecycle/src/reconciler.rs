//! Scale-in reconciler — the acknowledgment state machine.
//!
//! One synchronous call path: check the instance's termination state,
//! acknowledge the lifecycle hook if one is pending, and durably record
//! the acknowledgment. Safe to invoke repeatedly; the durable
//! `Terminated` state (tracked-store mode) or the fleet manager's own
//! idempotent completion call (live mode) keeps retries exactly-once.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::error::LifecycleResult;
use crate::fleet::LifecycleActionCompleter;
use crate::source::{InstanceStateSource, TerminationCheck};

/// Reconciles the scale-in lifecycle hook for this worker's instance.
pub struct ScaleInReconciler {
    /// Name of the scale-in hook. Empty means the feature is disabled.
    hook_name: String,
    /// This process's own instance identifier, resolved by the embedding
    /// worker at startup.
    instance_id: String,
    source: Box<dyn InstanceStateSource>,
    completer: Arc<dyn LifecycleActionCompleter>,
}

impl ScaleInReconciler {
    pub fn new(
        hook_name: impl Into<String>,
        instance_id: impl Into<String>,
        source: Box<dyn InstanceStateSource>,
        completer: Arc<dyn LifecycleActionCompleter>,
    ) -> Self {
        Self {
            hook_name: hook_name.into(),
            instance_id: instance_id.into(),
            source,
            completer,
        }
    }

    /// Handle a pending scale-in lifecycle action, if any.
    ///
    /// Returns `Ok(true)` when this invocation acknowledged the hook or a
    /// previous invocation durably did; `Ok(false)` when there is nothing
    /// to acknowledge. Any collaborator failure propagates — the caller
    /// must treat it as "acknowledgment status unknown" and retry.
    ///
    /// Within one invocation the source read happens before the completer
    /// call, which happens before the acknowledgment write. At most one
    /// completer call and one store write are issued.
    pub fn handle_scale_in(&self) -> LifecycleResult<bool> {
        if self.hook_name.is_empty() {
            debug!("scale-in hook not configured, skipping check");
            return Ok(false);
        }

        match self.source.termination_status(&self.instance_id)? {
            TerminationCheck::NotFound => {
                debug!(instance_id = %self.instance_id, "no termination state for instance");
                Ok(false)
            }
            TerminationCheck::NotTerminating => Ok(false),
            TerminationCheck::Acknowledged => {
                debug!(instance_id = %self.instance_id, "scale-in already acknowledged");
                Ok(true)
            }
            TerminationCheck::AwaitingAck => {
                info!(
                    instance_id = %self.instance_id,
                    hook = %self.hook_name,
                    "completing scale-in lifecycle action"
                );
                self.completer.complete(&self.hook_name, &self.instance_id)?;
                self.source
                    .record_acknowledged(&self.instance_id, epoch_secs())?;
                Ok(true)
            }
        }
    }

    /// The instance this reconciler acts on behalf of.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
