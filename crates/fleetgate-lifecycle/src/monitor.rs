//! Scale-in monitor — background task that polls the reconciler.
//!
//! The reconciler itself is a single synchronous call; the monitor is the
//! external scheduler that invokes it periodically, stops once the
//! acknowledgment is confirmed, and tells the embedding worker to drain.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::reconciler::ScaleInReconciler;

/// Polls [`ScaleInReconciler::handle_scale_in`] until the hook is
/// acknowledged or shutdown is requested.
pub struct ScaleInMonitor {
    reconciler: Arc<ScaleInReconciler>,
    interval: Duration,
    drain_tx: watch::Sender<bool>,
}

impl ScaleInMonitor {
    pub fn new(reconciler: Arc<ScaleInReconciler>, interval: Duration) -> Self {
        let (drain_tx, _) = watch::channel(false);
        Self {
            reconciler,
            interval,
            drain_tx,
        }
    }

    /// Receiver that flips to `true` once the scale-in hook has been
    /// acknowledged and the worker should drain and exit.
    pub fn drain_signal(&self) -> watch::Receiver<bool> {
        self.drain_tx.subscribe()
    }

    /// Run the polling loop.
    ///
    /// Collaborator failures are logged and the loop keeps polling — each
    /// retry is safe because the reconciler's checks are idempotent. The
    /// loop exits after a confirmed acknowledgment or on shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            instance_id = %self.reconciler.instance_id(),
            "scale-in monitor started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    match self.reconciler.handle_scale_in() {
                        Ok(true) => {
                            info!(
                                instance_id = %self.reconciler.instance_id(),
                                "scale-in acknowledged, signaling drain"
                            );
                            let _ = self.drain_tx.send(true);
                            break;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            error!(error = %e, "scale-in check failed, will retry");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("scale-in monitor shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LifecycleError, LifecycleResult};
    use crate::fleet::{FleetInstance, FleetQuery, LifecycleActionCompleter};
    use crate::source::LiveQuerySource;
    use fleetgate_state::InstanceStatus;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fleet whose describe call fails a configured number of times before
    /// reporting the instance in termination wait.
    struct FlakyFleet {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FleetQuery for FlakyFleet {
        fn describe_instances(&self) -> LifecycleResult<Vec<FleetInstance>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let left = self.failures_left.load(Ordering::Relaxed);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::Relaxed);
                return Err(LifecycleError::Fleet("throttled".to_string()));
            }
            Ok(vec![FleetInstance {
                instance_id: "i-32874928359".to_string(),
                group_name: "worker-group".to_string(),
                lifecycle_state: InstanceStatus::TerminatingWait,
            }])
        }
    }

    #[derive(Default)]
    struct CountingCompleter {
        calls: Mutex<Vec<String>>,
    }

    impl LifecycleActionCompleter for CountingCompleter {
        fn complete(&self, _hook_name: &str, instance_id: &str) -> LifecycleResult<()> {
            self.calls.lock().unwrap().push(instance_id.to_string());
            Ok(())
        }
    }

    fn monitor_with(failures: u32) -> (ScaleInMonitor, Arc<FlakyFleet>, Arc<CountingCompleter>) {
        let fleet = Arc::new(FlakyFleet {
            failures_left: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        });
        let completer = Arc::new(CountingCompleter::default());
        let reconciler = Arc::new(ScaleInReconciler::new(
            "scale-in-hook-name",
            "i-32874928359",
            Box::new(LiveQuerySource::new(fleet.clone())),
            completer.clone(),
        ));
        let monitor = ScaleInMonitor::new(reconciler, Duration::from_millis(1));
        (monitor, fleet, completer)
    }

    #[tokio::test]
    async fn fires_drain_signal_after_acknowledgment() {
        let (monitor, _, completer) = monitor_with(0);
        let mut drain = monitor.drain_signal();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { monitor.run(shutdown_rx).await });

        tokio::time::timeout(Duration::from_secs(5), drain.changed())
            .await
            .expect("drain signal not fired")
            .unwrap();
        assert!(*drain.borrow());

        // Loop exits after acknowledging, having completed exactly once.
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
        assert_eq!(completer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn keeps_polling_through_transient_failures() {
        let (monitor, fleet, completer) = monitor_with(3);
        let mut drain = monitor.drain_signal();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move { monitor.run(shutdown_rx).await });

        tokio::time::timeout(Duration::from_secs(5), drain.changed())
            .await
            .expect("drain signal not fired")
            .unwrap();

        // Three failed checks, then the successful one.
        assert!(fleet.calls.load(Ordering::Relaxed) >= 4);
        assert_eq!(completer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop_without_draining() {
        let fleet = Arc::new(FlakyFleet {
            failures_left: AtomicU32::new(u32::MAX),
            calls: AtomicU32::new(0),
        });
        let completer = Arc::new(CountingCompleter::default());
        let reconciler = Arc::new(ScaleInReconciler::new(
            "scale-in-hook-name",
            "i-32874928359",
            Box::new(LiveQuerySource::new(fleet)),
            completer.clone(),
        ));
        let monitor = ScaleInMonitor::new(reconciler, Duration::from_millis(5));
        let drain = monitor.drain_signal();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { monitor.run(shutdown_rx).await });
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
        assert!(!*drain.borrow());
        assert_eq!(completer.calls.lock().unwrap().len(), 0);
    }
}
