//! fleetgate-core — configuration surface for the fleetgate worker.
//!
//! Parses `fleetgate.toml` and exposes the two knobs the scale-in
//! reconciliation core consumes: the lifecycle hook name (empty disables
//! the feature) and the tracked-store location (absent selects live
//! fleet-manager queries).

pub mod config;

pub use config::{FleetgateConfig, LifecycleSection, TrackedStoreSection};
