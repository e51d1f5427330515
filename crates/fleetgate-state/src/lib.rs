//! fleetgate-state — durable tracked-instance store.
//!
//! Backed by [redb](https://docs.rs/redb), records which instances the fleet
//! manager has put into a termination wait and whether this worker already
//! acknowledged the scale-in lifecycle hook for them.
//!
//! # Architecture
//!
//! `TrackedInstance` records are JSON-serialized into redb's `&[u8]` value
//! column, keyed by instance id. The store is the sole persistence boundary
//! for the scale-in reconciler; records are only ever appended or moved
//! forward (`TerminatingWait → Terminated`), never deleted here — expiry
//! belongs to the retention policy driven by each record's `ttl_days`.
//!
//! The `InstanceStore` is `Clone` + `Send` + `Sync` (backed by
//! `Arc<Database>`) and can be shared across tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::InstanceStore;
pub use types::{InstanceStatus, TrackedInstance};
