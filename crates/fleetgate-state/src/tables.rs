//! redb table definitions for the tracked-instance store.
//!
//! A single table with `&str` keys and `&[u8]` values (JSON-serialized
//! `TrackedInstance` records).

use redb::TableDefinition;

/// Tracked instance records keyed by `{instance_id}`.
pub const TRACKED_INSTANCES: TableDefinition<&str, &[u8]> =
    TableDefinition::new("tracked_instances");
