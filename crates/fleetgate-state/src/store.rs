//! InstanceStore — redb-backed persistence for tracked instances.
//!
//! Typed get/put/list operations over `TrackedInstance` records. Values are
//! JSON-serialized into redb's `&[u8]` value column. The store supports both
//! on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::TRACKED_INSTANCES;
use crate::types::TrackedInstance;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe tracked-instance store backed by redb.
#[derive(Clone)]
pub struct InstanceStore {
    db: Arc<Database>,
}

impl InstanceStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        debug!(?path, "instance store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        debug!("in-memory instance store opened");
        Ok(store)
    }

    /// Create the table if it doesn't exist yet.
    fn ensure_table(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(TRACKED_INSTANCES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or update a tracked-instance record.
    pub fn put_instance(&self, record: &TrackedInstance) -> StateResult<()> {
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(TRACKED_INSTANCES).map_err(map_err!(Table))?;
            table
                .insert(record.instance_id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(instance_id = %record.instance_id, status = ?record.status, "tracked instance stored");
        Ok(())
    }

    /// Get a tracked instance by instance id.
    pub fn get_instance(&self, instance_id: &str) -> StateResult<Option<TrackedInstance>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(TRACKED_INSTANCES).map_err(map_err!(Table))?;
        match table.get(instance_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: TrackedInstance =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List all tracked instances.
    pub fn list_instances(&self) -> StateResult<Vec<TrackedInstance>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(TRACKED_INSTANCES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: TrackedInstance =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }
}
