//! Task collection persistence over one key-value slot.
//!
//! # Responsibility
//! - Serialize the whole task collection into a single storage slot.
//! - Read the slot back, tolerating missing and corrupt payloads.
//!
//! # Invariants
//! - Every save rewrites the full collection; there are no partial writes.
//! - A payload that does not parse as a list of task records is discarded
//!   from storage and read as an empty collection.
//! - Storage transport errors are propagated, never treated as corruption.

use crate::model::task::{StoredTask, Task};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, warn};

/// Storage key used when callers do not configure one.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Task collection store bound to one storage slot.
pub struct TaskStore<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> TaskStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Creates a store over the default `"tasks"` slot.
    pub fn with_default_key(storage: S) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the persisted collection in stored order.
    ///
    /// Returns an empty collection when the slot is absent or holds `null`.
    /// When the payload is corrupt, removes it from storage and returns an
    /// empty collection.
    ///
    /// # Errors
    /// - Returns storage transport errors from the backend.
    pub fn load(&self) -> StorageResult<Vec<StoredTask>> {
        let Some(payload) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<StoredTask>>>(&payload) {
            Ok(records) => {
                let records = records.unwrap_or_default();
                debug!(
                    "event=tasks_load module=store status=ok key={} count={}",
                    self.key,
                    records.len()
                );
                Ok(records)
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=store status=corrupt key={} payload_bytes={} error={}",
                    self.key,
                    payload.len(),
                    err
                );
                self.storage.remove_item(&self.key)?;
                Ok(Vec::new())
            }
        }
    }

    /// Persists the full collection, replacing the previous payload.
    ///
    /// # Errors
    /// - Returns storage transport errors from the backend.
    pub fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        let payload = serde_json::to_string(tasks)
            .map_err(|err| StorageError::Unavailable(format!("failed to encode tasks: {err}")))?;
        self.storage.set_item(&self.key, &payload)?;
        debug!(
            "event=tasks_save module=store status=ok key={} count={}",
            self.key,
            tasks.len()
        );
        Ok(())
    }
}
