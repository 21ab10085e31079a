//! JSON task storage over a [`DurableSlot`].
//!
//! The whole task list lives in one slot as a JSON array. Loading is
//! forgiving: an absent, unparsable, or non-array value reads as an empty
//! list, and malformed entries are dropped one by one.

mod models;

pub use models::{
    StoredId, StoredSubtask, StoredTask, StoredTaskError, parse_created_at, parse_due_date,
};

use crate::task::{
    domain::Task,
    ports::{DurableSlot, SlotKey, TaskStorage, TaskStorageError, TaskStorageResult},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Task storage that serializes the full list into a single slot.
#[derive(Debug, Clone)]
pub struct SlotTaskStorage<S>
where
    S: DurableSlot,
{
    slot: Arc<S>,
    key: SlotKey,
}

impl<S> SlotTaskStorage<S>
where
    S: DurableSlot,
{
    /// Creates storage bound to `key` within `slot`.
    #[must_use]
    pub const fn new(slot: Arc<S>, key: SlotKey) -> Self {
        Self { slot, key }
    }

    /// Creates storage bound to the default `tasks` key.
    #[must_use]
    pub fn with_default_key(slot: Arc<S>) -> Self {
        Self::new(slot, SlotKey::default())
    }

    /// Returns the slot key.
    #[must_use]
    pub const fn key(&self) -> &SlotKey {
        &self.key
    }
}

impl<S> TaskStorage for SlotTaskStorage<S>
where
    S: DurableSlot,
{
    fn load(&self) -> Vec<Task> {
        match self.slot.read(&self.key) {
            Ok(Some(raw)) => decode_task_list(&raw),
            Ok(None) => {
                debug!(key = %self.key, "no saved tasks");
                Vec::new()
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read saved tasks");
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> TaskStorageResult<()> {
        let raw = encode_task_list(tasks)?;
        self.slot.write(&self.key, &raw)?;
        debug!(key = %self.key, count = tasks.len(), "saved task list");
        Ok(())
    }
}

/// Serializes a task list into its stored JSON form.
///
/// # Errors
///
/// Returns [`TaskStorageError::Encode`] when serialization fails.
pub fn encode_task_list(tasks: &[Task]) -> TaskStorageResult<String> {
    let rows: Vec<StoredTask> = tasks.iter().map(StoredTask::from).collect();
    serde_json::to_string(&rows).map_err(TaskStorageError::encode)
}

/// Decodes a stored JSON task list, skipping unusable entries.
#[must_use]
pub fn decode_task_list(raw: &str) -> Vec<Task> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "failed to parse saved tasks");
            return Vec::new();
        }
    };
    let Value::Array(entries) = value else {
        warn!("saved tasks are not a JSON array");
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match models::entry_to_task(entry) {
            Ok(task) => Some(task),
            Err(reason) => {
                debug!(index, %reason, "dropping saved task entry");
                None
            }
        })
        .collect()
}
