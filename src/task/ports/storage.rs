//! Storage ports: the raw durable slot and the typed task list store.

use crate::task::domain::Task;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for durable slot operations.
pub type DurableSlotResult<T> = Result<T, DurableSlotError>;

/// Result type for task storage operations.
pub type TaskStorageResult<T> = Result<T, TaskStorageError>;

/// Name of a durable slot.
///
/// Keys are restricted to ASCII alphanumerics, `-`, and `_` so that every
/// adapter can map them onto its own namespace without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(String);

impl SlotKey {
    /// Key under which the task list is stored by default.
    pub const DEFAULT: &'static str = "tasks";

    /// Creates a validated slot key.
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::InvalidKey`] when the key is empty or
    /// contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> DurableSlotResult<Self> {
        let raw = value.into();
        let is_valid = !raw.is_empty()
            && raw
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !is_valid {
            return Err(DurableSlotError::InvalidKey(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlotKey {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-value string store addressed by key.
pub trait DurableSlot: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::Io`] when the backing store cannot be read.
    fn read(&self, key: &SlotKey) -> DurableSlotResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::Io`] when the backing store rejects the
    /// write.
    fn write(&self, key: &SlotKey, value: &str) -> DurableSlotResult<()>;
}

/// Errors returned by durable slot implementations.
#[derive(Debug, Clone, Error)]
pub enum DurableSlotError {
    /// The slot key is not usable.
    #[error("invalid slot key '{0}', expected [A-Za-z0-9_-]+")]
    InvalidKey(String),

    /// Backing store failure.
    #[error("slot I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl DurableSlotError {
    /// Wraps a backing store error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Whole-list task persistence contract.
///
/// The list is always loaded and saved as one unit.
pub trait TaskStorage: Send + Sync {
    /// Loads every stored task.
    ///
    /// Missing or unreadable data yields an empty list; malformed entries
    /// are skipped individually. This operation never fails.
    fn load(&self) -> Vec<Task>;

    /// Replaces the stored list with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStorageError::Encode`] when the list cannot be
    /// serialized or [`TaskStorageError::Slot`] when the write fails.
    fn save(&self, tasks: &[Task]) -> TaskStorageResult<()>;
}

/// Errors returned by task storage implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStorageError {
    /// The task list could not be serialized.
    #[error("failed to encode task list: {0}")]
    Encode(Arc<dyn std::error::Error + Send + Sync>),

    /// The durable slot rejected the operation.
    #[error(transparent)]
    Slot(#[from] DurableSlotError),
}

impl TaskStorageError {
    /// Wraps a serialization error.
    pub fn encode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Encode(Arc::new(err))
    }
}
