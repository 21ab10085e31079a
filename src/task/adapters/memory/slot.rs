//! In-memory durable slot.

use crate::task::ports::{DurableSlot, DurableSlotError, DurableSlotResult, SlotKey};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory slot store.
///
/// Counts successful writes and can be told to reject writes, which lets
/// tests observe write-through behaviour and storage failures.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlot {
    state: Arc<RwLock<InMemorySlotState>>,
}

#[derive(Debug, Default)]
struct InMemorySlotState {
    values: HashMap<SlotKey, String>,
    writes: usize,
    fail_writes: bool,
}

impl InMemorySlot {
    /// Creates an empty slot store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `value` already written under `key`.
    ///
    /// The seed does not count as a write.
    #[must_use]
    pub fn seeded(key: &SlotKey, value: impl Into<String>) -> Self {
        let mut state = InMemorySlotState::default();
        state.values.insert(key.clone(), value.into());
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns the number of successful writes so far.
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::Io`] when lock acquisition fails.
    pub fn write_count(&self) -> DurableSlotResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|err| DurableSlotError::io(std::io::Error::other(err.to_string())))?;
        Ok(state.writes)
    }

    /// Makes subsequent writes fail (or succeed again).
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::Io`] when lock acquisition fails.
    pub fn set_fail_writes(&self, fail: bool) -> DurableSlotResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DurableSlotError::io(std::io::Error::other(err.to_string())))?;
        state.fail_writes = fail;
        Ok(())
    }
}

impl DurableSlot for InMemorySlot {
    fn read(&self, key: &SlotKey) -> DurableSlotResult<Option<String>> {
        let state = self
            .state
            .read()
            .map_err(|err| DurableSlotError::io(std::io::Error::other(err.to_string())))?;
        Ok(state.values.get(key).cloned())
    }

    fn write(&self, key: &SlotKey, value: &str) -> DurableSlotResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DurableSlotError::io(std::io::Error::other(err.to_string())))?;
        if state.fail_writes {
            return Err(DurableSlotError::io(std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "slot quota exceeded",
            )));
        }
        state.values.insert(key.clone(), value.to_owned());
        state.writes += 1;
        Ok(())
    }
}
