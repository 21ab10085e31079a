//! Port contracts for task persistence and subtask suggestion.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod generator;
pub mod storage;

pub use generator::{TextGenerator, TextGeneratorError, TextGeneratorResult};
pub use storage::{
    DurableSlot, DurableSlotError, DurableSlotResult, SlotKey, TaskStorage, TaskStorageError,
    TaskStorageResult,
};
