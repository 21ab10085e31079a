//! Task authoring, persistence, and subtask suggestion.
//!
//! This module implements the task persistence and reconciliation model:
//! drafting tasks in create or edit mode, merging manual and suggested
//! subtasks under a fixed cap, and keeping the in-memory task list equal to
//! the durable slot after every change. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
