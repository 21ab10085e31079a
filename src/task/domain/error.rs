//! Error types for task domain validation and parsing.

use super::{SubtaskId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The subtask text is empty after trimming.
    #[error("subtask text must not be empty")]
    EmptySubtaskText,

    /// The subtask list already holds the maximum number of entries.
    #[error("a task holds at most {limit} subtasks")]
    SubtaskLimitReached {
        /// Maximum number of subtasks per task.
        limit: usize,
    },

    /// No subtask with the identifier exists on the task.
    #[error("subtask {subtask_id} not found on task {task_id}")]
    SubtaskNotFound {
        /// Parent task identifier.
        task_id: TaskId,
        /// Missing subtask identifier.
        subtask_id: SubtaskId,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
