//! Domain model for task authoring and persistence.
//!
//! The task domain models tasks, their bounded subtask checklists, and the
//! editable draft form while keeping storage and network concerns outside of
//! the domain boundary.

mod draft;
mod error;
mod ids;
mod status;
mod subtask;
mod task;

pub use draft::TaskDraft;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{SubtaskId, TaskId};
pub use status::TaskStatus;
pub use subtask::{Subtask, SubtaskList};
pub use task::{PersistedTaskData, Task};
