//! Task aggregate root.

use super::{SubtaskId, SubtaskList, TaskDomainError, TaskDraft, TaskId, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;

/// Task aggregate root.
///
/// `id` and `created_at` are assigned once in [`Task::create`] and survive
/// every later edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    due_date: NaiveDate,
    created_at: DateTime<Utc>,
    subtasks: SubtaskList,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, possibly empty.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted subtasks.
    pub subtasks: SubtaskList,
}

impl Task {
    /// Creates a new task from a submitted draft.
    ///
    /// A fresh identifier is generated even when the draft carries one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the draft title is blank.
    pub fn create(
        draft: &TaskDraft,
        due_date: NaiveDate,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        ensure_title(draft)?;
        Ok(Self {
            id: TaskId::new(),
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            status: draft.status(),
            due_date,
            created_at: clock.utc(),
            subtasks: draft.subtasks().clone(),
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            created_at: data.created_at,
            subtasks: data.subtasks,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the subtasks.
    #[must_use]
    pub const fn subtasks(&self) -> &SubtaskList {
        &self.subtasks
    }

    /// Replaces every editable field with the draft's values.
    ///
    /// The identifier and creation timestamp are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the draft title is blank.
    pub fn apply_edit(
        &mut self,
        draft: &TaskDraft,
        due_date: NaiveDate,
    ) -> Result<(), TaskDomainError> {
        ensure_title(draft)?;
        self.title = draft.title().to_owned();
        self.description = draft.description().to_owned();
        self.status = draft.status();
        self.due_date = due_date;
        self.subtasks = draft.subtasks().clone();
        Ok(())
    }

    /// Flips the completion flag of one subtask.
    ///
    /// The task status is not affected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubtaskNotFound`] when the subtask does not
    /// belong to this task.
    pub fn toggle_subtask(&mut self, subtask_id: SubtaskId) -> Result<(), TaskDomainError> {
        if self.subtasks.toggle(subtask_id) {
            Ok(())
        } else {
            Err(TaskDomainError::SubtaskNotFound {
                task_id: self.id,
                subtask_id,
            })
        }
    }
}

fn ensure_title(draft: &TaskDraft) -> Result<(), TaskDomainError> {
    if draft.has_blank_title() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(())
}
