//! In-progress form state for a task being authored or edited.

use super::{Subtask, SubtaskList, Task, TaskId, TaskStatus};
use chrono::NaiveDate;

/// A task under construction.
///
/// A draft carries every editable task field. It has no creation timestamp,
/// and it only carries an identifier when it was opened from an existing
/// task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    id: Option<TaskId>,
    title: String,
    description: String,
    status: TaskStatus,
    due_date: NaiveDate,
    subtasks: SubtaskList,
}

impl TaskDraft {
    /// Creates an empty pending draft due on `today`.
    #[must_use]
    pub const fn empty(today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: today,
            subtasks: SubtaskList::new(),
        }
    }

    /// Creates a draft holding a copy of an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id()),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            due_date: task.due_date(),
            subtasks: task.subtasks().clone(),
        }
    }

    /// Returns the identifier of the task being edited, if any.
    #[must_use]
    pub const fn id(&self) -> Option<TaskId> {
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

    /// Returns the selected status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the chosen due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the draft's subtasks.
    #[must_use]
    pub const fn subtasks(&self) -> &SubtaskList {
        &self.subtasks
    }

    /// Returns `true` when the title is blank.
    #[must_use]
    pub fn has_blank_title(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Replaces the due date.
    pub const fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = due_date;
    }

    /// Gives mutable access to the bounded subtask list.
    pub const fn subtasks_mut(&mut self) -> &mut SubtaskList {
        &mut self.subtasks
    }

    /// Appends a manually entered subtask.
    ///
    /// Blank text and a full list are ignored. Returns the new subtask when
    /// one was added.
    pub fn add_subtask(&mut self, text: impl Into<String>) -> Option<&Subtask> {
        if self.subtasks.is_full() {
            return None;
        }
        let subtask = Subtask::new(text).ok()?;
        self.subtasks.push(subtask).ok()?;
        self.subtasks.as_slice().last()
    }
}
