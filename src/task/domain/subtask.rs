//! Subtask values and the bounded subtask sequence owned by each task.

use super::{SubtaskId, TaskDomainError};
use std::collections::HashSet;

/// A single checklist entry belonging to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtask {
    id: SubtaskId,
    text: String,
    completed: bool,
}

impl Subtask {
    /// Creates an open subtask with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubtaskText`] when the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = text.into();
        if raw.trim().is_empty() {
            return Err(TaskDomainError::EmptySubtaskText);
        }
        Ok(Self {
            id: SubtaskId::new(),
            text: raw,
            completed: false,
        })
    }

    /// Reconstructs a subtask from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: SubtaskId, text: String, completed: bool) -> Self {
        Self {
            id,
            text,
            completed,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the subtask has been ticked off.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Flips the completion flag.
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Ordered subtask sequence capped at [`SubtaskList::MAX_LEN`] entries.
///
/// Every mutation goes through this type, so the cap and identifier
/// uniqueness hold at every observable point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskList(Vec<Subtask>);

impl SubtaskList {
    /// Maximum number of subtasks a task may carry.
    pub const MAX_LEN: usize = 5;

    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of subtasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the list holds no subtasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when no further subtask can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() >= Self::MAX_LEN
    }

    /// Returns how many subtasks can still be added.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        Self::MAX_LEN.saturating_sub(self.0.len())
    }

    /// Iterates over the subtasks in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Subtask> {
        self.0.iter()
    }

    /// Returns the subtasks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Subtask] {
        &self.0
    }

    /// Appends a subtask at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubtaskLimitReached`] when the list is full.
    pub fn push(&mut self, subtask: Subtask) -> Result<(), TaskDomainError> {
        if self.is_full() {
            return Err(TaskDomainError::SubtaskLimitReached {
                limit: Self::MAX_LEN,
            });
        }
        self.0.push(subtask);
        Ok(())
    }

    /// Removes the subtask with the given identifier.
    ///
    /// Returns the removed subtask, or `None` when no entry matched.
    pub fn remove(&mut self, id: SubtaskId) -> Option<Subtask> {
        let position = self.0.iter().position(|subtask| subtask.id() == id)?;
        Some(self.0.remove(position))
    }

    /// Flips the completion flag of the matching subtask.
    ///
    /// Returns `false` when no entry matched.
    pub fn toggle(&mut self, id: SubtaskId) -> bool {
        self.0
            .iter_mut()
            .find(|subtask| subtask.id() == id)
            .map(Subtask::toggle)
            .is_some()
    }

    /// Merges freshly suggested subtasks into the list.
    ///
    /// Suggestions win over the tail of the existing entries: the first
    /// `MAX_LEN - suggestions.len()` existing entries are kept (none when
    /// the suggestions alone fill the list), the suggestions follow, and
    /// the result is cut to `MAX_LEN`.
    pub fn merge_suggestions(&mut self, suggestions: Vec<Subtask>) {
        let keep = Self::MAX_LEN.saturating_sub(suggestions.len());
        self.0.truncate(keep);
        self.0.extend(suggestions);
        self.0.truncate(Self::MAX_LEN);
    }
}

impl From<Vec<Subtask>> for SubtaskList {
    /// Builds a list from stored entries, dropping repeated identifiers and
    /// anything beyond the cap.
    fn from(subtasks: Vec<Subtask>) -> Self {
        let mut seen = HashSet::new();
        let unique = subtasks
            .into_iter()
            .filter(|subtask| seen.insert(subtask.id()))
            .take(Self::MAX_LEN)
            .collect();
        Self(unique)
    }
}

impl<'a> IntoIterator for &'a SubtaskList {
    type Item = &'a Subtask;
    type IntoIter = std::slice::Iter<'a, Subtask>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
