//! Shared world state for task editor BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::task::{
    adapters::{
        SlotTaskStorage,
        memory::{InMemorySlot, StaticTextGenerator},
    },
    domain::Task,
    ports::TaskStorage,
    services::{DEFAULT_SUGGESTION_TIMEOUT, SubtaskSuggestionService, TaskEditor},
};

/// Editor type used by the BDD world.
pub type TestTaskEditor =
    TaskEditor<SlotTaskStorage<InMemorySlot>, StaticTextGenerator, DefaultClock>;

/// Scenario world for task editor behaviour tests.
pub struct TaskEditorWorld {
    pub slot: InMemorySlot,
    pub generator: StaticTextGenerator,
    pub editor: TestTaskEditor,
    pub edited_task: Option<Task>,
    pub writes_before: usize,
    pub last_error: Option<String>,
}

impl TaskEditorWorld {
    /// Creates a world over an empty slot.
    #[must_use]
    pub fn new() -> Self {
        let slot = InMemorySlot::new();
        let generator = StaticTextGenerator::default();
        let editor = TaskEditor::open(
            Arc::new(SlotTaskStorage::with_default_key(Arc::new(slot.clone()))),
            SubtaskSuggestionService::new(
                Arc::new(generator.clone()),
                DEFAULT_SUGGESTION_TIMEOUT,
            ),
            Arc::new(DefaultClock),
        );

        Self {
            slot,
            generator,
            editor,
            edited_task: None,
            writes_before: 0,
            last_error: None,
        }
    }

    /// Reads the task list back from the slot.
    #[must_use]
    pub fn saved_tasks(&self) -> Vec<Task> {
        SlotTaskStorage::with_default_key(Arc::new(self.slot.clone())).load()
    }

    /// Returns the newest task.
    pub fn first_task(&self) -> Result<&Task, eyre::Report> {
        self.editor
            .tasks()
            .first()
            .ok_or_else(|| eyre::eyre!("task list is empty"))
    }
}

impl Default for TaskEditorWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskEditorWorld {
    TaskEditorWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated scenario list into trimmed items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
