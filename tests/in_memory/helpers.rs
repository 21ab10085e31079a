//! Shared helpers for in-memory editor integration tests.

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;
use taskdeck::task::{
    adapters::{
        SlotTaskStorage,
        memory::{InMemorySlot, StaticTextGenerator},
    },
    ports::{TextGenerator, TextGeneratorResult},
    services::{SubtaskSuggestionService, TaskEditor},
};

/// Editor over an in-memory slot with the given generator.
pub type MemoryEditor<G> = TaskEditor<SlotTaskStorage<InMemorySlot>, G, DefaultClock>;

/// Timeout used by every test suggestion service.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Provides a fresh slot for each test.
#[fixture]
pub fn slot() -> InMemorySlot {
    InMemorySlot::new()
}

/// Opens an editor over `slot`.
pub fn editor_over<G: TextGenerator>(slot: &InMemorySlot, generator: G) -> MemoryEditor<G> {
    TaskEditor::open(
        Arc::new(SlotTaskStorage::with_default_key(Arc::new(slot.clone()))),
        SubtaskSuggestionService::new(Arc::new(generator), TEST_TIMEOUT),
        Arc::new(DefaultClock),
    )
}

/// Opens an editor whose generator replies with `reply`.
pub fn replying_editor(slot: &InMemorySlot, reply: &str) -> MemoryEditor<StaticTextGenerator> {
    editor_over(slot, StaticTextGenerator::replying(reply))
}

/// Generator that never answers within a test's lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct StalledGenerator;

#[async_trait]
impl TextGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> TextGeneratorResult<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(String::new())
    }
}
