//! Composition root wiring configuration to production adapters.

use crate::config::{ConfigError, TaskDeckConfig};
use crate::task::{
    adapters::{DirectorySlot, GeminiTextGenerator, SlotTaskStorage},
    ports::{DurableSlotError, TextGeneratorError},
    services::{SubtaskSuggestionService, TaskEditor},
};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;

/// Editor backed by a directory slot, the Gemini endpoint, and the system
/// clock.
pub type DefaultTaskEditor =
    TaskEditor<SlotTaskStorage<DirectorySlot>, GeminiTextGenerator, DefaultClock>;

/// Errors raised while assembling the editor.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The storage directory could not be opened.
    #[error(transparent)]
    Slot(#[from] DurableSlotError),
    /// The HTTP client could not be built.
    #[error(transparent)]
    Generator(#[from] TextGeneratorError),
}

/// Builds an editor from configuration and loads the saved task list.
///
/// The API key is taken from `config.suggestions.api_key`; call
/// [`TaskDeckConfig::load_api_key`] first to populate it from the
/// environment.
///
/// # Errors
///
/// Returns [`AppError`] when the slot key is invalid, the storage directory
/// cannot be created, or the HTTP client cannot be built.
pub fn open_editor(config: &TaskDeckConfig) -> Result<DefaultTaskEditor, AppError> {
    let slot = DirectorySlot::open_or_create(&config.storage.directory)?;
    let storage = SlotTaskStorage::new(Arc::new(slot), config.slot_key()?);

    let timeout = config.suggestion_timeout();
    let generator = GeminiTextGenerator::new(
        config.suggestions.endpoint.clone(),
        config.suggestions.model.clone(),
        config.suggestions.api_key.clone().unwrap_or_default(),
        timeout,
    )?;
    let suggestions = SubtaskSuggestionService::new(Arc::new(generator), timeout);

    Ok(TaskEditor::open(
        Arc::new(storage),
        suggestions,
        Arc::new(DefaultClock),
    ))
}
