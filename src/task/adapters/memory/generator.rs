//! Canned text generator.

use crate::task::ports::{TextGenerator, TextGeneratorError, TextGeneratorResult};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Text generator that answers every prompt with a configured reply.
///
/// The last prompt received is recorded so callers can inspect what would
/// have been sent to a real endpoint.
#[derive(Debug, Clone, Default)]
pub struct StaticTextGenerator {
    state: Arc<RwLock<StaticGeneratorState>>,
}

#[derive(Debug, Default)]
struct StaticGeneratorState {
    reply: Option<TextGeneratorResult<String>>,
    prompts: Vec<String>,
}

impl StaticTextGenerator {
    /// Creates a generator that replies with `text`.
    #[must_use]
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Ok(text.into()))
    }

    /// Creates a generator that fails every call with `status`.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self::with_reply(Err(TextGeneratorError::Status { status }))
    }

    fn with_reply(reply: TextGeneratorResult<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StaticGeneratorState {
                reply: Some(reply),
                prompts: Vec::new(),
            })),
        }
    }

    /// Replaces the configured reply.
    ///
    /// # Errors
    ///
    /// Returns [`TextGeneratorError::Transport`] when lock acquisition fails.
    pub fn set_reply(&self, reply: TextGeneratorResult<String>) -> TextGeneratorResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TextGeneratorError::transport(std::io::Error::other(err.to_string())))?;
        state.reply = Some(reply);
        Ok(())
    }

    /// Returns every prompt received so far.
    ///
    /// # Errors
    ///
    /// Returns [`TextGeneratorError::Transport`] when lock acquisition fails.
    pub fn prompts(&self) -> TextGeneratorResult<Vec<String>> {
        let state = self
            .state
            .read()
            .map_err(|err| TextGeneratorError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.prompts.clone())
    }
}

#[async_trait]
impl TextGenerator for StaticTextGenerator {
    async fn generate(&self, prompt: &str) -> TextGeneratorResult<String> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TextGeneratorError::transport(std::io::Error::other(err.to_string())))?;
        state.prompts.push(prompt.to_owned());
        state.reply.clone().unwrap_or_else(|| Ok(String::new()))
    }
}
