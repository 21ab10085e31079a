//! Text-generation port used to draft subtask suggestions.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for text-generation calls.
pub type TextGeneratorResult<T> = Result<T, TextGeneratorError>;

/// External text-generation endpoint.
///
/// One prompt in, one completed reply out; no streaming and no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` and returns the generated text.
    ///
    /// A reply without any text yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`TextGeneratorError`] when the request cannot be sent, the
    /// endpoint answers with a non-success status, or the reply cannot be
    /// decoded.
    async fn generate(&self, prompt: &str) -> TextGeneratorResult<String>;
}

/// Errors returned by text-generation adapters.
#[derive(Debug, Clone, Error)]
pub enum TextGeneratorError {
    /// The endpoint answered with a non-success status.
    #[error("text generation endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be completed or the reply decoded.
    #[error("text generation transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TextGeneratorError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
