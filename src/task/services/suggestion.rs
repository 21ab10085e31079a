//! Subtask suggestion client built on the text-generation port.

use crate::task::{
    domain::{SubtaskList, TaskDraft},
    ports::{TextGenerator, TextGeneratorError},
};
use minijinja::{Environment, context};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default upper bound for a single suggestion call.
pub const DEFAULT_SUGGESTION_TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT_TEMPLATE: &str = concat!(
    r#"Based on the task "{{ title }}""#,
    r#"{% if description %} and description "{{ description }}"{% endif %}, "#,
    "suggest {{ count }} specific subtasks as a bullet point list. ",
    "Return only the main text."
);

const UNAVAILABLE_MESSAGE: &str = "This feature is currently unavailable. Please try again later.";

/// Inputs for one suggestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    title: String,
    description: String,
    existing: usize,
}

impl SuggestionRequest {
    /// Creates a request for a task with `existing` subtasks already present.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, existing: usize) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            existing,
        }
    }

    /// Creates a request from the current draft.
    #[must_use]
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self::new(draft.title(), draft.description(), draft.subtasks().len())
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the number of subtasks already on the draft.
    #[must_use]
    pub const fn existing(&self) -> usize {
        self.existing
    }

    /// Checks that a request may be sent.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::EmptyTitle`] for a blank title and
    /// [`SuggestionError::NoRoom`] when the draft is already full.
    pub fn validate(&self) -> Result<(), SuggestionError> {
        if self.title().trim().is_empty() {
            return Err(SuggestionError::EmptyTitle);
        }
        if self.existing() >= SubtaskList::MAX_LEN {
            return Err(SuggestionError::NoRoom {
                limit: SubtaskList::MAX_LEN,
            });
        }
        Ok(())
    }

    /// Renders the natural-language prompt for a request.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::Prompt`] when template rendering fails.
    pub fn render_prompt(&self) -> Result<String, SuggestionError> {
        let environment = Environment::new();
        environment
            .render_str(
                PROMPT_TEMPLATE,
                context! {
                    title => self.title().trim(),
                    description => self.description().trim(),
                    count => SubtaskList::MAX_LEN,
                },
            )
            .map_err(|error| SuggestionError::Prompt(error.to_string()))
    }
}

/// Failures of the suggestion path.
///
/// Every variant is recoverable; the draft is left unchanged and the user
/// may retry.
#[derive(Debug, Clone, Error)]
pub enum SuggestionError {
    /// The task title is blank.
    #[error("a task title is required before suggesting subtasks")]
    EmptyTitle,

    /// The draft has no room for more subtasks.
    #[error("the draft already holds {limit} subtasks")]
    NoRoom {
        /// Maximum number of subtasks per task.
        limit: usize,
    },

    /// A suggestion request is already in flight.
    #[error("subtask suggestions are already being generated")]
    AlreadyGenerating,

    /// The prompt template could not be rendered.
    #[error("failed to render suggestion prompt: {0}")]
    Prompt(String),

    /// The text-generation endpoint failed.
    #[error("subtask suggestions are unavailable: {0}")]
    Unavailable(#[source] TextGeneratorError),

    /// The endpoint did not answer in time.
    #[error("subtask suggestion timed out after {after:?}")]
    TimedOut {
        /// Configured timeout.
        after: Duration,
    },

    /// The request was cancelled or superseded.
    #[error("subtask suggestion was cancelled")]
    Cancelled,

    /// The reply contained no bullet lines.
    #[error("no subtasks were generated")]
    NoSubtasksGenerated,
}

impl SuggestionError {
    /// Returns `true` for failures caused by the draft rather than the
    /// endpoint.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTitle | Self::NoRoom { .. } | Self::AlreadyGenerating
        )
    }

    /// Returns the message shown to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "Please enter a task title first",
            Self::NoRoom { .. } => "A task can have at most 5 subtasks",
            Self::AlreadyGenerating => "Subtasks are already being generated",
            Self::Prompt(_) | Self::Unavailable(_) | Self::TimedOut { .. } => UNAVAILABLE_MESSAGE,
            Self::Cancelled => "Subtask suggestion was cancelled",
            Self::NoSubtasksGenerated => "No subtasks were generated. Please try again.",
        }
    }
}

/// Suggestion client: renders the prompt, makes one bounded call, and
/// parses bullet lines from the reply.
#[derive(Debug)]
pub struct SubtaskSuggestionService<G>
where
    G: TextGenerator,
{
    generator: Arc<G>,
    timeout: Duration,
}

impl<G> Clone for SubtaskSuggestionService<G>
where
    G: TextGenerator,
{
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            timeout: self.timeout,
        }
    }
}

impl<G> SubtaskSuggestionService<G>
where
    G: TextGenerator,
{
    /// Creates a suggestion service.
    #[must_use]
    pub const fn new(generator: Arc<G>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches suggestion candidates for a request.
    ///
    /// The call is abandoned when `cancel` fires or the timeout elapses. At
    /// most [`SubtaskList::MAX_LEN`] candidates are returned.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] when validation fails, the endpoint
    /// fails or times out, the call is cancelled, or the reply holds no
    /// bullet lines.
    pub async fn suggest(
        &self,
        request: &SuggestionRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SuggestionError> {
        request.validate()?;
        let prompt = request.render_prompt()?;

        let call = tokio::time::timeout(self.timeout, self.generator.generate(&prompt));
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SuggestionError::Cancelled),
            result = call => result,
        };
        let text = outcome
            .map_err(|_| SuggestionError::TimedOut {
                after: self.timeout,
            })?
            .map_err(|error| {
                warn!(%error, "text generation failed");
                SuggestionError::Unavailable(error)
            })?;

        let mut candidates = parse_bullet_candidates(&text);
        if candidates.is_empty() {
            return Err(SuggestionError::NoSubtasksGenerated);
        }
        candidates.truncate(SubtaskList::MAX_LEN);
        debug!(count = candidates.len(), "parsed subtask candidates");
        Ok(candidates)
    }
}

/// Extracts bullet items from generated text.
///
/// Only lines starting with `-` or `*` (after trimming) qualify. The marker
/// and surrounding whitespace are stripped and empty results are dropped.
#[must_use]
pub fn parse_bullet_candidates(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            trimmed
                .strip_prefix('-')
                .or_else(|| trimmed.strip_prefix('*'))
                .map(str::trim)
        })
        .filter(|candidate| !candidate.is_empty())
        .map(str::to_owned)
        .collect()
}
