//! Gemini `generateContent` adapter for the text-generation port.

use crate::task::ports::{TextGenerator, TextGeneratorError, TextGeneratorResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Base URL of the public Gemini REST API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Text generator backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiTextGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiTextGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiTextGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiTextGenerator {
    /// Creates a generator for `model` at `endpoint`.
    ///
    /// `request_timeout` bounds each HTTP exchange at the transport level.
    ///
    /// # Errors
    ///
    /// Returns [`TextGeneratorError::Transport`] when the HTTP client cannot
    /// be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> TextGeneratorResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(TextGeneratorError::transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    fn request_url(&self) -> TextGeneratorResult<Url> {
        let base = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        Url::parse_with_params(&base, &[("key", self.api_key.as_str())])
            .map_err(TextGeneratorError::transport)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Returns `candidates[0].content.parts[0].text`, or an empty string.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> TextGeneratorResult<String> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(self.request_url()?)
            .json(&body)
            .send()
            .await
            .map_err(TextGeneratorError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextGeneratorError::Status {
                status: status.as_u16(),
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(TextGeneratorError::transport)?;
        let text = payload.into_text();
        debug!(model = %self.model, chars = text.len(), "received generated text");
        Ok(text)
    }
}
