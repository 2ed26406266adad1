//! Core [`ModelClient`] trait, the per-call [`GenerateRequest`] and
//! [`ModelError`].
//!
//! A client sends one assembled prompt to a hosted model and hands back the
//! text verbatim. There is no retry: every call corresponds to one user
//! action, and the user can simply try again.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ModelConfig, ModelProvider};
use crate::llm::gemini::GeminiClient;
use crate::llm::openai::OpenAiClient;

// ---------------------------------------------------------------------------
// ModelError
// ---------------------------------------------------------------------------

/// Errors that can occur while calling the external model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// The API answered with a non-success status (bad key, quota, unknown
    /// model, ...).
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The provider refused to answer the prompt.
    #[error("prompt was blocked by the provider: {0}")]
    Blocked(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModelError::Timeout
        } else {
            ModelError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GenerateRequest
// ---------------------------------------------------------------------------

/// Everything a backend needs for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    pub api_key: &'a str,
}

// ---------------------------------------------------------------------------
// ModelClient trait
// ---------------------------------------------------------------------------

/// Async trait for a hosted text-generation model.
///
/// Implementors must be `Send + Sync` so they can be shared behind
/// `Arc<dyn ModelClient>`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError>;
}

#[async_trait]
impl<C: ModelClient + ?Sized> ModelClient for Box<C> {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
        (**self).generate(request).await
    }
}

/// Build the backend selected by `config.provider`.
pub fn client_from_config(config: &ModelConfig) -> Box<dyn ModelClient> {
    match config.provider {
        ModelProvider::Gemini => Box::new(GeminiClient::from_config(config)),
        ModelProvider::OpenAiCompatible => Box::new(OpenAiClient::from_config(config)),
    }
}

/// HTTP client with the configured per-request timeout.
///
/// A default (no-timeout) client is used as a last-resort fallback if the
/// builder fails.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Pull a human-readable message out of an error body, falling back to the
/// raw body.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &str) -> ModelError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    ModelError::Api {
        status: status.as_u16(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
