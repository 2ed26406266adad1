//! Google Gemini backend (`generateContent` REST API).

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ModelConfig;
use crate::llm::client::{api_error, http_client, GenerateRequest, ModelClient, ModelError};

/// Calls `{base_url}/v1beta/models/{model}:generateContent`.
///
/// The API key travels in the `x-goog-api-key` header rather than the query
/// string so it does not end up in proxy or error logs.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url().to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
        let body = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": request.prompt } ] }
            ],
            "generationConfig": { "temperature": request.temperature }
        });

        let response = self
            .client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        parse_response(&text)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn parse_response(body: &str) -> Result<String, ModelError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ModelError::Blocked(reason));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }

    Ok(text)
}
