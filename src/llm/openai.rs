//! OpenAI-compatible backend.
//!
//! Calls any `/v1/chat/completions` endpoint: OpenAI, Groq, Ollama (OpenAI
//! mode), LM Studio, vLLM. All connection details come from [`ModelConfig`].

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::llm::client::{api_error, http_client, GenerateRequest, ModelClient, ModelError};

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url().to_string(),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    /// The whole prompt goes out as a single user message.
    ///
    /// The `Authorization: Bearer …` header is attached only when the key is
    /// non-empty, which keeps local providers without auth working.
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model":       request.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "stream":      false,
            "temperature": request.temperature
        });

        let mut req = self.client.post(&url).json(&body);
        if !request.api_key.is_empty() {
            req = req.bearer_auth(request.api_key);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        parse_response(&text)
    }
}

fn parse_response(body: &str) -> Result<String, ModelError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(ModelError::EmptyResponse)?;

    if content.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_trims_trailing_slash() {
        let mut config = ModelConfig::default();
        config.base_url = Some("http://localhost:11434/".into());
        let client = OpenAiClient::from_config(&config);
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn unset_base_url_targets_openai() {
        let config = ModelConfig {
            provider: crate::config::ModelProvider::OpenAiCompatible,
            ..ModelConfig::default()
        };
        let client = OpenAiClient::from_config(&config);
        assert_eq!(client.base_url, "https://api.openai.com");
    }

    /// `OpenAiClient` is usable as `dyn ModelClient`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn ModelClient> =
            Box::new(OpenAiClient::from_config(&ModelConfig::default()));
        drop(client);
    }

    #[test]
    fn parses_message_content() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"كتاب"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "كتاب");
    }

    #[test]
    fn null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(parse_response(body), Err(ModelError::EmptyResponse)));
    }

    #[test]
    fn whitespace_content_is_empty() {
        let body = r#"{"choices":[{"message":{"content":" \n"}}]}"#;
        assert!(matches!(parse_response(body), Err(ModelError::EmptyResponse)));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(parse_response("oops"), Err(ModelError::Parse(_))));
    }
}
