/// LLM Client: the single point of entry for remote text generation in the planner.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Callers depend on the `TextGenerator` trait so tests and the no-credential
/// mode can swap the backend without touching the strategy pipeline.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No API credential configured")]
    MissingCredential,
}

/// Anything that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Short backend label for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API. One request per call unless
/// `LLM_MAX_ATTEMPTS` asks for retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn new(api_key: String, config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: ANTHROPIC_API_URL.to_string(),
            model: config.llm_model.clone(),
            max_attempts: config.llm_max_attempts.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    /// Retries on 429, 5xx and transport errors with exponential backoff when
    /// more than one attempt is configured.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt: u32 = 0;

        loop {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            attempt += 1;

            let retryable = match self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await
            {
                Err(e) => LlmError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!("LLM API returned {}: {}", status, body);
                        LlmError::Api {
                            status: status.as_u16(),
                            message: body,
                        }
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let message = serde_json::from_str::<AnthropicError>(&body)
                            .map(|e| e.error.message)
                            .unwrap_or(body);
                        return Err(LlmError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    } else {
                        let llm_response: LlmResponse = response.json().await?;
                        debug!(
                            "LLM call succeeded: input_tokens={}, output_tokens={}",
                            llm_response.usage.input_tokens, llm_response.usage.output_tokens
                        );
                        return Ok(llm_response);
                    }
                }
            };

            if attempt >= self.max_attempts {
                return Err(retryable);
            }
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    fn backend(&self) -> &'static str {
        "anthropic"
    }
}

/// Stand-in used when no credential is configured. Every call fails, which
/// routes every strategy request through the fallback generator.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        Err(LlmError::MissingCredential)
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "{\"campaigns\": []}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("{\"campaigns\": []}"));
    }

    #[test]
    fn test_response_text_none_without_text_block() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [],
            "usage": {"input_tokens": 1, "output_tokens": 0}
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_client_uses_configured_model() {
        let config = Config {
            llm_model: "claude-haiku-4-5".to_string(),
            ..Config::default()
        };
        let client = LlmClient::new("key".to_string(), &config).unwrap();
        assert_eq!(client.model(), "claude-haiku-4-5");
        assert_eq!(client.backend(), "anthropic");
    }

    #[tokio::test]
    async fn test_last_attempt_returns_its_own_error() {
        let mut client = LlmClient::new("key".to_string(), &Config::default()).unwrap();
        // Nothing listens on port 1, so the request fails at the transport level.
        client.endpoint = "http://127.0.0.1:1/v1/messages".to_string();

        let err = client.call("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_disabled_generator_always_fails() {
        let err = DisabledGenerator.generate("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }
}
