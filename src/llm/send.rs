use super::{receive, EnhancementError, LlmResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest slice of an error body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// One chat completion round trip, returning the generated text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> LlmResult<String>;
}

pub struct HttpChatBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpChatBackend {
    pub fn new(config: BackendConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                EnhancementError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    #[instrument(skip(self, messages), fields(model = %self.config.model))]
    async fn complete(&self, messages: &[Message]) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EnhancementError::Configuration("API key is not set".to_string()))?;

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(EnhancementError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Completion received");
        receive::extract_content(&text)
    }
}

impl HttpChatBackend {
    fn transport_error(&self, e: reqwest::Error) -> EnhancementError {
        if e.is_timeout() {
            EnhancementError::Timeout {
                limit: self.config.timeout,
            }
        } else if e.is_connect() {
            EnhancementError::Network(format!("unable to reach {}: {}", self.config.api_url, e))
        } else {
            EnhancementError::Network(e.to_string())
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
