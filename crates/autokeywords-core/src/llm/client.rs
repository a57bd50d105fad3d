//! HTTP client for OpenAI-compatible chat completion services

use super::classify::CompletionError;
use crate::config::ApiConfig;
use crate::error::{AutoKeywordsError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Trait for completion service clients
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one chat completion and return the raw message content
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;

    /// Check that the API key is accepted by the service
    async fn validate_key(&self, api_key: &str) -> std::result::Result<(), CompletionError>;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible completion client
pub struct HttpCompletionClient {
    http_client: reqwest::Client,
    base_url: String,
    validation_timeout: Duration,
}

impl HttpCompletionClient {
    /// Create new client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("autokeywords/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AutoKeywordsError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            validation_timeout: Duration::from_secs(config.validation_timeout_secs),
        })
    }
}

/// Pull the message content out of a completion response body
pub fn parse_completion_body(body: &str) -> std::result::Result<String, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        CompletionError::malformed(format!("Failed to parse API response: {}", e))
    })?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            CompletionError::malformed("Could not read a completion from the API response")
        })?;

    let content = content.trim();
    if content.is_empty() {
        return Err(CompletionError::malformed(
            "The model returned an empty response",
        ));
    }
    Ok(content.to_string())
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> std::result::Result<String, CompletionError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("POST {} (model {})", url, request.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(CompletionError::from_reqwest)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(CompletionError::from_reqwest)?;

        tracing::debug!(
            "Completion from {} returned HTTP {} in {}ms",
            request.model,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(CompletionError::from_status(status.as_u16(), &body));
        }

        parse_completion_body(&body)
    }

    async fn validate_key(&self, api_key: &str) -> std::result::Result<(), CompletionError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(api_key)
            .timeout(self.validation_timeout)
            .send()
            .await
            .map_err(CompletionError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(CompletionError::from_status(status.as_u16(), &body))
    }
}
