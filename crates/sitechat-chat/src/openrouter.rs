//! OpenRouter-compatible chat completions over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use sitechat_core::config::CompletionSettings;

use crate::client::CompletionClient;
use crate::error::{CompletionError, Result};
use crate::prompt::Message;

pub struct OpenRouterClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenRouterClient {
    /// Builds a client from settings, reading the key from the environment
    /// variable named by `api_key_env`.
    pub fn from_settings(settings: &CompletionSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            CompletionError::Configuration(format!("{} environment variable not set", settings.api_key_env))
        })?;
        Self::new(settings, api_key)
    }

    pub fn new(settings: &CompletionSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CompletionError::Configuration("API key must not be empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        debug!(model = %self.model, messages = messages.len(), "requesting completion");
        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "sitechat")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion request failed");
                CompletionError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
            error!(%status, "completion API error");
            return Err(CompletionError::from_status(status.as_u16(), detail));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("response contained no choices".to_string()))
    }
}
