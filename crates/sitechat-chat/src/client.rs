use async_trait::async_trait;

use sitechat_core::config::CompletionSettings;

use crate::error::Result;
use crate::prompt::{build_messages, Message};
use crate::retry::{with_backoff, RetryPolicy};

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One request, no retries.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// Builds the grounded prompt and completes it, retrying transient failures.
pub async fn answer(
    client: &dyn CompletionClient,
    settings: &CompletionSettings,
    query: &str,
    context: &[String],
) -> Result<String> {
    let messages = build_messages(&settings.system_prompt, query, context);
    with_backoff(RetryPolicy::from_settings(settings), || client.complete(&messages)).await
}
