//! Completion boundary: prompt construction, a client trait with an
//! OpenRouter implementation, typed errors and retry with exponential backoff.

pub mod client;
pub mod error;
pub mod openrouter;
pub mod prompt;
pub mod retry;

pub use client::{answer, CompletionClient};
pub use error::{CompletionError, Result};
pub use openrouter::OpenRouterClient;
pub use prompt::{build_messages, Message};
pub use retry::{with_backoff, RetryPolicy};
