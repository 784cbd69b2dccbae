use thiserror::Error;

/// Failure of a completion request, classified once at the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The client could not be constructed, e.g. the API key variable is unset.
    #[error("Completion client misconfigured: {0}")]
    Configuration(String),

    #[error("Completion API rejected the credentials (401): {0}")]
    Unauthorized(String),

    #[error("Completion API requires payment or credits (402): {0}")]
    PaymentRequired(String),

    #[error("Completion API rate limit hit (429): {0}")]
    RateLimited(String),

    #[error("Completion API server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// Any other non-success status.
    #[error("Completion API returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Completion request timed out: {0}")]
    Timeout(String),

    #[error("Could not reach completion API: {0}")]
    Connection(String),

    #[error("Unexpected completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Maps a non-success HTTP status and its error detail to a kind.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            401 => Self::Unauthorized(detail),
            402 => Self::PaymentRequired(detail),
            429 => Self::RateLimited(detail),
            500..=599 => Self::Server { status, detail },
            _ => Self::Api { status, detail },
        }
    }

    /// Whether a later attempt of the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Server { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16(), e.to_string())
        } else {
            Self::Connection(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CompletionError>;
