/*
[INPUT]:  Error sources (validation, connectivity, upstream responses, serialization)
[OUTPUT]: Structured error types with user-facing detail and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Fixed diagnostic for any connectivity failure towards the research service.
pub const UNAVAILABLE_MESSAGE: &str = "Deep research service unavailable";

/// Main error type for the research adapter
#[derive(Error, Debug)]
pub enum ResearchError {
    /// Local input rejected before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Research service could not be reached
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable,

    /// Research service answered with a non-success status
    #[error("Upstream error (status {status}): {message}")]
    UpstreamReported { status: u16, message: String },

    /// HTTP request failed after the connection was established
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A later start, cancel or reset invalidated this start
    #[error("Task start superseded by a later request")]
    Superseded,
}

impl From<reqwest::Error> for ResearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            tracing::debug!(error = %err, "research service unreachable");
            ResearchError::Unavailable
        } else {
            ResearchError::Http(err)
        }
    }
}

impl ResearchError {
    /// Create an upstream error from status code and message
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        ResearchError::UpstreamReported {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// True for local connectivity failures and for a relayed 503.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ResearchError::Unavailable => true,
            ResearchError::UpstreamReported { status, .. } => {
                *status == StatusCode::SERVICE_UNAVAILABLE.as_u16()
            }
            _ => false,
        }
    }

    /// Check if the error is worth retrying on the next poll
    pub fn is_retryable(&self) -> bool {
        match self {
            ResearchError::Unavailable
            | ResearchError::Http(_)
            | ResearchError::Serialization(_) => true,
            ResearchError::UpstreamReported { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Text suitable for a task's `error` field.
    pub fn detail(&self) -> String {
        match self {
            ResearchError::Validation(message) => message.clone(),
            ResearchError::Unavailable => UNAVAILABLE_MESSAGE.to_string(),
            ResearchError::UpstreamReported { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for research adapter operations
pub type Result<T> = std::result::Result<T, ResearchError>;
