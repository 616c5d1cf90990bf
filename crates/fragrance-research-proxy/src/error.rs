/*
[INPUT]:  Validation failures and upstream connectivity failures
[OUTPUT]: HTTP error responses with `{ "error": ... }` bodies
[POS]:    Error handling layer - proxy error taxonomy
[UPDATE]: When adding error outcomes or changing their status codes
*/

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fragrance_research_adapter::{ErrorBody, ResearchError, UNAVAILABLE_MESSAGE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    /// Malformed local input, rejected before contacting the research service
    #[error("{0}")]
    Validation(String),

    /// The research service could not be reached
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResearchError> for ProxyError {
    fn from(err: ResearchError) -> Self {
        match err {
            ResearchError::Validation(message) => ProxyError::Validation(message),
            other => ProxyError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
