//! Fact ingestion failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Ways a fact ingestion can fail
///
/// Each variant renders as a plain-text response body.
#[derive(Debug, Error, PartialEq)]
pub enum FactsError {
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("Missing text")]
    Validation,

    #[error("Failed to create fact")]
    Persistence,

    #[error("Failed to generate vector embedding")]
    Embedding,

    /// Message of the error raised by the vector index
    #[error("{0}")]
    Index(String),
}

impl FactsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FactsError::InvalidBody(_) | FactsError::Validation => StatusCode::BAD_REQUEST,
            FactsError::Persistence | FactsError::Embedding | FactsError::Index(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Pipeline stage label used in metrics
    pub fn stage(&self) -> &'static str {
        match self {
            FactsError::InvalidBody(_) => "parse",
            FactsError::Validation => "validate",
            FactsError::Persistence => "persist",
            FactsError::Embedding => "embed",
            FactsError::Index(_) => "index",
        }
    }
}

impl IntoResponse for FactsError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
