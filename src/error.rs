//! Crate-wide error type

use thiserror::Error;

/// Errors raised while wiring up or talking to collaborators
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Vector DB error: {0}")]
    VectorDb(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Config(err.to_string())
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        GatewayError::Database(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for GatewayError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        GatewayError::VectorDb(err.to_string())
    }
}

impl From<crate::workers_ai::InferenceError> for GatewayError {
    fn from(err: crate::workers_ai::InferenceError) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}
