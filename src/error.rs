// Error types for the broker console.
// Covers transport failures, unexpected HTTP statuses and service-level refusals.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Request to broker API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Connection test failed: {0}")]
    ConnectionFailed(String),

    #[error("None of the requested messages were found in queue {0}")]
    NothingToRequeue(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
