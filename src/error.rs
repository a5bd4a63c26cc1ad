//! Error types for agrimarket

use std::time::Duration;
use thiserror::Error;

/// Failure reported by an external generation service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response did not match output schema: {0}")]
    SchemaMismatch(#[source] serde_json::Error),
}

/// Main error type for agrimarket
#[derive(Error, Debug)]
pub enum AgriMarketError {
    // Request errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Upstream model errors
    #[error("Upstream service error: {0}")]
    UpstreamService(#[from] ServiceError),

    #[error("Service returned no reasoning for its suggestion")]
    EmptyReasoning,

    #[error("Service returned an empty {0}")]
    EmptyOutput(&'static str),

    // Configuration errors
    #[error("Missing configuration field: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgriMarketError {
    /// Whether a caller may reasonably try the same request again.
    ///
    /// Upstream failures and low-confidence results are recoverable; bad
    /// input and configuration will fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgriMarketError::UpstreamService(_)
                | AgriMarketError::EmptyReasoning
                | AgriMarketError::EmptyOutput(_)
        )
    }
}

/// Result type alias for agrimarket operations
pub type Result<T> = std::result::Result<T, AgriMarketError>;
