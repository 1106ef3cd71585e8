//! Error types for the scanning engine client.

use thiserror::Error;

/// Errors that can occur while talking to the scanning engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Transport failure (connection refused, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The engine answered with a non-success status
    #[error("engine API error on {operation}: status {status}, {message}")]
    Api {
        /// API operation, e.g. `spider/action/scan`
        operation: String,
        /// HTTP status code
        status: u16,
        /// Error message returned by the engine
        message: String,
    },

    /// The engine answered with something we could not interpret
    #[error("failed to parse {operation} response: {message}")]
    Parse {
        /// API operation
        operation: String,
        /// What went wrong
        message: String,
    },

    /// A raw request could not be composed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error while building a request body
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn parse(operation: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
