//! Transport error types

use thiserror::Error;

/// Errors that can occur during a single remote completion call
#[derive(Error, Debug)]
pub enum TransportError {
    /// Endpoint answered with a non-success status
    #[error("{transport} API error ({status}): {message}")]
    Api {
        transport: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body did not look like a chat completion
    #[error("Invalid response from {transport}: {message}")]
    InvalidResponse { transport: String, message: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create an API error
    pub fn api_error(transport: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            transport: transport.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            transport: transport.into(),
            message: message.into(),
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
