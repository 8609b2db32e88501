//! Client-facing error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::tools::ToolError;
use crate::transport::TransportError;

/// Errors surfaced by `RotatingClient` and `ToolOrchestrator`
#[derive(Error, Debug)]
pub enum LlmError {
    /// A request was made with no messages; nothing was sent
    #[error("messages cannot be empty")]
    EmptyMessages,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The final attempt's failure, after all retries were spent
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The model's reply carried no text
    #[error("response content does not exist")]
    MissingContent,

    /// A tool setup problem, raised while building an orchestrator
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Any failure of the simplified text API
    #[error("LLM call failed: {0}")]
    CallFailed(String),
}

impl LlmError {
    /// Wrap any failure for the simplified text API
    pub fn call_failed(cause: impl std::fmt::Display) -> Self {
        Self::CallFailed(cause.to_string())
    }
}

impl From<ConfigError> for LlmError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
