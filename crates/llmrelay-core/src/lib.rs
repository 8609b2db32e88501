//! LLMRelay Core
//!
//! Resilient access to an OpenAI-compatible chat completion endpoint, plus
//! tool calling for models that only produce text.
//!
//! - `client`: `RotatingClient` spreads requests over a pool of API keys and
//!   retries failed attempts with the next key
//! - `tools`: tool definitions, the `※name(args)` call parser, argument
//!   coercion and the documentation block shown to the model
//! - `orchestrator`: `ToolOrchestrator` runs the call/result loop until the
//!   model answers in plain text
//! - `transport`: the single remote call (`HttpTransport`, `MockTransport`)
//!
//! ```rust,ignore
//! use llmrelay_core::{RotatingClient, ToolOrchestrator, ToolRegistry};
//!
//! let client = Arc::new(RotatingClient::new(config, 3, transport, logger.clone())?);
//! let registry = Arc::new(ToolRegistry::new(logger.clone()));
//! registry.add_tool(weather_tool)?;
//!
//! let orchestrator = ToolOrchestrator::new(client, registry, vec!["get_weather".into()], options, logger)?;
//! let answer = orchestrator.simply_chat(messages, None).await?;
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod tools;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use types::{
    ArgType, ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatMessage, Domain,
    Endpoint, MessageRole, ToolArg, ToolValue, Usage,
};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use config::{ChatConfig, ConfigError, LlmConfig, RelayConfig, SamplingConfig};

pub use client::{ChatService, LlmError, LlmResult, RotatingClient};

pub use orchestrator::{ChainFormat, OrchestratorOptions, ToolOrchestrator};

pub use tools::{Tool, ToolArgs, ToolError, ToolRegistry};

pub use transport::{create_transport, HttpTransport, MockTransport, Transport, TransportError};
