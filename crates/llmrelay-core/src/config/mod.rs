//! Configuration
//!
//! - `LlmConfig`: immutable endpoint/credential/sampling settings
//! - `ChatConfig`: snapshot of the request defaults a client sends
//! - `RelayConfig`: YAML file tying the whole relay together

mod error;
mod file;
mod llm;

pub use error::{ConfigError, ConfigResult};
pub use file::{RelayConfig, ServerSettings, API_KEYS_ENV};
pub use llm::{ChatConfig, LlmConfig, SamplingConfig};
