//! File-based relay configuration (YAML)
//!
//! Default location is `<config_dir>/llmrelay/config.yaml`
//! (`~/.config/llmrelay/config.yaml` on Linux).
//!
//! ```yaml
//! llm:
//!   base_url: https://api.openai.com/v1
//!   api_keys: [sk-a, sk-b]
//!   model: gpt-4o-mini
//!   temperature: 0.3
//! retries: 3
//! tools: [echo, add]
//! orchestrator:
//!   max_tool_calls: 10
//!   delay_ms: 1000
//!   chain_format: xml
//! server:
//!   host: 127.0.0.1
//!   port: 3000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigResult;
use super::llm::LlmConfig;
use crate::orchestrator::OrchestratorOptions;

/// Environment variable holding comma-separated API keys, used when the
/// file lists none
pub const API_KEYS_ENV: &str = "LLMRELAY_API_KEYS";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

fn default_retries() -> u32 {
    3
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Remote endpoint settings
    pub llm: LlmConfig,
    /// Extra attempts after the first failure
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Enabled tool names; empty means requests go straight to the client
    #[serde(default)]
    pub tools: Vec<String>,
    /// Tool loop settings
    #[serde(default)]
    pub orchestrator: OrchestratorOptions,
    /// HTTP listener
    #[serde(default)]
    pub server: ServerSettings,
}

impl RelayConfig {
    /// User-level config path (`<config_dir>/llmrelay/config.yaml`)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        config_dir.join("llmrelay").join("config.yaml")
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML, falling back to `LLMRELAY_API_KEYS`
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let env_keys = std::env::var(API_KEYS_ENV).ok();
        Self::from_yaml_with_env(content, env_keys.as_deref())
    }

    fn from_yaml_with_env(content: &str, env_keys: Option<&str>) -> ConfigResult<Self> {
        let mut config: RelayConfig = serde_yaml::from_str(content)?;

        if config.llm.api_keys().is_empty() {
            if let Some(raw) = env_keys {
                config.llm.set_api_keys(split_keys(raw));
            }
        }

        config.llm.validate()?;
        config.orchestrator.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}
