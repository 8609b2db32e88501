//! Endpoint, credential and sampling configuration

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::types::{ChatCompletionRequest, ChatMessage};

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Output randomness, 0.0 - 2.0
    pub temperature: f64,
    /// Nucleus sampling mass, 0.0 - 1.0
    pub top_p: f64,
    /// Penalty on repeated tokens, -2.0 - 2.0
    pub frequency_penalty: f64,
    /// Penalty on already-present topics, -2.0 - 2.0
    pub presence_penalty: f64,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            frequency_penalty: 0.2,
            presence_penalty: 0.0,
            max_tokens: 2000,
        }
    }
}

/// Settings for one remote completion endpoint
///
/// Built once and handed to a client by value; there are no setters once
/// construction is finished.
///
/// # Example
///
/// ```
/// use llmrelay_core::config::LlmConfig;
///
/// let config = LlmConfig::new("https://api.openai.com/v1", vec!["sk-a".into()], "gpt-4")
///     .unwrap()
///     .with_temperature(0.2);
/// assert_eq!(config.sampling().temperature, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    base_url: String,
    #[serde(default)]
    api_keys: Vec<String>,
    model: String,
    #[serde(flatten)]
    sampling: SamplingConfig,
}

impl LlmConfig {
    /// Create a config with default sampling; fails on an empty key list
    pub fn new(
        base_url: impl Into<String>,
        api_keys: Vec<String>,
        model: impl Into<String>,
    ) -> ConfigResult<Self> {
        let config = Self {
            base_url: base_url.into(),
            api_keys,
            model: model.into(),
            sampling: SamplingConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants that deserialization cannot enforce
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::EmptyApiKeys);
        }
        if self.api_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::invalid("api_keys", "keys must not be blank"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "model identifier is required"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("base_url", "base URL is required"));
        }
        Ok(())
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.sampling.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.sampling.top_p = top_p;
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.sampling.frequency_penalty = penalty;
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.sampling.presence_penalty = penalty;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling.max_tokens = max_tokens;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_keys(&self) -> &[String] {
        &self.api_keys
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn sampling(&self) -> SamplingConfig {
        self.sampling
    }

    /// Snapshot of the per-request defaults
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            model: self.model.clone(),
            sampling: self.sampling,
            stream: false,
        }
    }

    pub(crate) fn set_api_keys(&mut self, keys: Vec<String>) {
        self.api_keys = keys;
    }
}

/// Copy of the model and sampling values a client attaches to requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatConfig {
    pub model: String,
    #[serde(flatten)]
    pub sampling: SamplingConfig,
    pub stream: bool,
}

impl ChatConfig {
    /// Build a full request around `messages`
    pub fn to_request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.sampling.temperature),
            top_p: Some(self.sampling.top_p),
            frequency_penalty: Some(self.sampling.frequency_penalty),
            presence_penalty: Some(self.sampling.presence_penalty),
            max_tokens: Some(self.sampling.max_tokens),
            stream: Some(self.stream),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        vec!["sk-1".to_string(), "sk-2".to_string()]
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::new("https://example.com/v1", keys(), "gpt-4").unwrap();
        let sampling = config.sampling();
        assert_eq!(sampling.temperature, 0.7);
        assert_eq!(sampling.top_p, 1.0);
        assert_eq!(sampling.frequency_penalty, 0.2);
        assert_eq!(sampling.presence_penalty, 0.0);
        assert_eq!(sampling.max_tokens, 2000);
        assert_eq!(config.api_keys().len(), 2);
    }

    #[test]
    fn test_empty_keys_rejected() {
        let err = LlmConfig::new("https://example.com/v1", vec![], "gpt-4").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyApiKeys));
        assert_eq!(err.to_string(), "API key list cannot be empty");
    }

    #[test]
    fn test_blank_model_rejected() {
        let err = LlmConfig::new("https://example.com/v1", keys(), " ").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_builder_overrides() {
        let config = LlmConfig::new("https://example.com/v1", keys(), "gpt-4")
            .unwrap()
            .with_temperature(0.1)
            .with_top_p(0.9)
            .with_frequency_penalty(0.0)
            .with_presence_penalty(0.5)
            .with_max_tokens(64);
        let sampling = config.sampling();
        assert_eq!(sampling.temperature, 0.1);
        assert_eq!(sampling.top_p, 0.9);
        assert_eq!(sampling.frequency_penalty, 0.0);
        assert_eq!(sampling.presence_penalty, 0.5);
        assert_eq!(sampling.max_tokens, 64);
    }

    #[test]
    fn test_chat_config_to_request() {
        let config = LlmConfig::new("https://example.com/v1", keys(), "gpt-4").unwrap();
        let chat = config.chat_config();
        assert!(!chat.stream);

        let req = chat.to_request(vec![ChatMessage::user("hi")]);
        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.temperature, Some(0.7));
        assert_eq!(req.max_tokens, Some(2000));
        assert_eq!(req.stream, Some(false));
        assert_eq!(req.messages.len(), 1);
    }
}
