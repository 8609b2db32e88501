//! Tool loop settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ConfigError, ConfigResult};
use crate::types::ChatMessage;

/// How the tool-call chain is embedded in the final answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFormat {
    /// `<tool>\n...</tool>\n` before the answer
    #[default]
    Xml,
    /// A fenced ```` ```tool ```` block before the answer
    Markdown,
    /// Answer only
    Remove,
}

impl ChainFormat {
    /// Fold `chain` into `answer`
    ///
    /// Each message contributes its content followed by a newline unless it
    /// already ends with one. An empty chain leaves the answer untouched.
    pub fn render(&self, chain: &[ChatMessage], answer: &str) -> String {
        if chain.is_empty() {
            return answer.to_string();
        }

        let body = chain.iter().fold(String::new(), |mut body, message| {
            body.push_str(&message.content);
            if !message.content.ends_with('\n') {
                body.push('\n');
            }
            body
        });

        match self {
            ChainFormat::Xml => format!("<tool>\n{}</tool>\n{}", body, answer),
            ChainFormat::Markdown => format!("```tool\n{}```\n{}", body, answer),
            ChainFormat::Remove => answer.to_string(),
        }
    }
}

/// Settings for one `ToolOrchestrator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorOptions {
    /// Model turns allowed per request, at least 1
    pub max_tool_calls: u32,
    /// Pause after each tool turn, in milliseconds
    pub delay_ms: u64,
    pub chain_format: ChainFormat,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            max_tool_calls: 10,
            delay_ms: 1000,
            chain_format: ChainFormat::Xml,
        }
    }
}

impl OrchestratorOptions {
    pub fn with_max_tool_calls(mut self, max_tool_calls: u32) -> Self {
        self.max_tool_calls = max_tool_calls;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_chain_format(mut self, chain_format: ChainFormat) -> Self {
        self.chain_format = chain_format;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_tool_calls == 0 {
            return Err(ConfigError::invalid(
                "orchestrator.max_tool_calls",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
