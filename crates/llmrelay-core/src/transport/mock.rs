//! Mock transport for testing
//!
//! Provides deterministic, configurable responses without network dependencies.
//! Every call is recorded so tests can check which credential and which
//! conversation reached the "remote" side.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::error::{TransportError, TransportResult};
use super::traits::Transport;
use crate::logging::Logger;
use crate::types::{ChatCompletion, ChatCompletionRequest, ChatMessage, MessageRole, Usage};

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Assistant text
    Text(String),
    /// Transport failure with this message
    Error(String),
    /// A response whose first choice has no content
    Empty,
    /// A fully specified response, returned as-is
    Completion(ChatCompletion),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockReply::Error(message.into())
    }
}

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Fail every call
    Error(String),
    /// Return a choice without content
    Empty,
    /// Play back replies in order, failing once the script runs out
    Script(Vec<MockReply>),
}

/// Configuration for the mock transport
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Response mode
    pub mode: MockMode,
    /// Usage attached to every successful response
    pub usage: Usage,
    /// Simulated latency in milliseconds (0 = no delay)
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mode: MockMode::Echo,
            usage: Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            delay_ms: 0,
        }
    }
}

/// What the mock saw on one call
#[derive(Debug, Clone)]
pub struct MockCall {
    pub api_key: String,
    pub messages: Vec<ChatMessage>,
}

/// Mock completion transport
pub struct MockTransport {
    config: MockConfig,
    script: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<MockCall>>,
    logger: Arc<dyn Logger>,
}

impl MockTransport {
    /// Create with specific config
    pub fn with_config(config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        let script = match &config.mode {
            MockMode::Script(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            config,
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo transport (echoes back the last user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::default(), logger)
    }

    /// Create a fixed response transport
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a transport that fails every call
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Create a transport that plays back `replies` in order
    pub fn scripted(replies: Vec<MockReply>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Script(replies), logger)
    }

    fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig {
                mode,
                ..Default::default()
            },
            logger,
        )
    }

    /// Set the usage reported on success
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.config.usage = usage;
        self
    }

    /// Set simulated latency
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Credentials used so far, oldest first
    pub fn keys_used(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.api_key.clone()).collect()
    }

    /// Extract last user message content
    fn last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User && !m.content.is_empty())
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "Hello from MockTransport!".to_string())
    }

    fn next_reply(&self, messages: &[ChatMessage]) -> MockReply {
        match &self.config.mode {
            MockMode::Echo => {
                MockReply::Text(format!("Echo: {}", Self::last_user_message(messages)))
            }
            MockMode::Fixed(text) => MockReply::Text(text.clone()),
            MockMode::Error(message) => MockReply::Error(message.clone()),
            MockMode::Empty => MockReply::Empty,
            MockMode::Script(_) => self
                .script
                .lock()
                .pop_front()
                .unwrap_or_else(|| MockReply::Error("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
        api_key: &str,
    ) -> TransportResult<ChatCompletion> {
        self.calls.lock().push(MockCall {
            api_key: api_key.to_string(),
            messages: request.messages.clone(),
        });

        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        let reply = self.next_reply(&request.messages);
        self.logger
            .debug(&format!("MockTransport: key={} reply={:?}", api_key, reply));

        let id = format!("mock-{}", self.call_count());
        match reply {
            MockReply::Text(text) => Ok(ChatCompletion {
                id,
                ..ChatCompletion::from_text(request.model.clone(), text)
            }
            .with_usage(self.config.usage)),
            MockReply::Empty => Ok(ChatCompletion {
                id,
                ..ChatCompletion::from_text(request.model.clone(), "")
            }
            .with_usage(self.config.usage)),
            MockReply::Completion(completion) => Ok(completion),
            MockReply::Error(message) => {
                Err(TransportError::Other(format!("Mock error: {}", message)))
            }
        }
    }
}
