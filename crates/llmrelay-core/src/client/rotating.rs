//! Key-rotating, retrying completion client

use parking_lot::Mutex;
use std::sync::Arc;

use super::error::{LlmError, LlmResult};
use crate::config::{ChatConfig, LlmConfig};
use crate::logging::Logger;
use crate::transport::Transport;
use crate::types::{ChatCompletion, ChatCompletionRequest, ChatMessage};

/// Retries used when none are configured
pub const DEFAULT_RETRIES: u32 = 3;

#[derive(Debug, Default)]
struct RotationState {
    key_index: usize,
    api_usage: u64,
    failed_api_calls: u64,
}

/// Sends completion requests through a pool of API keys
///
/// Every attempt uses the key at the current rotation index and then moves
/// the index forward, whether the attempt succeeds or fails. A request is
/// tried at most `retries + 1` times; the last failure is returned as is.
///
/// Rotation state sits behind a mutex that is only held while a key is
/// claimed or a counter bumped, never across the remote call, so one client
/// can be shared by concurrent conversations.
pub struct RotatingClient {
    config: LlmConfig,
    retries: u32,
    transport: Arc<dyn Transport>,
    state: Mutex<RotationState>,
    logger: Arc<dyn Logger>,
}

impl RotatingClient {
    /// Create a client; fails if `config` does not validate
    pub fn new(
        config: LlmConfig,
        retries: u32,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
    ) -> LlmResult<Self> {
        config.validate()?;
        logger.debug(&format!(
            "[RotatingClient] {} keys, {} retries, transport {}",
            config.api_keys().len(),
            retries,
            transport.name()
        ));
        Ok(Self {
            config,
            retries,
            transport,
            state: Mutex::new(RotationState::default()),
            logger,
        })
    }

    /// Claim the key at the rotation index and advance past it
    fn claim_key(&self) -> (usize, &str) {
        let keys = self.config.api_keys();
        let mut state = self.state.lock();
        let index = state.key_index;
        state.key_index = (index + 1) % keys.len();
        state.api_usage += 1;
        (index, keys[index].as_str())
    }

    /// Send a request, rotating keys and retrying on failure
    ///
    /// `stream` is always forced off.
    pub async fn send(&self, mut request: ChatCompletionRequest) -> LlmResult<ChatCompletion> {
        if request.messages.is_empty() {
            return Err(LlmError::EmptyMessages);
        }
        request.stream = Some(false);

        let attempts = self.retries + 1;
        let mut attempt = 1;
        loop {
            let (index, key) = self.claim_key();
            self.logger.debug(&format!(
                "[RotatingClient] Attempt {}/{} with key #{}",
                attempt, attempts, index
            ));

            match self.transport.complete(&request, key).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    self.state.lock().failed_api_calls += 1;
                    self.logger.warn(&format!(
                        "[RotatingClient] Attempt {}/{} with key #{} failed: {}",
                        attempt, attempts, index, err
                    ));
                    if attempt >= attempts {
                        return Err(err.into());
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Send `messages` with the configured model and sampling values
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        seed: Option<i64>,
    ) -> LlmResult<ChatCompletion> {
        let mut request = self.chat_config().to_request(messages);
        request.seed = seed;
        self.send(request).await
    }

    /// Like `chat`, but returns only the reply text
    ///
    /// Every failure is wrapped in [`LlmError::CallFailed`].
    pub async fn simply_chat(&self, messages: Vec<ChatMessage>, seed: Option<i64>) -> LlmResult<String> {
        self.chat(messages, seed)
            .await
            .and_then(|response| reply_text(&response))
            .map_err(LlmError::call_failed)
    }

    pub fn model_name(&self) -> &str {
        self.config.model()
    }

    /// Attempts made so far, successful or not
    pub fn api_usage(&self) -> u64 {
        self.state.lock().api_usage
    }

    /// Failed attempts so far
    pub fn failed_api_calls(&self) -> u64 {
        self.state.lock().failed_api_calls
    }

    /// Index of the key the next attempt will use
    pub fn key_index(&self) -> usize {
        self.state.lock().key_index
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Copy of the model and sampling values
    pub fn chat_config(&self) -> ChatConfig {
        self.config.chat_config()
    }
}

/// Text of the first choice, or `MissingContent`
pub(crate) fn reply_text(response: &ChatCompletion) -> LlmResult<String> {
    response
        .first_content()
        .map(str::to_string)
        .ok_or(LlmError::MissingContent)
}
