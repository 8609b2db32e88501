//! Common surface of the plain client and the tool orchestrator

use async_trait::async_trait;

use super::error::LlmResult;
use super::rotating::RotatingClient;
use crate::types::{ChatCompletion, ChatCompletionRequest};

/// Something that answers chat completion requests
///
/// Lets a caller such as the HTTP façade serve either a bare
/// [`RotatingClient`] or a tool-enabled orchestrator.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, request: ChatCompletionRequest) -> LlmResult<ChatCompletion>;

    fn model_name(&self) -> &str;

    fn api_usage(&self) -> u64;

    fn failed_api_calls(&self) -> u64;
}

#[async_trait]
impl ChatService for RotatingClient {
    async fn complete(&self, request: ChatCompletionRequest) -> LlmResult<ChatCompletion> {
        self.send(request).await
    }

    fn model_name(&self) -> &str {
        RotatingClient::model_name(self)
    }

    fn api_usage(&self) -> u64 {
        RotatingClient::api_usage(self)
    }

    fn failed_api_calls(&self) -> u64 {
        RotatingClient::failed_api_calls(self)
    }
}
