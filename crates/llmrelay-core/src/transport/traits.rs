//! Transport trait definition

use async_trait::async_trait;

use super::error::TransportResult;
use crate::types::{ChatCompletion, ChatCompletionRequest};

/// One remote chat completion call
///
/// Implementations make exactly one attempt with the credential they are
/// given; retrying and credential rotation belong to the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name used in logs and errors (e.g., "http", "mock")
    fn name(&self) -> &str;

    /// Send `request` authenticated with `api_key`
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
        api_key: &str,
    ) -> TransportResult<ChatCompletion>;
}
