//! HTTP transport for OpenAI-compatible chat completion endpoints

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::error::{TransportError, TransportResult};
use super::traits::Transport;
use crate::logging::Logger;
use crate::types::{ChatCompletion, ChatCompletionRequest};

/// Posts requests to `{base_url}/chat/completions` with bearer auth
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl HttpTransport {
    /// Create a transport for the given base URL (e.g. `https://api.openai.com/v1`)
    pub fn new(base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_client(base_url, reqwest::Client::new(), logger)
    }

    /// Create a transport reusing an existing reqwest client
    pub fn with_client(
        base_url: impl Into<String>,
        http: reqwest::Client,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            logger,
        }
    }

    /// Full completion URL
    pub fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Pull `error.message` out of an OpenAI-style error body, or fall back to
/// the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str().map(String::from))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
        api_key: &str,
    ) -> TransportResult<ChatCompletion> {
        let url = self.endpoint_url();
        self.logger.debug(&format!(
            "[HttpTransport] POST {} model={} messages={}",
            url,
            request.model,
            request.messages.len()
        ));

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            self.logger.warn(&format!(
                "[HttpTransport] {} returned {}: {}",
                url, status, message
            ));
            return Err(TransportError::api_error(self.name(), status.as_u16(), message));
        }

        let completion: ChatCompletion = serde_json::from_str(&body)?;
        if completion.choices.is_empty() && completion.id.is_empty() {
            return Err(TransportError::invalid_response(
                self.name(),
                "response carried neither an id nor any choices",
            ));
        }
        Ok(completion)
    }
}
