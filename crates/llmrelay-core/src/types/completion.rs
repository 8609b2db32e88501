//! OpenAI-compatible chat completion wire types
//!
//! Unknown fields are kept in `extra` so that a request or response can be
//! relayed without losing provider-specific data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::{ChatMessage, MessageRole};

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    #[serde(default)]
    pub model: String,
    /// Conversation, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    /// Create a request with only a model and messages set
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }

    /// Whether the caller asked for a streamed response
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

/// Assistant message inside a response choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default = "assistant_role")]
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
}

fn assistant_role() -> MessageRole {
    MessageRole::Assistant
}

/// One completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Response body of a chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: String,
    #[serde(default = "completion_object")]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn completion_object() -> String {
    "chat.completion".to_string()
}

impl Default for ChatCompletion {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl ChatCompletion {
    /// Empty response with no choices.
    ///
    /// Returned by the tool loop when the call cap is exhausted without a
    /// plain-text answer.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            object: completion_object(),
            created: 0,
            model: String::new(),
            choices: Vec::new(),
            usage: None,
            extra: Map::new(),
        }
    }

    /// Single-choice assistant response
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: MessageRole::Assistant,
                    content: Some(text.into()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            ..Self::placeholder()
        }
    }

    /// Set usage figures
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Text of the first choice, `None` when absent or empty
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Mutable text of the first choice, `None` when absent or empty
    pub fn first_content_mut(&mut self) -> Option<&mut String> {
        self.choices
            .first_mut()
            .and_then(|c| c.message.content.as_mut())
            .filter(|s| !s.is_empty())
    }

    /// Reported completion tokens, zero when the endpoint sent no usage
    pub fn completion_tokens(&self) -> u64 {
        self.usage.map(|u| u.completion_tokens).unwrap_or(0)
    }
}

/// Delta carried by a streaming chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// Streaming chunk (`chat.completion.chunk`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// Repackage a complete response as one chunk carrying every choice
    pub fn from_completion(completion: &ChatCompletion, created: u64) -> Self {
        Self {
            id: completion.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created,
            model: completion.model.clone(),
            usage: completion.usage,
            choices: completion
                .choices
                .iter()
                .map(|c| ChunkChoice {
                    index: c.index,
                    delta: c.message.clone(),
                    finish_reason: None,
                })
                .collect(),
        }
    }
}
