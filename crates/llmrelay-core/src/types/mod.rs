//! Core types for LLM interactions
//!
//! This module contains the shared types used by the transport, the client
//! and the tool loop.

mod completion;
mod message;
mod tool;

pub use completion::{
    ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, Choice, ChunkChoice,
    ResponseMessage, Usage,
};
pub use message::{ChatMessage, MessageRole};
pub use tool::{ArgType, Domain, Endpoint, ToolArg, ToolValue};
