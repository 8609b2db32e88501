//! Completion clients
//!
//! `RotatingClient` owns the key pool and retry policy. `ChatService` is the
//! surface shared with the tool orchestrator.

mod error;
mod rotating;
mod service;

pub use error::{LlmError, LlmResult};
pub use rotating::{RotatingClient, DEFAULT_RETRIES};
pub use service::ChatService;

pub(crate) use rotating::reply_text;
