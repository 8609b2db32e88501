//! Text-protocol tool calling
//!
//! Tools are invoked by the model writing a marker-prefixed call in plain
//! text, so any completion endpoint can use them.
//!
//! ```text
//! model text ──► parse ──► Invocation ──► coerce ──► execute ──► ToolValue
//!                  │                        │           │
//!              ParseError               ToolError   ToolError
//! ```
//!
//! `ToolRegistry` holds the definitions and renders the documentation block
//! the model needs to know which tools exist and how to call them.

mod coerce;
mod definition;
mod doc;
mod error;
mod executor;
mod parser;
mod registry;

pub use coerce::{coerce, coerce_value, unquote};
pub use definition::{Tool, ToolArgs, ToolHandler};
pub use doc::primer;
pub use error::{ParseError, ParseResult, ToolError, ToolResult};
pub use executor::execute;
pub use parser::{parse, Invocation};
pub use registry::{ToolRegistry, DEFAULT_MARKER};
