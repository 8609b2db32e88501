//! Prompt-level tool calling loop
//!
//! ```text
//! messages ──► inject tool doc ──► RotatingClient ──► reply text
//!                                        ▲                │
//!                                        │          parse / coerce / execute
//!                                        │                │
//!                                        └── call + result message
//! ```

mod options;
mod tool_orchestrator;

pub use options::{ChainFormat, OrchestratorOptions};
pub use tool_orchestrator::{ToolOrchestrator, TOOL_LIMIT_NOTICE};
