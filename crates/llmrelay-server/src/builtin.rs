//! Built-in demo tools
//!
//! Enable any of these by name in the config's `tools` list.

use chrono::Utc;

use llmrelay_core::tools::{Tool, ToolRegistry, ToolResult};
use llmrelay_core::types::{ToolArg, ToolValue};

/// `echo(text)`: returns its argument
pub fn echo() -> Tool {
    Tool::new_sync("echo", "Return the given text unchanged", |args| {
        Ok(ToolValue::from(args.require_str("text")?))
    })
    .with_param(ToolArg::string("text").with_description("Text to return"))
}

/// `add(a, b)`: sum of two numbers
pub fn add() -> Tool {
    Tool::new_sync("add", "Add two numbers", |args| {
        Ok(ToolValue::Float(args.require_f64("a")? + args.require_f64("b")?))
    })
    .with_params([
        ToolArg::float("a").with_description("First addend"),
        ToolArg::float("b").with_description("Second addend"),
    ])
}

/// `unix_time`: current time in seconds since the epoch
pub fn unix_time() -> Tool {
    Tool::new("unix_time", "Current Unix time in seconds", |_| async {
        Ok(ToolValue::Int(Utc::now().timestamp()))
    })
}

/// Register every built-in tool
pub fn register(registry: &ToolRegistry) -> ToolResult<()> {
    registry.add_tools([echo(), add(), unix_time()])
}
