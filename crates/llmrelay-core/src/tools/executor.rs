//! Tool execution

use super::definition::{Tool, ToolArgs};
use super::error::ToolResult;
use crate::types::ToolValue;

/// Bind coerced positional values to parameter names and run the tool
///
/// Values are expected to have passed [`coerce`](super::coerce); nothing is
/// checked here. A failure from the tool's behavior is returned unchanged.
pub async fn execute(tool: &Tool, values: Vec<ToolValue>) -> ToolResult<ToolValue> {
    let args = ToolArgs::bind(tool.params(), values);
    tool.handler().perform(args).await
}
