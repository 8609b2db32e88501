//! Tool call error types
//!
//! The `Display` text of these errors is what the model reads back when a
//! call fails, so messages name the tool, the position and what was expected.

use thiserror::Error;

use crate::types::ArgType;

/// Errors raised while extracting a call from model output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// More than one invocation marker sequence in a single reply
    #[error("multiple calls in one reply ({count}); only one tool call is allowed per reply")]
    MultipleInvocations { count: usize },

    /// An argument list that never closes, or an unterminated string
    #[error("Malformed argument list for tool \"{tool}\": {reason}")]
    MalformedArgumentList { tool: String, reason: String },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors from resolving, validating or running a tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("tool {0} does not exist")]
    UnknownTool(String),

    #[error("tool {0} is not enabled for this conversation")]
    NotEnabled(String),

    #[error("Tool \"{tool}\" requires {expected} arguments, but got {got}")]
    ArgumentCount {
        tool: String,
        expected: usize,
        got: usize,
    },

    #[error("Argument {position} of tool \"{tool}\" must be of type \"{expected}\", but {reason}")]
    ArgumentType {
        tool: String,
        /// 1-based
        position: usize,
        expected: ArgType,
        reason: String,
    },

    #[error("Argument {position} of tool \"{tool}\" must be in {kind} {interval}, but got {value}")]
    OutOfDomain {
        tool: String,
        /// 1-based
        position: usize,
        value: String,
        kind: &'static str,
        interval: String,
    },

    #[error("Invalid definition for tool \"{tool}\": {message}")]
    InvalidDefinition { tool: String, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Failure reported by the tool's own behavior
    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    /// Create an execution error; tool behaviors return this to report failure
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub(crate) fn invalid_definition(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_tool_and_position() {
        let err = ToolError::ArgumentType {
            tool: "get_weather".to_string(),
            position: 2,
            expected: ArgType::Int,
            reason: "\"abc\" is not an integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Argument 2 of tool \"get_weather\" must be of type \"int\", but \"abc\" is not an integer"
        );

        let err = ToolError::OutOfDomain {
            tool: "t".to_string(),
            position: 1,
            value: "10".to_string(),
            kind: "half-open interval",
            interval: "[0, 10)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Argument 1 of tool \"t\" must be in half-open interval [0, 10), but got 10"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: ToolError = ParseError::MultipleInvocations { count: 2 }.into();
        assert!(err.to_string().contains("multiple calls"));
    }
}
