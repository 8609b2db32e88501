//! Argument coercion and domain checks

use super::definition::Tool;
use super::error::{ToolError, ToolResult};
use super::parser::{closing_quote, Invocation};
use crate::types::{ArgType, ToolValue};

/// Trim whitespace and strip one layer of matching quotes
pub fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if closing_quote(first) == Some(last) {
            return &trimmed[first.len_utf8()..trimmed.len() - last.len_utf8()];
        }
    }
    trimmed
}

/// `[+-]?\d+`
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?`
fn is_float_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match fraction {
        Some(fraction) => {
            all_digits(whole) && all_digits(fraction) && !(whole.is_empty() && fraction.is_empty())
        }
        None => !whole.is_empty() && all_digits(whole),
    };

    mantissa_ok && exponent.map_or(true, is_integer_literal)
}

/// Convert one raw argument to `arg_type`; the error is the reason text
pub fn coerce_value(raw: &str, arg_type: ArgType) -> Result<ToolValue, String> {
    match arg_type {
        ArgType::Int => {
            let s = unquote(raw).trim();
            if !is_integer_literal(s) {
                return Err(format!("\"{}\" is not an integer", s));
            }
            s.parse::<i64>()
                .map(ToolValue::Int)
                .map_err(|_| format!("\"{}\" is out of integer range", s))
        }
        ArgType::Float => {
            let s = unquote(raw).trim();
            if !is_float_literal(s) {
                return Err(format!("\"{}\" is not a float", s));
            }
            s.parse::<f64>()
                .map(ToolValue::Float)
                .map_err(|e| format!("\"{}\" is not a float: {}", s, e))
        }
        ArgType::Bool => {
            let s = unquote(raw).trim().to_lowercase();
            match s.as_str() {
                "true" | "1" => Ok(ToolValue::Bool(true)),
                "false" | "0" => Ok(ToolValue::Bool(false)),
                _ => Err(format!("\"{}\" is not a bool", s)),
            }
        }
        ArgType::String => Ok(ToolValue::Text(unquote(raw).to_string())),
    }
}

/// Coerce every raw argument of `invocation` against `tool`'s parameters
pub fn coerce(invocation: &Invocation, tool: &Tool) -> ToolResult<Vec<ToolValue>> {
    let params = tool.params();
    if invocation.raw_args.len() != params.len() {
        return Err(ToolError::ArgumentCount {
            tool: tool.name().to_string(),
            expected: params.len(),
            got: invocation.raw_args.len(),
        });
    }

    params
        .iter()
        .zip(&invocation.raw_args)
        .enumerate()
        .map(|(index, (param, raw))| {
            let position = index + 1;
            let value =
                coerce_value(raw, param.arg_type).map_err(|reason| ToolError::ArgumentType {
                    tool: tool.name().to_string(),
                    position,
                    expected: param.arg_type,
                    reason,
                })?;

            if let (Some(domain), Some(number)) = (&param.domain, value.as_f64()) {
                if !domain.contains(number) {
                    return Err(ToolError::OutOfDomain {
                        tool: tool.name().to_string(),
                        position,
                        value: value.to_string(),
                        kind: domain.endpoint.kind(),
                        interval: domain.notation(),
                    });
                }
            }
            Ok(value)
        })
        .collect()
}
