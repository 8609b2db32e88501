//! Tool call extraction from free-form model output
//!
//! An invocation is the marker character, a tool name made of ASCII word
//! characters and an optional argument list opened immediately after the
//! name:
//!
//! ```text
//! ※get_weather("Beijing", 3)
//! ※add（1，2）
//! ※now
//! ```
//!
//! Arguments are split on `,` or `，` at the top level only. Commas inside a
//! quoted argument or inside nested brackets stay part of the argument.

use super::error::{ParseError, ParseResult};

const OPEN_PARENS: [char; 2] = ['(', '（'];
const CLOSE_PARENS: [char; 2] = [')', '）'];
const SEPARATORS: [char; 2] = [',', '，'];

/// Closing partner of an opening quote character
pub(crate) fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '\'' => Some('\''),
        '“' => Some('”'),
        '‘' => Some('’'),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A parsed tool call: the tool name and its raw, trimmed argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool_name: String,
    /// Quotes are kept; coercion removes them
    pub raw_args: Vec<String>,
}

struct Scanner<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Move just past the next `marker`
    fn skip_past(&mut self, marker: char) -> bool {
        while let Some(c) = self.bump() {
            if c == marker {
                return true;
            }
        }
        false
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| is_word_char(*c)) {
            name.push(c);
            self.pos += 1;
        }
        name
    }

    /// Read arguments up to the matching close paren; the open paren is
    /// already consumed
    fn argument_list(&mut self, tool: &str) -> ParseResult<Vec<String>> {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(c) = self.bump() {
            if let Some(close) = quote {
                current.push(c);
                if c == close {
                    quote = None;
                }
                continue;
            }

            if let Some(close) = closing_quote(c).filter(|_| opens_value(&current)) {
                quote = Some(close);
                current.push(c);
            } else if CLOSE_PARENS.contains(&c) {
                if depth == 0 {
                    push_arg(&mut args, &current);
                    return Ok(args);
                }
                depth -= 1;
                current.push(c);
            } else if OPEN_PARENS.contains(&c) {
                depth += 1;
                current.push(c);
            } else if SEPARATORS.contains(&c) && depth == 0 {
                push_arg(&mut args, &current);
                current.clear();
            } else {
                current.push(c);
            }
        }

        let reason = if quote.is_some() {
            "unterminated string literal"
        } else {
            "missing closing parenthesis"
        };
        Err(ParseError::MalformedArgumentList {
            tool: tool.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// A quote only starts a string at the beginning of a value
fn opens_value(current: &str) -> bool {
    match current.trim_end().chars().last() {
        None => true,
        Some(c) => OPEN_PARENS.contains(&c) || SEPARATORS.contains(&c),
    }
}

fn push_arg(args: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        args.push(trimmed.to_string());
    }
}

/// Extract at most one invocation from `text`
///
/// Returns `Ok(None)` when no marker followed by a tool name appears.
/// Two or more invocations fail with [`ParseError::MultipleInvocations`],
/// even if the first one is itself malformed. Markers inside a malformed
/// argument list still count; markers inside a well-formed one do not.
pub fn parse(text: &str, marker: char) -> ParseResult<Option<Invocation>> {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = Scanner {
        chars: &chars,
        pos: 0,
    };

    let mut first: Option<ParseResult<Invocation>> = None;
    let mut count = 0usize;

    while scanner.skip_past(marker) {
        let tool_name = scanner.identifier();
        if tool_name.is_empty() {
            continue;
        }
        count += 1;

        let raw_args = match scanner.peek() {
            Some(c) if OPEN_PARENS.contains(&c) => {
                scanner.pos += 1;
                let start = scanner.pos;
                let parsed = scanner.argument_list(&tool_name);
                if parsed.is_err() {
                    // The list ran to the end of the text; rescan it for markers
                    scanner.pos = start;
                }
                parsed
            }
            _ => Ok(Vec::new()),
        };

        if first.is_none() {
            first = Some(raw_args.map(|raw_args| Invocation {
                tool_name,
                raw_args,
            }));
        }
    }

    if count > 1 {
        return Err(ParseError::MultipleInvocations { count });
    }
    first.transpose()
}
