//! Tool documentation injected into the system prompt
//!
//! Layout (marker `※`):
//!
//! ```text
//! <primer>
//! ※get_weather(location,days):Get the weather
//!   location(string):City name
//!   days(int){参数范围:[1,7]}:Forecast length
//! ※now:Current time
//! ```

use super::definition::Tool;
use crate::types::ToolArg;

/// Fixed syntax primer placed before the tool entries
pub fn primer(marker: char) -> String {
    format!(
        "# 工具文档\n\
         你可以使用以下工具来执行操作或者获取额外信息\n\
         使用语法: {m}toolName 或者如果命令需要参数 {m}toolName(\"参数1\", 1.2,...)\n\
         不要使用代码块包裹工具调用,字符串参数使用双引号.\n\
         每次回复只能调用一个工具,同一回复中出现多个工具调用会被视为错误,但允许多轮回复\n\
         不允许自己编造工具调用结果\n\
         不要解释或提及 `<tool>` 标签或 ```tool 代码块等格式.\n",
        m = marker
    )
}

/// One indented parameter line: `name(type){参数范围:[low,high]}:description`
pub fn arg_entry(arg: &ToolArg) -> String {
    let mut line = format!("  {}({})", arg.name, arg.arg_type);
    if let Some(domain) = &arg.domain {
        line.push_str(&format!("{{参数范围:{}}}", domain.compact_notation()));
    }
    if let Some(description) = &arg.description {
        line.push(':');
        line.push_str(description);
    }
    line.push('\n');
    line
}

/// Header line plus one line per parameter
pub fn tool_entry(tool: &Tool, marker: char) -> String {
    if tool.params().is_empty() {
        return format!("{}{}:{}\n", marker, tool.name(), tool.description());
    }

    let names: Vec<&str> = tool.params().iter().map(|p| p.name.as_str()).collect();
    let mut entry = format!(
        "{}{}({}):{}\n",
        marker,
        tool.name(),
        names.join(","),
        tool.description()
    );
    for arg in tool.params() {
        entry.push_str(&arg_entry(arg));
    }
    entry
}

/// Primer followed by each tool's entry, in the order given
pub fn render<'a>(tools: impl IntoIterator<Item = &'a Tool>, marker: char) -> String {
    tools
        .into_iter()
        .fold(primer(marker), |mut doc, tool| {
            doc.push_str(&tool_entry(tool, marker));
            doc
        })
}
