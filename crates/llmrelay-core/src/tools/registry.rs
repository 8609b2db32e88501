//! Tool registry
//!
//! The registry is an explicit catalog object: build one at startup, add
//! tools, then share it behind an `Arc` with every orchestrator that needs
//! to resolve tools or render their documentation.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::definition::Tool;
use super::doc;
use super::error::{ToolError, ToolResult};
use crate::logging::Logger;

/// Default invocation marker
pub const DEFAULT_MARKER: char = '※';

#[derive(Default)]
struct Catalog {
    tools: HashMap<String, Arc<Tool>>,
    /// Registration order, for documentation output
    order: Vec<String>,
}

/// Catalog of callable tools keyed by name
pub struct ToolRegistry {
    marker: char,
    catalog: RwLock<Catalog>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry using the default marker
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_marker(DEFAULT_MARKER, logger)
    }

    /// Create an empty registry with a custom invocation marker
    pub fn with_marker(marker: char, logger: Arc<dyn Logger>) -> Self {
        Self {
            marker,
            catalog: RwLock::new(Catalog::default()),
            logger,
        }
    }

    /// Character that starts a tool invocation
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Register a tool, replacing any earlier tool with the same name
    pub fn add_tool(&self, tool: Tool) -> ToolResult<()> {
        validate(&tool)?;

        let name = tool.name().to_string();
        let mut catalog = self.catalog.write();
        if catalog.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            self.logger
                .warn(&format!("[ToolRegistry] Replacing tool {}", name));
        } else {
            self.logger
                .debug(&format!("[ToolRegistry] Registered tool {}", name));
            catalog.order.push(name);
        }
        Ok(())
    }

    /// Register several tools; stops at the first invalid definition
    pub fn add_tools(&self, tools: impl IntoIterator<Item = Tool>) -> ToolResult<()> {
        tools.into_iter().try_for_each(|tool| self.add_tool(tool))
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.catalog.read().tools.contains_key(name)
    }

    /// Look up a tool by name
    pub fn get_tool(&self, name: &str) -> ToolResult<Arc<Tool>> {
        self.catalog
            .read()
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.catalog.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.catalog.read().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.read().tools.is_empty()
    }

    /// Documentation for the named tools, in the order given
    ///
    /// Fails with [`ToolError::UnknownTool`] if any name is not registered.
    pub fn tool_doc<S: AsRef<str>>(&self, names: &[S]) -> ToolResult<String> {
        let tools = names
            .iter()
            .map(|name| self.get_tool(name.as_ref()))
            .collect::<ToolResult<Vec<_>>>()?;
        Ok(doc::render(tools.iter().map(Arc::as_ref), self.marker))
    }

    /// Documentation for every registered tool, in registration order
    pub fn all_tool_doc(&self) -> String {
        let catalog = self.catalog.read();
        let tools = catalog
            .order
            .iter()
            .filter_map(|name| catalog.tools.get(name))
            .map(Arc::as_ref);
        doc::render(tools, self.marker)
    }
}

fn validate(tool: &Tool) -> ToolResult<()> {
    let name = tool.name();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ToolError::invalid_definition(
            name,
            "name must be one or more of [A-Za-z0-9_]",
        ));
    }

    let mut seen = HashSet::new();
    for param in tool.params() {
        if !seen.insert(param.name.as_str()) {
            return Err(ToolError::invalid_definition(
                name,
                format!("duplicate parameter {}", param.name),
            ));
        }
        if let Some(domain) = &param.domain {
            if !param.arg_type.is_numeric() {
                return Err(ToolError::invalid_definition(
                    name,
                    format!(
                        "parameter {} of type {} cannot have a domain",
                        param.name, param.arg_type
                    ),
                ));
            }
            if !domain.is_well_formed() {
                return Err(ToolError::invalid_definition(
                    name,
                    format!("parameter {} has low > high", param.name),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::{Domain, ToolArg, ToolValue};

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(NoOpLogger::new()))
    }

    fn tool(name: &str, description: &str) -> Tool {
        Tool::new_sync(name, description, |_| Ok(ToolValue::Bool(true)))
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = registry();
        assert!(registry.is_empty());
        registry
            .add_tools([tool("a", "first"), tool("b", "second")])
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.has_tool("a"));
        assert_eq!(registry.get_tool("b").unwrap().description(), "second");
        assert!(matches!(
            registry.get_tool("c"),
            Err(ToolError::UnknownTool(ref n)) if n == "c"
        ));
    }

    #[test]
    fn test_readd_replaces_in_place() {
        let registry = registry();
        registry.add_tools([tool("a", "old"), tool("b", "")]).unwrap();
        registry.add_tool(tool("a", "new")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get_tool("a").unwrap().description(), "new");
    }

    #[test]
    fn test_rejects_invalid_definitions() {
        let registry = registry();
        assert!(registry.add_tool(tool("bad name", "")).is_err());
        assert!(registry.add_tool(tool("", "")).is_err());

        let dup = tool("dup", "").with_params([ToolArg::int("x"), ToolArg::float("x")]);
        assert!(registry.add_tool(dup).is_err());

        let text_domain =
            tool("t", "").with_param(ToolArg::string("s").with_domain(Domain::new(0.0, 1.0)));
        assert!(registry.add_tool(text_domain).is_err());

        let inverted = tool("i", "").with_param(ToolArg::int("n").with_domain(Domain::new(5.0, 1.0)));
        let err = registry.add_tool(inverted).unwrap_err();
        assert!(err.to_string().contains("low > high"));

        assert!(registry.is_empty());
    }

    #[test]
    fn test_tool_doc_is_idempotent() {
        let registry = registry();
        registry
            .add_tool(
                tool("get_weather", "Get the weather")
                    .with_param(ToolArg::string("location").with_description("City")),
            )
            .unwrap();

        let first = registry.tool_doc(&["get_weather"]).unwrap();
        let second = registry.tool_doc(&["get_weather"]).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("※get_weather(location):Get the weather\n  location(string):City\n"));
    }

    #[test]
    fn test_tool_doc_unknown_name() {
        let registry = registry();
        registry.add_tool(tool("a", "")).unwrap();
        assert!(matches!(
            registry.tool_doc(&["a", "zzz"]),
            Err(ToolError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_all_tool_doc_uses_registration_order() {
        let registry = ToolRegistry::with_marker('¶', Arc::new(NoOpLogger::new()));
        registry.add_tools([tool("zeta", "z"), tool("alpha", "a")]).unwrap();

        let doc = registry.all_tool_doc();
        assert!(doc.find("¶zeta:z").unwrap() < doc.find("¶alpha:a").unwrap());
        assert_eq!(doc, registry.tool_doc(&["zeta", "alpha"]).unwrap());
    }
}
