//! Tool definitions and their executable behavior

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::error::{ToolError, ToolResult};
use crate::types::{ToolArg, ToolValue};

/// Named, coerced arguments handed to a tool behavior
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: HashMap<String, ToolValue>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair positional values with parameter names in declared order
    pub fn bind(params: &[ToolArg], values: Vec<ToolValue>) -> Self {
        let values = params
            .iter()
            .map(|p| p.name.clone())
            .zip(values)
            .collect();
        Self { values }
    }

    /// Set an argument
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ToolValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ToolValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ToolValue::as_i64)
    }

    /// Int arguments widen to f64
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ToolValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ToolValue::as_bool)
    }

    /// Like `get_str`, but a missing argument is an execution error
    pub fn require_str(&self, name: &str) -> ToolResult<&str> {
        self.get_str(name)
            .ok_or_else(|| ToolError::execution(format!("missing string argument {}", name)))
    }

    /// Like `get_f64`, but a missing argument is an execution error
    pub fn require_f64(&self, name: &str) -> ToolResult<f64> {
        self.get_f64(name)
            .ok_or_else(|| ToolError::execution(format!("missing numeric argument {}", name)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Executable behavior of a tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn perform(&self, args: ToolArgs) -> ToolResult<ToolValue>;
}

struct AsyncFnHandler<F>(F);

#[async_trait]
impl<F, Fut> ToolHandler for AsyncFnHandler<F>
where
    F: Fn(ToolArgs) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult<ToolValue>> + Send + 'static,
{
    async fn perform(&self, args: ToolArgs) -> ToolResult<ToolValue> {
        (self.0)(args).await
    }
}

struct SyncFnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for SyncFnHandler<F>
where
    F: Fn(ToolArgs) -> ToolResult<ToolValue> + Send + Sync,
{
    async fn perform(&self, args: ToolArgs) -> ToolResult<ToolValue> {
        (self.0)(args)
    }
}

/// A callable tool: name, description, positional parameters and behavior
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    params: Vec<ToolArg>,
    handler: Arc<dyn ToolHandler>,
}

impl Tool {
    /// Create a tool whose behavior is an async closure
    ///
    /// ```
    /// use llmrelay_core::tools::Tool;
    /// use llmrelay_core::types::{ToolArg, ToolValue};
    ///
    /// let tool = Tool::new("get_weather", "Get current weather for a location", |args| async move {
    ///     args.require_str("location")
    ///         .map(|location| ToolValue::Text(format!("Weather in {}: Sunny, 25°C", location)))
    /// })
    /// .with_param(ToolArg::string("location").with_description("City name"));
    /// assert_eq!(tool.params().len(), 1);
    /// ```
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, perform: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<ToolValue>> + Send + 'static,
    {
        Self::from_handler(name, description, Arc::new(AsyncFnHandler(perform)))
    }

    /// Create a tool whose behavior is a plain closure
    pub fn new_sync<F>(name: impl Into<String>, description: impl Into<String>, perform: F) -> Self
    where
        F: Fn(ToolArgs) -> ToolResult<ToolValue> + Send + Sync + 'static,
    {
        Self::from_handler(name, description, Arc::new(SyncFnHandler(perform)))
    }

    /// Create a tool around an existing handler
    pub fn from_handler(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            handler,
        }
    }

    /// Append a positional parameter
    pub fn with_param(mut self, param: ToolArg) -> Self {
        self.params.push(param);
        self
    }

    /// Append several positional parameters
    pub fn with_params(mut self, params: impl IntoIterator<Item = ToolArg>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in positional call order
    pub fn params(&self) -> &[ToolArg] {
        &self.params
    }

    pub(crate) fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish()
    }
}
