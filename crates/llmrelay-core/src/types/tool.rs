//! Tool parameter schema and value types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Int,
    Float,
    Bool,
    String,
}

impl ArgType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ArgType::Int | ArgType::Float)
    }
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgType::Int => write!(f, "int"),
            ArgType::Float => write!(f, "float"),
            ArgType::Bool => write!(f, "bool"),
            ArgType::String => write!(f, "string"),
        }
    }
}

/// Inclusivity of the two ends of a [`Domain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Endpoint {
    /// `[low, high]`
    #[default]
    #[serde(rename = "[]")]
    Closed,
    /// `(low, high)`
    #[serde(rename = "()")]
    Open,
    /// `(low, high]`
    #[serde(rename = "(]")]
    LeftOpen,
    /// `[low, high)`
    #[serde(rename = "[)")]
    RightOpen,
}

impl Endpoint {
    /// Opening and closing bracket characters
    pub fn brackets(&self) -> (char, char) {
        match self {
            Endpoint::Closed => ('[', ']'),
            Endpoint::Open => ('(', ')'),
            Endpoint::LeftOpen => ('(', ']'),
            Endpoint::RightOpen => ('[', ')'),
        }
    }

    /// Human-readable interval kind
    pub fn kind(&self) -> &'static str {
        match self {
            Endpoint::Closed => "closed interval",
            Endpoint::Open => "open interval",
            Endpoint::LeftOpen | Endpoint::RightOpen => "half-open interval",
        }
    }
}

/// Numeric range a parameter value must fall in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub low: f64,
    pub high: f64,
    #[serde(default)]
    pub endpoint: Endpoint,
}

impl Domain {
    /// Closed interval `[low, high]`
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            endpoint: Endpoint::Closed,
        }
    }

    /// Set the endpoint kind
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// `low <= high`, with NaN bounds rejected
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        match self.endpoint {
            Endpoint::Closed => value >= self.low && value <= self.high,
            Endpoint::Open => value > self.low && value < self.high,
            Endpoint::LeftOpen => value > self.low && value <= self.high,
            Endpoint::RightOpen => value >= self.low && value < self.high,
        }
    }

    /// Interval notation used in error messages, e.g. `[0, 10)`
    pub fn notation(&self) -> String {
        let (open, close) = self.endpoint.brackets();
        format!("{}{}, {}{}", open, self.low, self.high, close)
    }

    /// Compact notation used in tool documentation, e.g. `[0,10)`
    pub fn compact_notation(&self) -> String {
        let (open, close) = self.endpoint.brackets();
        format!("{}{},{}{}", open, self.low, self.high, close)
    }
}

/// One positional parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolArg {
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl ToolArg {
    pub fn new(arg_type: ArgType, name: impl Into<String>) -> Self {
        Self {
            arg_type,
            name: name.into(),
            description: None,
            domain: None,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(ArgType::Int, name)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(ArgType::Float, name)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(ArgType::Bool, name)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(ArgType::String, name)
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the numeric domain
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }
}

/// Coerced argument or tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Anything else a tool chooses to return
    Opaque(Value),
}

impl ToolValue {
    /// Numeric view used for domain checks
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ToolValue::Int(i) => Some(*i as f64),
            ToolValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ToolValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ToolValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Stringification fed back to the model as the call result
impl std::fmt::Display for ToolValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolValue::Int(i) => write!(f, "{}", i),
            ToolValue::Float(x) => write!(f, "{}", x),
            ToolValue::Bool(b) => write!(f, "{}", b),
            ToolValue::Text(s) => write!(f, "{}", s),
            ToolValue::Opaque(Value::String(s)) => write!(f, "{}", s),
            ToolValue::Opaque(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ToolValue {
    fn from(v: i64) -> Self {
        ToolValue::Int(v)
    }
}

impl From<f64> for ToolValue {
    fn from(v: f64) -> Self {
        ToolValue::Float(v)
    }
}

impl From<bool> for ToolValue {
    fn from(v: bool) -> Self {
        ToolValue::Bool(v)
    }
}

impl From<String> for ToolValue {
    fn from(v: String) -> Self {
        ToolValue::Text(v)
    }
}

impl From<&str> for ToolValue {
    fn from(v: &str) -> Self {
        ToolValue::Text(v.to_string())
    }
}

impl From<Value> for ToolValue {
    fn from(v: Value) -> Self {
        ToolValue::Opaque(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_right_open_boundaries() {
        let domain = Domain::new(0.0, 10.0).with_endpoint(Endpoint::RightOpen);
        assert!(domain.contains(0.0));
        assert!(!domain.contains(10.0));
        assert!(domain.contains(9.999));
    }

    #[test]
    fn test_other_endpoint_kinds() {
        let closed = Domain::new(0.0, 1.0);
        assert!(closed.contains(0.0) && closed.contains(1.0));

        let open = Domain::new(0.0, 1.0).with_endpoint(Endpoint::Open);
        assert!(!open.contains(0.0) && !open.contains(1.0) && open.contains(0.5));

        let left_open = Domain::new(0.0, 1.0).with_endpoint(Endpoint::LeftOpen);
        assert!(!left_open.contains(0.0) && left_open.contains(1.0));
    }

    #[test]
    fn test_notation() {
        let domain = Domain::new(0.0, 10.0).with_endpoint(Endpoint::RightOpen);
        assert_eq!(domain.notation(), "[0, 10)");
        assert_eq!(domain.compact_notation(), "[0,10)");
        assert_eq!(Domain::new(-1.5, 2.0).compact_notation(), "[-1.5,2]");
    }

    #[test]
    fn test_domain_well_formed() {
        assert!(Domain::new(1.0, 1.0).is_well_formed());
        assert!(!Domain::new(2.0, 1.0).is_well_formed());
        assert!(!Domain::new(f64::NAN, 1.0).is_well_formed());
    }

    #[test]
    fn test_tool_arg_deserializes_endpoint_tag() {
        let arg: ToolArg = serde_json::from_value(json!({
            "type": "float",
            "name": "ratio",
            "domain": {"low": 0.0, "high": 1.0, "endpoint": "(]"}
        }))
        .unwrap();
        assert_eq!(arg.arg_type, ArgType::Float);
        assert_eq!(arg.domain.unwrap().endpoint, Endpoint::LeftOpen);
    }

    #[test]
    fn test_tool_value_display() {
        assert_eq!(ToolValue::Int(-3).to_string(), "-3");
        assert_eq!(ToolValue::Float(25.0).to_string(), "25");
        assert_eq!(ToolValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ToolValue::Bool(true).to_string(), "true");
        assert_eq!(ToolValue::from("Sunny").to_string(), "Sunny");
        assert_eq!(ToolValue::from(json!({"a": 1})).to_string(), r#"{"a":1}"#);
    }
}
