//! Tool descriptors: plain data describing a callable tool.
//!
//! A descriptor pairs an ordered parameter list with a handler function.
//! Descriptors are built once at startup and never mutated afterwards.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde_json::{Value, json};

use super::error::ToolError;

/// Handler signature shared by all tools.
pub type ToolHandler = Arc<dyn Fn(&ToolArguments) -> Result<Value, ToolError> + Send + Sync>;

/// Semantic type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    Integer,
    String,
    Boolean,
}

impl ParamKind {
    /// JSON Schema type name for this kind.
    pub fn schema_type(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    /// Coerce a supplied JSON value to this kind.
    ///
    /// Numeric and boolean kinds also accept their string spellings
    /// (`"4.5"`, `"true"`). `null` is never accepted.
    pub fn coerce(&self, name: &str, value: &Value) -> Result<Value, ToolError> {
        let mismatch = || {
            ToolError::invalid_parameter(
                name,
                format!("expected {}, got {}", self.schema_type(), describe(value)),
            )
        };

        match (self, value) {
            (Self::Number, Value::Number(n)) => n.as_f64().map(|f| json!(f)).ok_or_else(mismatch),
            (Self::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| json!(f))
                .ok_or_else(mismatch),
            (Self::Integer, Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Ok(json!(i))
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| json!(f as i64))
                        .ok_or_else(mismatch)
                }
            }
            (Self::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().map(|i| json!(i)).map_err(|_| mismatch())
            }
            (Self::String, Value::String(_)) => Ok(value.clone()),
            (Self::Boolean, Value::Bool(_)) => Ok(value.clone()),
            (Self::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single named parameter of a tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: Cow<'static, str>,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub description: Option<Cow<'static, str>>,
}

impl ParamSpec {
    /// A required number parameter.
    pub fn number(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn new(name: impl Into<Cow<'static, str>>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            description: None,
        }
    }

    /// Set the default value used when the parameter is not supplied.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.kind.schema_type(),
            "title": title_case(&self.name),
        });
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        if let Some(description) = &self.description {
            schema["description"] = json!(description);
        }
        schema
    }
}

/// "max_value" -> "Max Value"
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description of a registered tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub params: Vec<ParamSpec>,
    handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        params: Vec<ParamSpec>,
        handler: F,
    ) -> Self
    where
        F: Fn(&ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            params,
            handler: Arc::new(handler),
        }
    }

    /// Invoke the handler with already-resolved arguments.
    pub fn call(&self, args: &ToolArguments) -> Result<Value, ToolError> {
        (self.handler)(args)
    }

    /// JSON Schema for the tool's input object.
    pub fn input_schema(&self) -> JsonObject {
        let properties: serde_json::Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.default.is_none())
            .map(|p| &*p.name)
            .collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        schema
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Resolved, type-coerced arguments handed to a tool handler.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    values: HashMap<String, Value>,
}

impl ToolArguments {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Fetch a number argument.
    pub fn number(&self, name: &str) -> Result<f64, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolError::internal(format!("argument '{}' is not a number", name)))
    }

    pub fn string(&self, name: &str) -> Result<&str, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::internal(format!("argument '{}' is not a string", name)))
    }
}
