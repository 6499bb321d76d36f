//! Request Dispatcher - resolves, validates and invokes tool calls.
//!
//! Every call produces an [`InvocationResult`]. Unknown tools, bad
//! arguments, handler errors and handler panics all become structured
//! failures; nothing propagates past [`Dispatcher::dispatch`].

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::descriptor::{ToolArguments, ToolDescriptor};
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Failure category reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ToolNotFound,
    MissingParameter,
    InvalidParameter,
    InternalError,
}

impl From<&ToolError> for FailureKind {
    fn from(err: &ToolError) -> Self {
        match err {
            ToolError::NotFound(_) => Self::ToolNotFound,
            ToolError::MissingParameter(_) => Self::MissingParameter,
            ToolError::InvalidParameter { .. } => Self::InvalidParameter,
            ToolError::Duplicate(_) | ToolError::Internal(_) => Self::InternalError,
        }
    }
}

/// Structured failure payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Success(Value),
    Failure(InvocationFailure),
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure kind, if this is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f.kind),
        }
    }

    /// Convert into an MCP `tools/call` result.
    ///
    /// The payload is carried both as text content and as structured content.
    pub fn into_call_tool_result(self) -> CallToolResult {
        let (structured, is_error) = match self {
            Self::Success(payload) => (payload, false),
            Self::Failure(failure) => (json!({ "error": failure }), true),
        };

        CallToolResult {
            content: vec![Content::text(structured.to_string())],
            structured_content: Some(structured),
            is_error: Some(is_error),
            meta: None,
        }
    }
}

impl From<ToolError> for InvocationResult {
    fn from(err: ToolError) -> Self {
        Self::Failure(InvocationFailure {
            kind: FailureKind::from(&err),
            message: err.to_string(),
        })
    }
}

/// Dispatches tool invocations against a shared registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Invoke a tool by name with raw JSON arguments.
    #[instrument(skip(self, raw_params))]
    pub fn dispatch(&self, tool_name: &str, raw_params: &Value) -> InvocationResult {
        let result = self
            .registry
            .resolve(tool_name)
            .and_then(|tool| {
                let args = resolve_arguments(&tool, raw_params)?;
                invoke(&tool, &args)
            })
            .map(InvocationResult::Success)
            .unwrap_or_else(InvocationResult::from);

        match &result {
            InvocationResult::Success(_) => info!("Tool call succeeded: {}", tool_name),
            InvocationResult::Failure(f) => {
                warn!("Tool call failed: {} ({:?}: {})", tool_name, f.kind, f.message)
            }
        }

        result
    }
}

/// Merge supplied values over defaults and coerce each to its declared kind.
fn resolve_arguments(
    tool: &ToolDescriptor,
    raw_params: &Value,
) -> Result<ToolArguments, ToolError> {
    let empty = serde_json::Map::new();
    let supplied = match raw_params {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            return Err(ToolError::invalid_parameter(
                "arguments",
                "expected an object of named arguments",
            ));
        }
    };

    let mut values = HashMap::with_capacity(tool.params.len());
    for param in &tool.params {
        let value = match (supplied.get(&*param.name), &param.default) {
            (Some(value), _) => param.kind.coerce(&param.name, value)?,
            (None, Some(default)) => default.clone(),
            (None, None) => return Err(ToolError::missing_parameter(param.name.to_string())),
        };
        values.insert(param.name.to_string(), value);
    }

    Ok(ToolArguments::new(values))
}

fn invoke(tool: &ToolDescriptor, args: &ToolArguments) -> Result<Value, ToolError> {
    match panic::catch_unwind(AssertUnwindSafe(|| tool.call(args))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err @ ToolError::Internal(_))) => Err(err),
        Ok(Err(err)) => Err(ToolError::internal(err.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "handler panicked".to_string());
            Err(ToolError::internal(format!("{} panicked: {}", tool.name, reason)))
        }
    }
}
