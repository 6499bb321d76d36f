//! Division tool.
//!
//! Division by zero is reported inside the result payload (`error` set,
//! `result` null) rather than as a failed invocation.

use serde_json::{Value, json};

use crate::domains::tools::descriptor::{ParamSpec, ToolArguments, ToolDescriptor};
use crate::domains::tools::error::ToolError;

/// Divides the first number by the second.
#[derive(Debug, Clone, Default)]
pub struct DivideNumbersTool;

impl DivideNumbersTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "divide_numbers";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Divide first number by second number";

    pub const DEFAULT_A: f64 = 10.0;
    pub const DEFAULT_B: f64 = 2.0;

    pub const DIVISION_BY_ZERO: &'static str = "Division by zero is not allowed";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![
                ParamSpec::number("a").with_default(Self::DEFAULT_A),
                ParamSpec::number("b").with_default(Self::DEFAULT_B),
            ],
            Self::handle,
        )
    }

    fn handle(args: &ToolArguments) -> Result<Value, ToolError> {
        Ok(Self::execute(args.number("a")?, args.number("b")?))
    }

    /// Execute the tool logic.
    pub fn execute(a: f64, b: f64) -> Value {
        if b == 0.0 {
            return json!({
                "operation": "division",
                "a": a,
                "b": b,
                "error": Self::DIVISION_BY_ZERO,
                "result": null
            });
        }

        json!({
            "operation": "division",
            "a": a,
            "b": b,
            "result": a / b
        })
    }
}
