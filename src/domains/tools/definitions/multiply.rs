//! Multiplication tool.

use serde_json::{Value, json};

use crate::domains::tools::descriptor::{ParamSpec, ToolArguments, ToolDescriptor};
use crate::domains::tools::error::ToolError;

/// Multiplies two numbers.
#[derive(Debug, Clone, Default)]
pub struct MultiplyNumbersTool;

impl MultiplyNumbersTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "multiply_numbers";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Multiply two numbers together";

    pub const DEFAULT_A: f64 = 2.0;
    pub const DEFAULT_B: f64 = 3.5;

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
        json!({
            "operation": "multiplication",
            "a": a,
            "b": b,
            "result": a * b
        })
    }
}
