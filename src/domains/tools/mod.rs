//! Tools domain module.
//!
//! Tools are named operations with typed parameters that MCP clients can
//! invoke through `tools/call`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `descriptor.rs` - Tool descriptors, parameter specs and argument coercion
//! - `registry.rs` - Immutable tool registry built at startup
//! - `dispatcher.rs` - Resolves and invokes tools, producing structured results
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` exposing a `descriptor()` constructor
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `ToolRegistry::with_builtin_tools()`

pub mod definitions;
mod descriptor;
mod dispatcher;
mod error;
mod registry;

pub use descriptor::{ParamKind, ParamSpec, ToolArguments, ToolDescriptor, ToolHandler};
pub use dispatcher::{Dispatcher, FailureKind, InvocationFailure, InvocationResult};
pub use error::ToolError;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
