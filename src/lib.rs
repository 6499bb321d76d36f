//! Math Tools MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing `multiply_numbers` and
//! `divide_numbers` over one of two transports: a stateful SSE stream or
//! stateless streamable HTTP.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the JSON-RPC protocol layer, the server
//!   handler and the transports
//! - **domains**: business logic
//!   - **tools**: tool descriptors, the registry and the dispatcher
//!
//! # Example
//!
//! ```rust,no_run
//! use math_tools_mcp::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
