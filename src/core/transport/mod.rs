//! Transport layer for the MCP server.
//!
//! Two mutually exclusive transports are available, selected at startup:
//! - **SSE**: stateful event stream at `/sse`, messages posted to `/messages/`
//! - **HTTP**: stateless JSON-RPC over `POST /mcp`
//!
//! Both are mounted by the front door, which also serves `/info`,
//! `/health` and the OAuth metadata stub.

mod config;
mod error;
pub mod front_door;
pub mod http;
mod service;
pub mod session;
pub mod sse;

pub use config::{HTTP_PATH, SSE_MESSAGE_PATH, SSE_PATH, SseConfig, TransportConfig, TransportKind};
pub use error::{TransportError, TransportResult};
pub use front_door::build_router;
pub use service::TransportService;
