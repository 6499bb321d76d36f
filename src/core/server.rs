//! MCP Server implementation.
//!
//! [`McpServer`] owns the immutable configuration and tool registry and
//! answers JSON-RPC requests. Both transports feed decoded messages into
//! [`McpServer::handle_request`]; the server itself holds no per-connection
//! state.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Tool};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::protocol::{JsonRpcRequest, JsonRpcResponse, negotiate_protocol_version};
use super::transport::TransportKind;
use crate::domains::tools::{Dispatcher, ToolRegistry};

const INSTRUCTIONS: &str = "Math tools server. Call multiply_numbers or divide_numbers; \
     division by zero is reported in the result payload.";

/// The main MCP server handler.
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the shared tool registry.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server with the built-in tools.
    pub fn new(config: Config) -> Result<Self> {
        let registry = ToolRegistry::with_builtin_tools()?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server over an explicitly built registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(Arc::new(registry)),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The transport this server was configured for.
    pub fn transport(&self) -> TransportKind {
        self.config.transport.kind
    }

    /// Registered tool names, in registration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.dispatcher
            .registry()
            .tool_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.dispatcher.registry().list_tools()
    }

    /// Call a tool by name. Never fails; failures are carried in the result.
    pub fn call_tool(&self, name: &str, arguments: &Value) -> CallToolResult {
        self.dispatcher
            .dispatch(name, arguments)
            .into_call_tool_result()
    }

    /// Process one JSON-RPC message. Returns `None` for notifications.
    #[instrument(skip_all, fields(method = %request.method))]
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id, &request.method)
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request.params.as_ref();
        let client = params
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = negotiate_protocol_version(requested);
        info!(
            "Initializing session for client: {} (requested protocol {}, using {})",
            client,
            requested.unwrap_or("none"),
            version
        );

        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": version,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": self.transport().server_name(),
                    "version": self.version()
                },
                "instructions": INSTRUCTIONS
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match serde_json::to_value(self.list_tools()) {
            Ok(tools) => JsonRpcResponse::success(request.id, json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match request.params {
            Some(p) => p,
            None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
        };

        let name = match params.get("name").and_then(Value::as_str) {
            Some(n) => n,
            None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
        };

        let arguments = params.get("arguments").unwrap_or(&Value::Null);
        let result = self.call_tool(name, arguments);

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client sent initialized notification"),
            method => debug!("Received notification: {}", method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::protocol::{METHOD_NOT_FOUND, PROTOCOL_VERSION};

    fn server(kind: TransportKind) -> McpServer {
        let mut config = Config::default();
        config.transport.kind = kind;
        McpServer::new(config).unwrap()
    }

    fn call(server: &McpServer, method: &str, params: Value) -> JsonRpcResponse {
        server
            .handle_request(JsonRpcRequest::new(1, method, Some(params)))
            .expect("request should produce a response")
    }

    #[test]
    fn test_initialize_reports_transport_server_name() {
        let response = call(&server(TransportKind::Http), "initialize", json!({}));
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "MathToolsHTTP");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn test_initialize_negotiates_protocol_version() {
        let s = server(TransportKind::Sse);

        let response = call(&s, "initialize", json!({"protocolVersion": "2025-03-26"}));
        assert_eq!(response.result.unwrap()["protocolVersion"], "2025-03-26");

        let response = call(&s, "initialize", json!({"protocolVersion": "1999-01-01"}));
        assert_eq!(response.result.unwrap()["protocolVersion"], PROTOCOL_VERSION);
    }

    #[test]
    fn test_tools_list() {
        let response = call(&server(TransportKind::Sse), "tools/list", json!({}));
        let tools = response.result.unwrap()["tools"].clone();
        let names: Vec<_> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["multiply_numbers", "divide_numbers"]);
        assert_eq!(tools[0]["inputSchema"]["properties"]["a"]["default"], 2.0);
    }

    #[test]
    fn test_tools_call_success() {
        let response = call(
            &server(TransportKind::Sse),
            "tools/call",
            json!({"name": "multiply_numbers", "arguments": {"a": 3, "b": 4}}),
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["result"], 12.0);
        assert_eq!(result["content"][0]["type"], "text");
    }

    #[test]
    fn test_tools_call_unknown_tool_is_result_not_rpc_error() {
        let response = call(
            &server(TransportKind::Sse),
            "tools/call",
            json!({"name": "nonexistent_tool"}),
        );
        assert!(!response.is_error());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"]["kind"], "tool_not_found");
    }

    #[test]
    fn test_tools_call_missing_name() {
        let response = call(&server(TransportKind::Sse), "tools/call", json!({}));
        assert_eq!(response.error.unwrap().code, crate::core::protocol::INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method_and_notification() {
        let s = server(TransportKind::Sse);
        let response = call(&s, "resources/list", json!({}));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);

        let notification = JsonRpcRequest {
            id: None,
            ..JsonRpcRequest::new(0, "notifications/initialized", None)
        };
        assert!(s.handle_request(notification).is_none());
    }

    #[test]
    fn test_ping() {
        let response = call(&server(TransportKind::Http), "ping", json!({}));
        assert_eq!(response.result.unwrap(), json!({}));
        assert_eq!(response.id, json!(1));
    }
}
