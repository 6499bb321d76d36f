//! JSON-RPC 2.0 message types shared by both transports.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// MCP protocol revision this server answers with by default.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Revisions echoed back when a client asks for them, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", PROTOCOL_VERSION];

/// Pick the revision to answer an `initialize` with.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(PROTOCOL_VERSION)
}

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC request structure. A request without an `id` member is a
/// notification; an explicit `"id": null` decodes as `Some(Value::Null)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, PARSE_ERROR, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_REQUEST, msg)
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INTERNAL_ERROR, msg)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Decode a single JSON-RPC message from raw bytes.
///
/// On failure the returned response carries the JSON-RPC error to send
/// back: `-32700` for malformed JSON, `-32600` for anything that is
/// valid JSON but not a request object, including a request with a
/// `null` id.
pub fn decode_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| JsonRpcResponse::parse_error(format!("Parse error: {}", e)))?;

    let id = value.get("id").cloned();
    if !value.is_object() {
        return Err(JsonRpcResponse::invalid_request(
            None,
            "Invalid Request: expected a single JSON-RPC object",
        ));
    }

    let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::invalid_request(id.clone(), format!("Invalid Request: {}", e))
    })?;

    if request.jsonrpc != "2.0" {
        return Err(JsonRpcResponse::invalid_request(
            id,
            "Invalid Request: jsonrpc must be \"2.0\"",
        ));
    }

    if request.id.as_ref().is_some_and(Value::is_null) {
        return Err(JsonRpcResponse::invalid_request(
            None,
            "Invalid Request: id must not be null",
        ));
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_valid_request() {
        let request =
            decode_request(br#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Some(json!(7)));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_decode_notification() {
        let request =
            decode_request(br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn test_decode_null_id_rejected() {
        let err = decode_request(br#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap_err();
        assert_eq!(err.id, Value::Null);
        assert_eq!(err.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_absent_and_null_id_differ() {
        let absent: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
        let null: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
                .unwrap();
        assert_eq!(absent.id, None);
        assert_eq!(null.id, Some(Value::Null));
        assert!(!null.is_notification());
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_request(br#"{"invalid json"#).unwrap_err();
        assert_eq!(err.error.unwrap().code, PARSE_ERROR);
        assert_eq!(err.id, Value::Null);
    }

    #[test]
    fn test_decode_not_an_object() {
        let err = decode_request(br#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#).unwrap_err();
        assert_eq!(err.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_decode_wrong_version_keeps_id() {
        let err = decode_request(br#"{"jsonrpc":"1.0","id":"abc","method":"ping"}"#).unwrap_err();
        assert_eq!(err.id, json!("abc"));
        assert_eq!(err.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_response_serialization_omits_empty_fields() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({}));
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains("\"result\":{}"));
        assert!(!text.contains("\"error\""));
    }
}
