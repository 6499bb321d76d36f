//! Stateless HTTP transport implementation.
//!
//! Each `POST /mcp` carries one JSON-RPC message and receives one
//! response. No session id is issued and nothing survives between calls.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use super::config::HTTP_PATH;
use crate::core::McpServer;
use crate::core::protocol::decode_request;

/// HTTP transport handler.
pub struct HttpTransport;

impl HttpTransport {
    /// Routes for the stateless transport.
    pub fn router(server: McpServer) -> Router {
        Router::new()
            .route(HTTP_PATH, post(handle_rpc))
            .with_state(server)
    }
}

/// Handle one JSON-RPC message.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(State(server): State<McpServer>, body: Bytes) -> Response {
    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected JSON-RPC message: {:?}", rejection.error);
            return (StatusCode::BAD_REQUEST, Json(rejection)).into_response();
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    match server.handle_request(request) {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::protocol::{INVALID_REQUEST, PARSE_ERROR};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut config = Config::default();
        config.transport.kind = crate::core::transport::TransportKind::Http;
        HttpTransport::router(McpServer::new(config).unwrap())
    }

    async fn post(router: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("should build request");

        let response = router.oneshot(request).await.expect("should get response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("should collect body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("should be json")
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_tools_call() {
        let (status, body) = post(
            router(),
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"divide_numbers","arguments":{"a":9,"b":3}}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["structuredContent"]["result"], 3.0);
    }

    #[tokio::test]
    async fn test_notification_accepted() {
        let (status, body) = post(
            router(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = post(router(), r#"{"invalid json"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let (status, body) = post(router(), r#"{"id":1,"method":"ping"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_null_id_gets_error_response() {
        let (status, body) = post(
            router(),
            r#"{"jsonrpc":"2.0","id":null,"method":"tools/call","params":{"name":"multiply_numbers"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], INVALID_REQUEST);
        assert!(body["id"].is_null());
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn test_get_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/mcp")
            .body(Body::empty())
            .expect("should build request");
        let response = router().oneshot(request).await.expect("should get response");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let router = router();
        let divide = post(
            router.clone(),
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"divide_numbers","arguments":{"a":1,"b":0}}}"#,
        );
        let multiply = post(
            router.clone(),
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"multiply_numbers","arguments":{"a":6,"b":7}}}"#,
        );

        let ((_, divided), (_, multiplied)) = tokio::join!(divide, multiply);
        assert_eq!(
            divided["result"]["structuredContent"]["error"],
            "Division by zero is not allowed"
        );
        assert_eq!(multiplied["result"]["structuredContent"]["result"], 42.0);
        assert!(multiplied["result"]["structuredContent"].get("error").is_none());
    }
}
