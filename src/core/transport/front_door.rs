//! HTTP front door.
//!
//! Mounts the configured transport next to the informational endpoints and
//! wraps everything in permissive CORS and request tracing.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
};
use http::{
    HeaderName, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, HOST},
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::TransportKind;
use super::http::HttpTransport;
use super::sse::SseTransport;
use crate::core::McpServer;

/// Path of the OAuth authorization-server metadata stub.
pub const OAUTH_METADATA_PATH: &str = "/.well-known/oauth-authorization-server";

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Response body of `GET /info`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub server: String,
    pub transport: &'static str,
    pub endpoint: &'static str,
    pub tools: Vec<String>,
    pub version: String,
}

/// Build the complete application router for the server's transport.
pub fn build_router(server: McpServer) -> Router {
    let transport = match server.transport() {
        TransportKind::Sse => SseTransport::router(SseTransport::state(server.clone())),
        TransportKind::Http => HttpTransport::router(server.clone()),
    };

    Router::new()
        .route("/info", get(info_handler))
        .route("/health", get(health_check))
        .route(OAUTH_METADATA_PATH, get(oauth_metadata))
        .with_state(server)
        .merge(transport)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// CORS policy applied to every response.
pub fn cors_layer() -> CorsLayer {
    let headers = [CONTENT_TYPE, AUTHORIZATION, X_API_KEY];

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers.clone())
        .expose_headers(headers)
        .max_age(CORS_MAX_AGE)
}

/// Server, transport and tool overview.
async fn info_handler(State(server): State<McpServer>) -> Json<InfoResponse> {
    let kind = server.transport();
    Json(InfoResponse {
        server: server.name().to_string(),
        transport: kind.label(),
        endpoint: kind.endpoint(),
        tools: server.tool_names(),
        version: server.version().to_string(),
    })
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Minimal authorization-server metadata so clients that probe for it
/// before connecting get a well-formed answer. No credentials are issued.
async fn oauth_metadata(State(server): State<McpServer>, headers: HeaderMap) -> impl IntoResponse {
    Json(serde_json::json!({
        "issuer": base_url(&server, &headers)
    }))
}

/// Base URL as seen by the client, without a trailing slash.
fn base_url(server: &McpServer, headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let transport = &server.config().transport;
            let host = match transport.host.as_str() {
                "0.0.0.0" | "::" => "localhost",
                other => other,
            };
            format!("{}:{}", host, transport.port)
        });

    format!("{}://{}", scheme, host)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn server(kind: TransportKind) -> McpServer {
        let mut config = Config::default();
        config.transport.kind = kind;
        McpServer::new(config).unwrap()
    }

    async fn get_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("should get response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("should collect body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("should be json"))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("should build request")
    }

    #[tokio::test]
    async fn test_info_stateless() {
        let router = build_router(server(TransportKind::Http));
        let (status, body) = get_json(router, get("/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transport"], "HTTP");
        assert_eq!(body["endpoint"], "/mcp");
        assert_eq!(
            body["tools"],
            serde_json::json!(["multiply_numbers", "divide_numbers"])
        );
        assert_eq!(body["server"], "Math Tools MCP Server");
    }

    #[tokio::test]
    async fn test_info_sse() {
        let router = build_router(server(TransportKind::Sse));
        let (_, body) = get_json(router, get("/info")).await;
        assert_eq!(body["transport"], "SSE");
        assert_eq!(body["endpoint"], "/sse");
    }

    #[tokio::test]
    async fn test_oauth_metadata_uses_host_header() {
        let router = build_router(server(TransportKind::Sse));
        let request = Request::builder()
            .uri(OAUTH_METADATA_PATH)
            .header("Host", "mcp.example.com")
            .header("X-Forwarded-Proto", "https")
            .body(Body::empty())
            .unwrap();
        let (status, body) = get_json(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["issuer"], "https://mcp.example.com");
    }

    #[tokio::test]
    async fn test_oauth_metadata_falls_back_to_bind_address() {
        let router = build_router(server(TransportKind::Http));
        let (_, body) = get_json(router, get(OAUTH_METADATA_PATH)).await;
        assert_eq!(body["issuer"], "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(server(TransportKind::Http));
        let (status, body) = get_json(router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_cors_headers_on_responses() {
        let router = build_router(server(TransportKind::Http));
        let request = Request::builder()
            .uri("/info")
            .header("Origin", "https://claude.ai")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let exposed = headers["access-control-expose-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(exposed.contains("x-api-key"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let router = build_router(server(TransportKind::Http));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/mcp")
            .header("Origin", "https://claude.ai")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["access-control-max-age"], "86400");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("OPTIONS"));
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(allowed.contains("authorization"));
    }

    #[tokio::test]
    async fn test_transport_routes_are_exclusive() {
        let router = build_router(server(TransportKind::Http));
        let response = router.oneshot(get("/sse")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
