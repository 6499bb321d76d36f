//! SSE transport implementation.
//!
//! Stateful transport: `GET /sse` opens an event stream bound to a new
//! session. The first event (`endpoint`) tells the client where to post
//! messages; responses come back on the stream as `message` events.

use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::TransportError;
use super::config::{SSE_MESSAGE_PATH, SSE_PATH};
use super::session::{SessionManager, SessionStream};
use crate::core::McpServer;
use crate::core::protocol::{JsonRpcResponse, decode_request};

/// Shared state for the SSE routes.
#[derive(Debug, Clone)]
pub struct SseState {
    server: McpServer,
    sessions: SessionManager,
    keep_alive: Duration,
}

/// Query parameters of the message endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    session_id: Option<String>,
}

/// SSE transport handler.
pub struct SseTransport;

impl SseTransport {
    /// Build the shared state from the server's SSE settings.
    pub fn state(server: McpServer) -> SseState {
        let sse = &server.config().transport.sse;
        let sessions = SessionManager::new(sse.queue_capacity, sse.idle_timeout());
        let keep_alive = sse.keep_alive();

        SseState {
            server,
            sessions,
            keep_alive,
        }
    }

    /// Routes for the SSE transport.
    pub fn router(state: SseState) -> Router {
        Router::new()
            .route(SSE_PATH, get(handle_sse))
            .route(SSE_MESSAGE_PATH, post(handle_message))
            .route("/messages", post(handle_message))
            .with_state(state)
    }
}

/// Open a session and stream its responses.
#[instrument(skip_all)]
async fn handle_sse(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let SessionStream { id, responses } = state.sessions.open(state.server.clone()).await;
    info!("SSE stream opened for session {}", id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", SSE_MESSAGE_PATH, id));

    let messages = stream::unfold(responses, |mut rx| async move {
        rx.recv().await.map(|response| (response, rx))
    })
    .map(|response: JsonRpcResponse| Event::default().event("message").json_data(response));

    let events = stream::once(async move { Ok::<_, axum::Error>(endpoint) }).chain(messages);

    Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive))
}

/// Accept one JSON-RPC message for an open session.
#[instrument(skip_all, fields(session_id))]
async fn handle_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id.filter(|s| !s.is_empty()) else {
        warn!("Message received without session_id");
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    tracing::Span::current().record("session_id", session_id.as_str());

    if Uuid::parse_str(&session_id).is_err() {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    }

    if !state.sessions.contains(&session_id).await {
        warn!("Message for unknown session {}", session_id);
        return TransportError::SessionNotFound(session_id).into_response();
    }

    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(rejection) => {
            let reason = rejection
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "Could not parse message".to_string());
            warn!("Rejected message for session {}: {}", session_id, reason);
            return TransportError::protocol(reason).into_response();
        }
    };

    match state.sessions.enqueue(&session_id, request).await {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(e) => {
            warn!("Failed to queue message: {}", e);
            e.into_response()
        }
    }
}
