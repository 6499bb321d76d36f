//! Session management for the SSE transport.
//!
//! Each open event stream owns one session. Messages posted for a session
//! are queued and drained by a single worker task, so responses leave in
//! the order requests arrived. The worker also owns cleanup: it removes
//! the session when the stream is dropped or the idle timeout fires.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Session identifier handed to clients in the endpoint event.
pub type SessionId = String;

#[derive(Debug, Clone)]
struct SessionHandle {
    inbound: mpsc::Sender<JsonRpcRequest>,
    created_at: DateTime<Utc>,
}

/// Receiving half of a freshly opened session.
#[derive(Debug)]
pub struct SessionStream {
    pub id: SessionId,
    pub responses: mpsc::Receiver<JsonRpcResponse>,
}

/// Tracks open SSE sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    queue_capacity: usize,
    idle_timeout: Option<Duration>,
}

impl SessionManager {
    pub fn new(queue_capacity: usize, idle_timeout: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            queue_capacity: queue_capacity.max(1),
            idle_timeout,
        }
    }

    /// Open a session and start its worker.
    pub async fn open(&self, server: McpServer) -> SessionStream {
        let id = Uuid::new_v4().simple().to_string();
        let (inbound_tx, inbound_rx) = mpsc::channel(self.queue_capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(self.queue_capacity);

        let handle = SessionHandle {
            inbound: inbound_tx,
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(id.clone(), handle);
        info!("Session opened: {}", id);

        tokio::spawn(run_session(
            server,
            id.clone(),
            inbound_rx,
            outbound_tx,
            self.idle_timeout,
            self.sessions.clone(),
        ));

        SessionStream {
            id,
            responses: outbound_rx,
        }
    }

    /// Queue a message for a session.
    pub async fn enqueue(&self, id: &str, request: JsonRpcRequest) -> TransportResult<()> {
        let inbound = self
            .sessions
            .read()
            .await
            .get(id)
            .map(|s| s.inbound.clone())
            .ok_or_else(|| TransportError::SessionNotFound(id.to_string()))?;

        inbound
            .send(request)
            .await
            .map_err(|_| TransportError::SessionClosed(id.to_string()))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

async fn run_session(
    server: McpServer,
    id: SessionId,
    mut inbound: mpsc::Receiver<JsonRpcRequest>,
    outbound: mpsc::Sender<JsonRpcResponse>,
    idle_timeout: Option<Duration>,
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
) {
    loop {
        let idle = async {
            match idle_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = outbound.closed() => {
                debug!("Stream for session {} dropped", id);
                break;
            }
            _ = idle => {
                info!("Session {} idle, closing", id);
                break;
            }
            message = inbound.recv() => {
                let Some(request) = message else { break };
                if let Some(response) = server.handle_request(request) {
                    if outbound.send(response).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    if let Some(session) = sessions.write().await.remove(&id) {
        let lifetime = Utc::now() - session.created_at;
        info!("Session closed: {} (open {}s)", id, lifetime.num_seconds());
    }
}
