//! Transport service - binds the listener and runs the front door.

use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::config::SSE_MESSAGE_PATH;
use super::front_door::{OAUTH_METADATA_PATH, build_router};
use super::{TransportConfig, TransportError, TransportKind, TransportResult};
use crate::core::McpServer;

/// Delay before restarting a failed server in reload mode.
const RESTART_DELAY: Duration = Duration::from_millis(500);

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Log information about the configured transport.
    pub fn log_info(&self) {
        info!("Starting transport: {}", self.config.description());
        if self.config.reload {
            info!("Auto-reload: enabled");
        }
    }

    /// Start the transport with the given MCP server.
    ///
    /// Runs until Ctrl-C. With `reload` set, a failed server is rebuilt
    /// from the same configuration and started again. Bind failures are
    /// returned immediately in either mode.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        self.log_info();

        if !self.config.reload {
            return serve(&self.config, server).await;
        }

        loop {
            match serve(&self.config, server.clone()).await {
                Ok(()) => return Ok(()),
                Err(e @ TransportError::BindError { .. }) => return Err(e),
                Err(e) => {
                    error!("Server stopped with error: {}", e);
                    warn!("Restarting in {:?}", RESTART_DELAY);
                    tokio::time::sleep(RESTART_DELAY).await;
                }
            }
        }
    }
}

async fn serve(config: &TransportConfig, server: McpServer) -> TransportResult<()> {
    let addr = config.address();
    let app = build_router(server);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| TransportError::bind(&addr, e))?;

    info!("Ready - listening on {} ({})", addr, config.kind.label());
    info!("  → Endpoint: {}", config.kind.endpoint());
    if config.kind == TransportKind::Sse {
        info!("  → Messages: POST {}", SSE_MESSAGE_PATH);
    }
    info!("  → Info:     GET /info");
    info!("  → OAuth:    GET {}", OAUTH_METADATA_PATH);
    info!("  → Health:   GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TransportError::http(e.to_string()))?;

    info!("Listener on {} closed", addr);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
