//! Transport configuration types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// Path the SSE event stream is mounted at.
pub const SSE_PATH: &str = "/sse";

/// Path SSE clients post messages to.
pub const SSE_MESSAGE_PATH: &str = "/messages/";

/// Path the stateless HTTP transport is mounted at.
pub const HTTP_PATH: &str = "/mcp";

/// Which transport a server process runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Stateful server-sent events transport.
    #[default]
    Sse,
    /// Stateless streamable HTTP transport.
    Http,
}

impl TransportKind {
    /// Path the transport's primary endpoint is mounted at.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Sse => SSE_PATH,
            Self::Http => HTTP_PATH,
        }
    }

    /// Upper-case label used in `/info`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sse => "SSE",
            Self::Http => "HTTP",
        }
    }

    /// Server name reported in `initialize`.
    pub fn server_name(&self) -> &'static str {
        match self {
            Self::Sse => "MathToolsSSE",
            Self::Http => "MathToolsHTTP",
        }
    }
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sse" => Ok(Self::Sse),
            "http" | "streamable-http" => Ok(Self::Http),
            other => Err(Error::config(format!(
                "Unsupported transport type: {} (expected sse, http or streamable-http)",
                other
            ))),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Selected transport.
    pub kind: TransportKind,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Restart the server from this configuration when it fails.
    #[serde(default)]
    pub reload: bool,

    /// SSE session settings (ignored by the HTTP transport).
    #[serde(default)]
    pub sse: SseConfig,
}

/// SSE session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Interval between keep-alive comments on an open stream.
    pub keep_alive_secs: u64,

    /// Close a session after this long without inbound messages.
    pub idle_timeout_secs: Option<u64>,

    /// Per-session queue depth for inbound messages.
    pub queue_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: 15,
            idle_timeout_secs: None,
            queue_capacity: 64,
        }
    }
}

impl SseConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            host: default_host(),
            port: default_port(),
            reload: false,
            sse: SseConfig::default(),
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();

        if let Ok(transport) = std::env::var("MCP_TRANSPORT") {
            config.kind = transport.parse()?;
        }

        if let Ok(host) = std::env::var("MCP_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            config.port = parse_env("PORT", &port)?;
        }

        if let Ok(secs) = std::env::var("MCP_SSE_KEEP_ALIVE_SECS") {
            config.sse.keep_alive_secs = parse_env("MCP_SSE_KEEP_ALIVE_SECS", &secs)?;
        }

        if let Ok(secs) = std::env::var("MCP_SESSION_IDLE_TIMEOUT_SECS") {
            config.sse.idle_timeout_secs =
                Some(parse_env("MCP_SESSION_IDLE_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!(
            "{} on {}{}",
            self.kind.label(),
            self.address(),
            self.kind.endpoint()
        )
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {}: {}", name, value)))
}
