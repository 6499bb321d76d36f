//! MCP Server Entry Point
//!
//! Loads configuration (environment, then command-line overrides),
//! initializes logging and runs the server on the selected transport.
//!
//! ```text
//! math-tools-mcp                                # SSE on port 8000
//! math-tools-mcp --transport http               # HTTP on port 8000
//! math-tools-mcp --port 8001                    # SSE on port 8001
//! math-tools-mcp --transport http --port 8001   # HTTP on port 8001
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use math_tools_mcp::core::{Config, McpServer, TransportKind, TransportService};

#[derive(Parser, Debug)]
#[command(name = "math-tools-mcp")]
#[command(about = "MCP server with math tools over SSE or stateless HTTP")]
#[command(version)]
struct Cli {
    /// Transport type: sse, http or streamable-http (default: sse)
    #[arg(short, long)]
    transport: Option<String>,

    /// Port to run server on (default: 8000, or PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (default: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Restart the server from the same configuration when it fails
    #[arg(long)]
    reload: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    fn apply(self, config: &mut Config) -> math_tools_mcp::Result<()> {
        if let Some(transport) = self.transport {
            config.transport.kind = transport.parse::<TransportKind>()?;
        }
        if let Some(port) = self.port {
            config.transport.port = port;
        }
        if let Some(host) = self.host {
            config.transport.host = host;
        }
        if self.reload {
            config.transport.reload = true;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply(&mut config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    let server = McpServer::new(config.clone())?;

    info!("Server initialized with tools: {}", server.tool_names().join(", "));

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level; output goes to stderr.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
