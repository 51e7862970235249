// MCP server exposing the sandboxed filesystem tools over stdio.

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;

use portfolio_agent::application::logging::{self, ConsoleTarget};
use portfolio_agent::domain::config::AppConfig;
use portfolio_agent::domain::paths;
use portfolio_agent::infrastructure::mcp::FilesystemServer;
use portfolio_agent::infrastructure::sandbox::PathSandbox;
use portfolio_agent::infrastructure::tools::executor::{ToolConfig, ToolExecutor};
use portfolio_agent::strings::logs;

#[derive(Parser)]
#[command(name = "filesystem-mcp", version, about = "Sandboxed filesystem tools over MCP (stdio)")]
struct ServerArgs {
    /// Directory all tool paths are confined to
    #[arg(long, env = "MCP_ROOT_DIR")]
    root: Option<PathBuf>,

    /// Size ceiling for read_text_file, in bytes
    #[arg(long)]
    max_read_bytes: Option<u64>,

    /// Configuration file
    #[arg(long, default_value = paths::CONFIG_FILE)]
    config: PathBuf,

    /// Directory for the server log file
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    let mut config = AppConfig::load(&args.config)?;
    if let Some(dir) = args.log_dir {
        config.logging.dir = dir;
    }
    config.logging.file = "filesystem-mcp.log".to_string();

    // stdout carries the protocol
    let _guard = logging::init(&config.logging, ConsoleTarget::Stderr)?;

    let root = args.root.unwrap_or(config.sandbox.root_dir);
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create sandbox root {}", root.display()))?;
    let sandbox = PathSandbox::new(&root)?;
    tracing::info!("{}", logs::server_started(&sandbox.root().display().to_string()));

    let tools = ToolExecutor::new(
        sandbox,
        ToolConfig {
            max_read_bytes: args.max_read_bytes.unwrap_or(config.sandbox.max_read_bytes),
        },
    );

    let service = FilesystemServer::new(tools)
        .serve(stdio())
        .await
        .context("Failed to start the MCP server")?;
    service.waiting().await?;

    tracing::info!("{}", logs::SERVER_STOPPED);
    Ok(())
}
