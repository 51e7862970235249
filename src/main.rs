//! # Main Entry Point
//!
//! `portfolio-agent` compares a personal portfolio against two periods of a reference
//! portfolio, using the sandboxed filesystem tools:
//! - Domain: Configuration, Types, Errors
//! - Infrastructure: Sandbox, Tools, MCP client/server
//! - Application: Diff engine, Reports, Scenario, Logging

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use portfolio_agent::application::logging::{self, ConsoleTarget};
use portfolio_agent::application::portfolio::{diff_and_move, top_n_by_rank};
use portfolio_agent::application::report::{self, RankChangeReport};
use portfolio_agent::application::scenario::PortfolioScenario;
use portfolio_agent::application::snapshot;
use portfolio_agent::domain::config::AppConfig;
use portfolio_agent::domain::paths;
use portfolio_agent::domain::traits::ToolChannel;
use portfolio_agent::infrastructure::mcp::{LocalToolChannel, McpClient};
use portfolio_agent::infrastructure::sandbox::PathSandbox;
use portfolio_agent::infrastructure::tools::executor::{ToolConfig, ToolExecutor};
use portfolio_agent::strings::{logs, messages};

#[derive(Parser)]
#[command(name = "portfolio-agent", version, about = "Compare portfolios through sandboxed filesystem tools")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = paths::CONFIG_FILE)]
    config: PathBuf,

    /// Sandbox root, overriding `sandbox.root_dir`
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Call the tools in-process instead of spawning the MCP server
    #[arg(long, global = true)]
    in_process: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full comparison and write the reports into the sandbox
    Run,
    /// Print the top-N change report for two CSV files inside the sandbox
    Diff {
        previous: String,
        current: String,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// List the tools the MCP server exposes
    Tools,
}

/// The tool channel in use, so it can be shut down cleanly.
enum Channel {
    Local(LocalToolChannel),
    Mcp(McpClient),
}

impl Channel {
    async fn open(cli: &Cli, config: &AppConfig, root: &Path) -> Result<Self> {
        if cli.in_process {
            let sandbox = PathSandbox::new(root)
                .with_context(|| format!("Invalid sandbox root {}", root.display()))?;
            let tools = ToolExecutor::new(
                sandbox,
                ToolConfig {
                    max_read_bytes: config.sandbox.max_read_bytes,
                },
            );
            return Ok(Self::Local(LocalToolChannel::new(tools)));
        }

        let server = match &config.server.command {
            Some(command) => command.clone(),
            None => std::env::current_exe()
                .context("Failed to locate the running executable")?
                .with_file_name(paths::SERVER_BINARY),
        };
        let mut args = vec![
            "--root".to_string(),
            root.display().to_string(),
            "--max-read-bytes".to_string(),
            config.sandbox.max_read_bytes.to_string(),
            "--config".to_string(),
            cli.config.display().to_string(),
        ];
        args.extend(config.server.args.iter().cloned());

        Ok(Self::Mcp(McpClient::spawn(&server, &args).await?))
    }

    fn tools(&self) -> &dyn ToolChannel {
        match self {
            Self::Local(local) => local,
            Self::Mcp(client) => client,
        }
    }

    async fn close(self) -> Result<()> {
        match self {
            Self::Local(_) => Ok(()),
            Self::Mcp(client) => client.shutdown().await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = logging::init(&config.logging, ConsoleTarget::Stdout)?;
    tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));

    // 3. Sandbox root
    let root = cli.root.clone().unwrap_or_else(|| config.sandbox.root_dir.clone());
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create sandbox root {}", root.display()))?;

    // 4. Dispatch
    let channel = Channel::open(&cli, &config, &root).await?;
    let outcome = match &cli.command {
        Commands::Run => run(channel.tools(), &config).await,
        Commands::Diff {
            previous,
            current,
            top_n,
        } => diff(channel.tools(), &config, previous, current, *top_n).await,
        Commands::Tools => list_tools(&channel).await,
    };
    channel.close().await?;
    outcome
}

async fn run(channel: &dyn ToolChannel, config: &AppConfig) -> Result<()> {
    let report = PortfolioScenario::new(channel, &config.portfolio).run().await?;

    println!("{}", messages::RUN_HEADER);
    println!("{}", messages::file_count(report.file_count));
    println!("{}", messages::only_in_mine(&report.only_in_mine));
    print!(
        "{}",
        report::render_weight_leaders(&report.weight_leaders, config.portfolio.min_weight_percent)
    );
    println!("{}", messages::summary(&report.summary));
    for receipt in &report.written {
        println!("{}", messages::written(&receipt.path, receipt.bytes_written));
    }
    Ok(())
}

async fn diff(
    channel: &dyn ToolChannel,
    config: &AppConfig,
    previous: &str,
    current: &str,
    top_n: Option<usize>,
) -> Result<()> {
    let cfg = &config.portfolio;
    let n = top_n.unwrap_or(cfg.top_n);

    let mut rankings = Vec::with_capacity(2);
    for file in [previous, current] {
        let stats = channel
            .read_csv_stats(file, cfg.preview_rows)
            .await
            .with_context(|| format!("Failed to read {file}"))?;
        let snapshot = snapshot::from_csv_stats(&paths::period_label(file), &stats, &cfg.columns)?;
        rankings.push((snapshot.label().to_string(), top_n_by_rank(&snapshot, n)));
    }
    let (curr_label, curr_top) = rankings.pop().context("missing current ranking")?;
    let (prev_label, prev_top) = rankings.pop().context("missing previous ranking")?;

    let diff = diff_and_move(&prev_top, &curr_top);
    let markdown = RankChangeReport {
        previous_label: &prev_label,
        current_label: &curr_label,
        top_n: n,
        previous: &prev_top,
        current: &curr_top,
        diff: &diff,
        generated_at: &chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
    }
    .to_markdown();

    print!("{markdown}");
    Ok(())
}

async fn list_tools(channel: &Channel) -> Result<()> {
    println!("{}", messages::TOOLS_HEADER);
    let names = match channel {
        Channel::Mcp(client) => client.tool_names().await?,
        Channel::Local(_) => portfolio_agent::infrastructure::mcp::protocol::TOOL_NAMES
            .iter()
            .map(|n| n.to_string())
            .collect(),
    };
    for name in names {
        println!("  - {name}");
    }
    Ok(())
}
