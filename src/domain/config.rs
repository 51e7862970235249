//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Every section carries serde defaults, so a missing file or a partial file is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::paths;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

impl AppConfig {
    /// Loads the configuration from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Filesystem sandbox settings for the tool server.
#[derive(Debug, Deserialize, Clone)]
pub struct SandboxConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_read_bytes: default_max_read_bytes(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./sandbox")
}

fn default_max_read_bytes() -> u64 {
    200_000
}

/// How the orchestrator launches the MCP tool server.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server binary. Defaults to `filesystem-mcp` next to the running executable.
    #[serde(default)]
    pub command: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_file() -> String {
    "session.log".to_string()
}

fn default_log_filter() -> String {
    "info,rmcp=warn".to_string()
}

/// Input files, column headers and thresholds for the portfolio scenario.
#[derive(Debug, Deserialize, Clone)]
pub struct PortfolioConfig {
    #[serde(default = "default_my_portfolio")]
    pub my_portfolio: String,
    #[serde(default = "default_previous")]
    pub previous: String,
    #[serde(default = "default_current")]
    pub current: String,
    #[serde(default)]
    pub previous_label: Option<String>,
    #[serde(default)]
    pub current_label: Option<String>,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_min_weight_percent")]
    pub min_weight_percent: f64,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default)]
    pub outputs: OutputConfig,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            my_portfolio: default_my_portfolio(),
            previous: default_previous(),
            current: default_current(),
            previous_label: None,
            current_label: None,
            columns: ColumnConfig::default(),
            top_n: default_top_n(),
            min_weight_percent: default_min_weight_percent(),
            preview_rows: default_preview_rows(),
            outputs: OutputConfig::default(),
        }
    }
}

impl PortfolioConfig {
    pub fn previous_label(&self) -> String {
        self.previous_label
            .clone()
            .unwrap_or_else(|| paths::period_label(&self.previous))
    }

    pub fn current_label(&self) -> String {
        self.current_label
            .clone()
            .unwrap_or_else(|| paths::period_label(&self.current))
    }
}

fn default_my_portfolio() -> String {
    paths::MY_PORTFOLIO_FILE.to_string()
}
fn default_previous() -> String {
    paths::NPS_PREVIOUS_FILE.to_string()
}
fn default_current() -> String {
    paths::NPS_CURRENT_FILE.to_string()
}
fn default_top_n() -> usize {
    10
}
fn default_min_weight_percent() -> f64 {
    1.0
}
fn default_preview_rows() -> usize {
    2_000
}

/// Column headers of the portfolio CSV files.
#[derive(Debug, Deserialize, Clone)]
pub struct ColumnConfig {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_rank_column")]
    pub rank: String,
    #[serde(default = "default_weight_column")]
    pub weight: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            rank: default_rank_column(),
            weight: default_weight_column(),
        }
    }
}

fn default_name_column() -> String {
    "종목명".to_string()
}
fn default_rank_column() -> String {
    "번호".to_string()
}
fn default_weight_column() -> String {
    "자산군 내 비중 (%)".to_string()
}

/// Report files written back into the sandbox.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_only_in_mine")]
    pub only_in_mine: String,
    #[serde(default = "default_rank_change")]
    pub rank_change: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            only_in_mine: default_only_in_mine(),
            rank_change: default_rank_change(),
        }
    }
}

fn default_only_in_mine() -> String {
    paths::ONLY_IN_MINE_FILE.to_string()
}
fn default_rank_change() -> String {
    paths::RANK_CHANGE_FILE.to_string()
}
