//! # Portfolio Scenario
//!
//! Drives the filesystem tools through a [`ToolChannel`] to compare a personal portfolio
//! against two periods of a reference portfolio, writes the reports back into the
//! sandbox and re-reads them to confirm they were stored.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::portfolio::{
    diff_and_move, only_in, top_n_by_rank, weight_filter,
};
use crate::application::report::{self, RankChangeReport};
use crate::application::snapshot::{self, SnapshotError};
use crate::domain::config::PortfolioConfig;
use crate::domain::error::ToolFailure;
use crate::domain::traits::ToolChannel;
use crate::domain::types::{PortfolioSnapshot, RankDiff, WeightedName, WriteReceipt};
use crate::strings::logs;

#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A tool refused a path outside the sandbox. Never retried.
    #[error("sandbox violation during {step}, aborting: {source}")]
    SecurityViolation {
        step: &'static str,
        #[source]
        source: ToolFailure,
    },

    #[error("{step} failed: {source}")]
    Tool {
        step: &'static str,
        #[source]
        source: ToolFailure,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("{path} did not read back with the content that was written")]
    Verification { path: String },
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub file_count: usize,
    pub only_in_mine: Vec<String>,
    pub weight_leaders: Vec<WeightedName>,
    pub diff: RankDiff,
    pub summary: String,
    pub written: Vec<WriteReceipt>,
}

pub struct PortfolioScenario<'a, C: ToolChannel + ?Sized> {
    channel: &'a C,
    config: &'a PortfolioConfig,
    generated_at: String,
}

impl<'a, C: ToolChannel + ?Sized> PortfolioScenario<'a, C> {
    pub fn new(channel: &'a C, config: &'a PortfolioConfig) -> Self {
        Self {
            channel,
            config,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    pub async fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let cfg = self.config;
        info!("{}", logs::SCENARIO_START);

        // 1. What is in the sandbox
        let entries = check("list_files", self.channel.list_files(".", false, false).await)?;
        let file_count = entries.iter().filter(|e| !e.is_dir).count();
        info!("{}", logs::files_found(file_count));

        // 2. Read the three sources
        let mine = self.load(&cfg.my_portfolio, "mine").await?;
        let previous = self.load(&cfg.previous, &cfg.previous_label()).await?;
        let current = self.load(&cfg.current, &cfg.current_label()).await?;

        // 3. Holdings only in my portfolio
        let only_in_mine = only_in(&mine, &current);
        let only_receipt = check(
            "create_text_file",
            self.channel
                .create_text_file(
                    &cfg.outputs.only_in_mine,
                    &report::render_name_list(&only_in_mine),
                    true,
                )
                .await,
        )?;

        // 4. Heaviest holdings of the current period
        let mut weight_leaders = weight_filter(&current, cfg.min_weight_percent);
        weight_leaders.truncate(cfg.top_n);

        // 5. Top-N movement between the two periods
        let previous_top = top_n_by_rank(&previous, cfg.top_n);
        let current_top = top_n_by_rank(&current, cfg.top_n);
        if previous_top.is_empty() || current_top.is_empty() {
            warn!("{}", logs::EMPTY_RANKING);
        }
        let diff = diff_and_move(&previous_top, &current_top);
        let summary = report::summary_line(&diff, cfg.top_n);

        let markdown = RankChangeReport {
            previous_label: previous.label(),
            current_label: current.label(),
            top_n: cfg.top_n,
            previous: &previous_top,
            current: &current_top,
            diff: &diff,
            generated_at: &self.generated_at,
        }
        .to_markdown();
        let change_receipt = check(
            "create_markdown_file",
            self.channel
                .create_markdown_file(&cfg.outputs.rank_change, &markdown, true)
                .await,
        )?;

        // 6. Confirm both files were stored
        self.verify(&only_receipt.path, &report::render_name_list(&only_in_mine))
            .await?;
        self.verify(&change_receipt.path, &markdown).await?;

        info!("{}", logs::scenario_done(&summary));
        Ok(ScenarioReport {
            file_count,
            only_in_mine,
            weight_leaders,
            diff,
            summary,
            written: vec![only_receipt, change_receipt],
        })
    }

    async fn load(&self, file: &str, label: &str) -> Result<PortfolioSnapshot, ScenarioError> {
        let stats = check(
            "read_csv_stats",
            self.channel
                .read_csv_stats(file, self.config.preview_rows)
                .await,
        )?;
        if stats.row_count > stats.preview.len() as u64 {
            warn!("{}", logs::preview_truncated(file, stats.preview.len(), stats.row_count));
        }
        let snapshot = snapshot::from_csv_stats(label, &stats, &self.config.columns)?;
        info!("{}", logs::snapshot_loaded(file, label, snapshot.len()));
        Ok(snapshot)
    }

    async fn verify(&self, path: &str, expected: &str) -> Result<(), ScenarioError> {
        let file = check("read_text_file", self.channel.read_text_file(path).await)?;
        if file.content != expected {
            error!("{}", logs::verification_failed(path));
            return Err(ScenarioError::Verification {
                path: path.to_string(),
            });
        }
        info!("{}", logs::verified(path));
        Ok(())
    }
}

/// Sorts a tool failure into a security abort or an ordinary step failure.
fn check<T>(step: &'static str, result: Result<T, ToolFailure>) -> Result<T, ScenarioError> {
    result.map_err(|source| {
        if source.is_security_violation() {
            error!("{}", logs::security_abort(step, &source.message));
            ScenarioError::SecurityViolation { step, source }
        } else {
            ScenarioError::Tool { step, source }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::infrastructure::mcp::LocalToolChannel;
    use crate::infrastructure::sandbox::PathSandbox;
    use crate::infrastructure::tools::executor::{ToolConfig, ToolExecutor};
    use tempfile::TempDir;

    const MINE: &str = "종목명,수량\nAPPLE INC,10\nTESLA INC,3\nCOUPANG INC,7\n";
    const NPS_2023: &str = "번호,종목명,평가액(억원),자산군 내 비중 (%)\n\
1,APPLE INC,100,5.0%\n\
2,MICROSOFT CORP,90,4.5%\n\
3,AMAZON COM INC,80,2.0%\n\
4,ALPHABET INC,70,0.9%\n";
    const NPS_2024: &str = "번호,종목명,평가액(억원),자산군 내 비중 (%)\n\
1,MICROSOFT CORP,120,5.5%\n\
2,APPLE INC,110,5.1%\n\
3,NVIDIA CORP,90,3.0%\n\
4,AMAZON COM INC,80,0.8%\n";

    fn setup() -> (TempDir, LocalToolChannel, PortfolioConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("International_stock_portfolio.csv"), MINE).unwrap();
        std::fs::write(dir.path().join("NPS_International_stock_portfolio_2023.csv"), NPS_2023).unwrap();
        std::fs::write(dir.path().join("NPS_International_stock_portfolio_2024.csv"), NPS_2024).unwrap();

        let sandbox = PathSandbox::new(dir.path()).unwrap();
        let channel = LocalToolChannel::new(ToolExecutor::new(sandbox, ToolConfig::default()));
        let config = PortfolioConfig {
            top_n: 3,
            ..PortfolioConfig::default()
        };
        (dir, channel, config)
    }

    #[tokio::test]
    async fn test_full_scenario() -> anyhow::Result<()> {
        let (dir, channel, config) = setup();
        let report = PortfolioScenario::new(&channel, &config)
            .with_timestamp("2025-01-01 00:00")
            .run()
            .await?;

        assert_eq!(report.file_count, 3);
        assert_eq!(report.only_in_mine, vec!["COUPANG INC", "TESLA INC"]);

        let leaders: Vec<_> = report.weight_leaders.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(leaders, vec!["MICROSOFT CORP", "APPLE INC", "NVIDIA CORP"]);

        assert_eq!(report.diff.entered, vec!["NVIDIA CORP"]);
        assert_eq!(report.diff.exited, vec!["AMAZON COM INC"]);
        let moved: Vec<_> = report.diff.moved.iter().map(|m| (m.name.as_str(), m.delta)).collect();
        assert_eq!(moved, vec![("MICROSOFT CORP", 1), ("APPLE INC", -1)]);

        let only = std::fs::read_to_string(dir.path().join("only_in_my_portfolio.txt"))?;
        assert_eq!(only, "COUPANG INC\nTESLA INC\n");

        let md = std::fs::read_to_string(dir.path().join("nps_top10_change_2023_to_2024.md"))?;
        assert!(md.starts_with("# Top 3 change: 2023 → 2024"));
        assert!(md.contains("_Generated 2025-01-01 00:00_"));
        assert_eq!(report.written.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_overwrites_reports() -> anyhow::Result<()> {
        let (_dir, channel, config) = setup();
        PortfolioScenario::new(&channel, &config).run().await?;
        let second = PortfolioScenario::new(&channel, &config).run().await?;
        // Reports written by the first run are counted on the second.
        assert_eq!(second.file_count, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_escaping_output_path_aborts() {
        let (_dir, channel, mut config) = setup();
        config.outputs.only_in_mine = "../leak.txt".to_string();

        let err = PortfolioScenario::new(&channel, &config).run().await.unwrap_err();
        match err {
            ScenarioError::SecurityViolation { step, source } => {
                assert_eq!(step, "create_text_file");
                assert_eq!(source.kind, ErrorKind::PathTraversal);
            }
            other => panic!("expected a security violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_input_is_a_tool_failure() {
        let (_dir, channel, mut config) = setup();
        config.previous = "NPS_2022.csv".to_string();

        let err = PortfolioScenario::new(&channel, &config).run().await.unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Tool { source: ToolFailure { kind: ErrorKind::NotFound, .. }, .. }
        ));
    }

    #[tokio::test]
    async fn test_wrong_name_column() {
        let (_dir, channel, mut config) = setup();
        config.columns.name = "Name".to_string();

        let err = PortfolioScenario::new(&channel, &config).run().await.unwrap_err();
        assert!(matches!(err, ScenarioError::Snapshot(_)));
    }
}
