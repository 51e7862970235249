//! # Portfolio Paths
//!
//! Centralized definitions for the sandbox file names the portfolio scenario reads and writes.

pub const CONFIG_FILE: &str = "data/config.yaml";
pub const SERVER_BINARY: &str = "filesystem-mcp";

pub const MY_PORTFOLIO_FILE: &str = "International_stock_portfolio.csv";
pub const NPS_PREVIOUS_FILE: &str = "NPS_International_stock_portfolio_2023.csv";
pub const NPS_CURRENT_FILE: &str = "NPS_International_stock_portfolio_2024.csv";

pub const ONLY_IN_MINE_FILE: &str = "only_in_my_portfolio.txt";
pub const RANK_CHANGE_FILE: &str = "nps_top10_change_2023_to_2024.md";

/// Derives a period label from a file name: the last run of digits in the stem
/// (`..._2024.csv` -> `2024`), or the whole stem when it has no digits.
pub fn period_label(file_name: &str) -> String {
    let stem = std::path::Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let digits: Vec<&str> = stem
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect();

    match digits.last() {
        Some(last) => last.to_string(),
        None => stem,
    }
}
