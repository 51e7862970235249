//! Builds [`PortfolioSnapshot`]s from the typed preview rows of a tabular read.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::application::portfolio::{try_parse_percent, try_parse_rank};
use crate::domain::config::ColumnConfig;
use crate::domain::types::{CsvStats, PortfolioSnapshot, StockRow};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("column '{column}' not found in {path} (columns: {available})")]
    MissingColumn {
        column: String,
        path: String,
        available: String,
    },
}

/// Converts the preview of `stats` into a snapshot labelled `label`.
///
/// The name column is required. Rank and weight columns are optional; when absent the
/// corresponding fields are `None` for every row.
pub fn from_csv_stats(
    label: &str,
    stats: &CsvStats,
    columns: &ColumnConfig,
) -> Result<PortfolioSnapshot, SnapshotError> {
    let name_col = find_column(stats, &columns.name).ok_or_else(|| SnapshotError::MissingColumn {
        column: columns.name.clone(),
        path: stats.path.clone(),
        available: stats.columns.join(", "),
    })?;
    let rank_col = find_column(stats, &columns.rank);
    let weight_col = find_column(stats, &columns.weight);

    let rows = stats
        .preview
        .iter()
        .map(|row| StockRow {
            rank: cell(row, rank_col).and_then(|s| try_parse_rank(&s)),
            name: cell(row, Some(name_col))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            weight: cell(row, weight_col).and_then(|s| try_parse_percent(&s)),
        })
        .collect();

    Ok(PortfolioSnapshot::new(label, rows))
}

/// Header as it appears in the file, matched ignoring surrounding whitespace.
fn find_column<'a>(stats: &'a CsvStats, wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim();
    stats
        .columns
        .iter()
        .find(|c| c.trim() == wanted)
        .map(String::as_str)
}

/// Text of a preview cell. Numbers are rendered back to text so every field goes
/// through the same parser.
fn cell(row: &Map<String, Value>, column: Option<&str>) -> Option<String> {
    match row.get(column?)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
