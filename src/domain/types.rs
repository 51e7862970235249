//! # Domain Types
//!
//! Tool payloads exchanged over the tool channel, and the portfolio data model
//! consumed by the diff engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// One entry of a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the sandbox root.
    pub path: String,
    pub is_dir: bool,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteReceipt {
    pub path: String,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColumnStats {
    pub count: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Result of a tabular read: shape, a typed preview and numeric column statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsvStats {
    pub path: String,
    pub columns: Vec<String>,
    pub row_count: u64,
    pub numeric_stats: BTreeMap<String, ColumnStats>,
    pub preview: Vec<Map<String, Value>>,
}

/// One holding. Fields that were missing or failed to parse are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockRow {
    pub rank: Option<u32>,
    pub name: Option<String>,
    pub weight: Option<f64>,
}

impl StockRow {
    pub fn new(rank: Option<u32>, name: &str, weight: Option<f64>) -> Self {
        let name = name.trim();
        Self {
            rank,
            name: (!name.is_empty()).then(|| name.to_string()),
            weight,
        }
    }
}

/// Rows of one CSV source at one point in time. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    label: String,
    rows: Vec<StockRow>,
}

impl PortfolioSnapshot {
    pub fn new(label: impl Into<String>, rows: Vec<StockRow>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rows(&self) -> &[StockRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Name to rank for the top N rows of a snapshot, iterated in ascending rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopNRanking {
    entries: Vec<(String, u32)>,
    index: HashMap<String, u32>,
}

impl TopNRanking {
    /// Builds a ranking from `(name, rank)` pairs that already have unique names and ranks.
    pub(crate) fn from_unique(mut entries: Vec<(String, u32)>) -> Self {
        entries.sort_by_key(|(_, rank)| *rank);
        let index = entries.iter().cloned().collect();
        Self { entries, index }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, rank)| (name.as_str(), *rank))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementRecord {
    pub name: String,
    pub previous_rank: u32,
    pub current_rank: u32,
    /// `previous_rank - current_rank`; positive means the name moved up.
    pub delta: i64,
}

/// Outcome of comparing two top-N rankings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankDiff {
    pub entered: Vec<String>,
    pub exited: Vec<String>,
    pub moved: Vec<MovementRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedName {
    pub weight: f64,
    pub name: String,
}
