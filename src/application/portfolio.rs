//! # Portfolio Diff Engine
//!
//! Pure comparisons over [`PortfolioSnapshot`]s: name sets, top-N rankings, ranking
//! movement between two periods and weight filtering.
//!
//! Parsing is lenient. Rank and weight cells go through [`try_parse_rank`] and
//! [`try_parse_percent`]; rows whose fields do not parse are dropped from the result
//! that needs them, never reported as errors.

use std::collections::{BTreeSet, HashSet};

use crate::domain::types::{
    MovementRecord, PortfolioSnapshot, RankDiff, TopNRanking, WeightedName,
};

/// Parses a one-based rank. Accepts `"3"`, `" 3 "` and `"3.0"`; rejects zero,
/// negatives and fractional values.
pub fn try_parse_rank(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(rank) = trimmed.parse::<u32>() {
        return (rank >= 1).then_some(rank);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Parses a percentage such as `"2.5%"` or `"  1.0 % "` into `2.5` / `1.0`.
pub fn try_parse_percent(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Every distinct non-empty name in the snapshot.
pub fn extract_names(snapshot: &PortfolioSnapshot) -> BTreeSet<String> {
    snapshot
        .rows()
        .iter()
        .filter_map(|row| row.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names in `mine` that do not appear in `other`, in ascending order.
pub fn only_in(mine: &PortfolioSnapshot, other: &PortfolioSnapshot) -> Vec<String> {
    let theirs = extract_names(other);
    extract_names(mine)
        .into_iter()
        .filter(|name| !theirs.contains(name))
        .collect()
}

/// Name to rank for rows ranked `1..=n`.
///
/// Well-formed input has unique ranks `1..=n`. When a rank or a name repeats, the first
/// row wins and later ones are dropped; rows without a name or with a rank outside the
/// range are dropped as well.
pub fn top_n_by_rank(snapshot: &PortfolioSnapshot, n: usize) -> TopNRanking {
    let mut seen_ranks = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut entries = Vec::new();

    for row in snapshot.rows() {
        let (Some(rank), Some(name)) = (row.rank, row.name.as_deref()) else {
            continue;
        };
        if rank == 0 || rank as usize > n {
            continue;
        }
        if seen_ranks.contains(&rank) || seen_names.contains(name) {
            continue;
        }
        seen_ranks.insert(rank);
        seen_names.insert(name.to_string());
        entries.push((name.to_string(), rank));
    }

    TopNRanking::from_unique(entries)
}

/// Compares two rankings.
///
/// * `entered` - in `current` only, by current rank
/// * `exited` - in `previous` only, by previous rank
/// * `moved` - in both with a changed rank, largest climb first, ties by name
pub fn diff_and_move(previous: &TopNRanking, current: &TopNRanking) -> RankDiff {
    let entered = current
        .iter()
        .filter(|(name, _)| !previous.contains(name))
        .map(|(name, _)| name.to_string())
        .collect();

    let exited = previous
        .iter()
        .filter(|(name, _)| !current.contains(name))
        .map(|(name, _)| name.to_string())
        .collect();

    let mut moved: Vec<MovementRecord> = current
        .iter()
        .filter_map(|(name, current_rank)| {
            let previous_rank = previous.get(name)?;
            let delta = i64::from(previous_rank) - i64::from(current_rank);
            (delta != 0).then(|| MovementRecord {
                name: name.to_string(),
                previous_rank,
                current_rank,
                delta,
            })
        })
        .collect();
    moved.sort_by(|a, b| b.delta.cmp(&a.delta).then_with(|| a.name.cmp(&b.name)));

    RankDiff {
        entered,
        exited,
        moved,
    }
}

/// Rows weighing at least `min_percent`, heaviest first. Equal weights keep row order.
pub fn weight_filter(snapshot: &PortfolioSnapshot, min_percent: f64) -> Vec<WeightedName> {
    let mut kept: Vec<WeightedName> = snapshot
        .rows()
        .iter()
        .filter_map(|row| {
            let weight = row.weight?;
            let name = row.name.as_ref()?;
            (weight >= min_percent).then(|| WeightedName {
                weight,
                name: name.clone(),
            })
        })
        .collect();
    // sort_by is stable
    kept.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    kept
}
