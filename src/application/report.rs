//! # Report Rendering
//!
//! Turns diff engine results into the text and markdown files the scenario writes,
//! plus the console summary.

use std::fmt::Write as _;

use crate::domain::types::{RankDiff, TopNRanking, WeightedName};

/// One name per line, trailing newline included when non-empty.
pub fn render_name_list(names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

pub fn render_weight_leaders(leaders: &[WeightedName], min_percent: f64) -> String {
    let mut out = format!("Holdings weighing at least {min_percent}%:\n");
    if leaders.is_empty() {
        out.push_str("  (none)\n");
    }
    for (idx, leader) in leaders.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<40} {:>6.2}%", idx + 1, leader.name, leader.weight);
    }
    out
}

/// A single sentence describing the headline changes.
pub fn summary_line(diff: &RankDiff, top_n: usize) -> String {
    if diff.entered.is_empty() && diff.exited.is_empty() && diff.moved.is_empty() {
        return format!("Top {top_n} unchanged.");
    }

    let mut parts = Vec::new();
    if !diff.entered.is_empty() {
        parts.push(format!("{} new ({})", diff.entered.len(), diff.entered.join(", ")));
    }
    if !diff.exited.is_empty() {
        parts.push(format!("{} dropped out ({})", diff.exited.len(), diff.exited.join(", ")));
    }
    if let Some(riser) = diff.moved.first().filter(|m| m.delta > 0) {
        parts.push(format!("biggest riser {} (+{})", riser.name, riser.delta));
    }
    if let Some(faller) = diff.moved.last().filter(|m| m.delta < 0) {
        parts.push(format!("biggest faller {} ({})", faller.name, faller.delta));
    }
    format!("Top {top_n}: {}.", parts.join("; "))
}

/// Labels and data for the top-N change report.
pub struct RankChangeReport<'a> {
    pub previous_label: &'a str,
    pub current_label: &'a str,
    pub top_n: usize,
    pub previous: &'a TopNRanking,
    pub current: &'a TopNRanking,
    pub diff: &'a RankDiff,
    pub generated_at: &'a str,
}

impl RankChangeReport<'_> {
    pub fn to_markdown(&self) -> String {
        let (prev, curr, n) = (self.previous_label, self.current_label, self.top_n);
        let mut out = String::new();

        let _ = writeln!(out, "# Top {n} change: {prev} → {curr}\n");
        let _ = writeln!(out, "_Generated {}_\n", self.generated_at);
        let _ = writeln!(out, "**Summary:** {}\n", summary_line(self.diff, n));

        let _ = writeln!(out, "## Top {n}\n");
        let _ = writeln!(out, "| Rank | {prev} | {curr} |");
        out.push_str("|---:|---|---|\n");
        // Rows run to the deepest rank either period fills; trailing gaps are omitted.
        let last = self
            .previous
            .iter()
            .chain(self.current.iter())
            .map(|(_, rank)| rank)
            .max()
            .unwrap_or(0);
        for rank in 1..=last {
            let _ = writeln!(
                out,
                "| {rank} | {} | {} |",
                name_at(self.previous, rank),
                name_at(self.current, rank)
            );
        }

        let _ = writeln!(out, "\n## New in {curr}\n");
        if self.diff.entered.is_empty() {
            out.push_str("- none\n");
        }
        for name in &self.diff.entered {
            let rank = self.current.get(name).unwrap_or_default();
            let _ = writeln!(out, "- {name} (#{rank})");
        }

        let _ = writeln!(out, "\n## Dropped from {prev}\n");
        if self.diff.exited.is_empty() {
            out.push_str("- none\n");
        }
        for name in &self.diff.exited {
            let rank = self.previous.get(name).unwrap_or_default();
            let _ = writeln!(out, "- {name} (was #{rank})");
        }

        let _ = writeln!(out, "\n## Rank changes\n");
        if self.diff.moved.is_empty() {
            out.push_str("No rank changes among holdings present in both years.\n");
        } else {
            let _ = writeln!(out, "| Name | {prev} | {curr} | Change |");
            out.push_str("|---|---:|---:|---:|\n");
            for m in &self.diff.moved {
                let arrow = if m.delta > 0 { "▲" } else { "▼" };
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {arrow}{} |",
                    m.name,
                    m.previous_rank,
                    m.current_rank,
                    m.delta.abs()
                );
            }
        }

        out
    }
}

fn name_at(ranking: &TopNRanking, rank: u32) -> &str {
    ranking
        .iter()
        .find(|(_, r)| *r == rank)
        .map(|(name, _)| name)
        .unwrap_or("-")
}
