//! # Messages
//!
//! Console output of the `portfolio-agent` CLI.

pub const RUN_HEADER: &str = "=== Portfolio comparison ===";
pub const TOOLS_HEADER: &str = "Tools exposed by the server:";

pub fn file_count(count: usize) -> String {
    format!("Files in sandbox root: {count}")
}

pub fn only_in_mine(names: &[String]) -> String {
    if names.is_empty() {
        return "Every holding also appears in the reference portfolio.".to_string();
    }
    format!("Only in my portfolio ({}): {}", names.len(), names.join(", "))
}

pub fn written(path: &str, bytes: u64) -> String {
    format!("Saved {path} ({bytes} bytes)")
}

pub fn summary(line: &str) -> String {
    format!("Summary: {line}")
}
