pub const SERVER_STOPPED: &str = "Filesystem MCP server stopped";
pub const SCENARIO_START: &str = "Starting portfolio comparison...";
pub const EMPTY_RANKING: &str = "A top-N ranking is empty; check the rank column name and values";

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn server_started(root: &str) -> String {
    format!("Filesystem MCP server serving root {root}")
}

pub fn mcp_connected(server: &str) -> String {
    format!("Connected to MCP tool server {server}")
}

pub fn traversal_blocked(path: &str) -> String {
    format!("Blocked path outside the sandbox: {path:?}")
}

pub fn dangling_symlink(path: &str) -> String {
    format!("Blocked path through an unresolvable symlink: {path:?}")
}

pub fn tool_rejected(err: &str) -> String {
    format!("Tool call rejected: {err}")
}

pub fn listed(dir: &str, count: usize) -> String {
    format!("Listed {count} entries under {dir}")
}

pub fn file_written(path: &str, bytes: u64) -> String {
    format!("Wrote {bytes} bytes to {path}")
}

pub fn csv_read(path: &str, rows: u64) -> String {
    format!("Read {rows} rows from {path}")
}

pub fn files_found(count: usize) -> String {
    format!("Sandbox root holds {count} files")
}

pub fn snapshot_loaded(file: &str, label: &str, rows: usize) -> String {
    format!("Loaded {rows} rows from {file} as '{label}'")
}

pub fn preview_truncated(file: &str, shown: usize, total: u64) -> String {
    format!("Only {shown} of {total} rows of {file} were read; raise portfolio.preview_rows to compare all of them")
}

pub fn verified(path: &str) -> String {
    format!("Verified {path} reads back as written")
}

pub fn verification_failed(path: &str) -> String {
    format!("{path} does not match what was written")
}

pub fn security_abort(step: &str, err: &str) -> String {
    format!("Sandbox violation in {step}, aborting: {err}")
}

pub fn scenario_done(summary: &str) -> String {
    format!("Portfolio comparison finished. {summary}")
}
