//! # Domain Traits
//!
//! Abstract interface for the tool channel between the orchestrator and the filesystem tools.
//! Allows for pluggable implementations in the Infrastructure layer (MCP over stdio, in-process).

use async_trait::async_trait;

use crate::domain::error::ToolFailure;
use crate::domain::types::{CsvStats, FileEntry, TextFile, WriteReceipt};

/// Call/response access to the sandboxed filesystem tools.
#[async_trait]
pub trait ToolChannel: Send + Sync {
    /// List entries under `dir_path` (relative to the sandbox root)
    async fn list_files(
        &self,
        dir_path: &str,
        recursive: bool,
        include_hidden: bool,
    ) -> Result<Vec<FileEntry>, ToolFailure>;

    /// Read a UTF-8 text file
    async fn read_text_file(&self, file_path: &str) -> Result<TextFile, ToolFailure>;

    /// Create or replace a text file
    async fn create_text_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure>;

    /// Create or replace a markdown file
    async fn create_markdown_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure>;

    /// Read a CSV file with a row preview and numeric statistics
    async fn read_csv_stats(
        &self,
        file_path: &str,
        max_rows_preview: usize,
    ) -> Result<CsvStats, ToolFailure>;
}
