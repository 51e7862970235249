//! In-process [`ToolChannel`] that calls the [`ToolExecutor`] directly, skipping the MCP transport.

use async_trait::async_trait;

use crate::domain::error::ToolFailure;
use crate::domain::traits::ToolChannel;
use crate::domain::types::{CsvStats, FileEntry, TextFile, WriteReceipt};
use crate::infrastructure::tools::executor::ToolExecutor;

pub struct LocalToolChannel {
    tools: ToolExecutor,
}

impl LocalToolChannel {
    pub fn new(tools: ToolExecutor) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl ToolChannel for LocalToolChannel {
    async fn list_files(
        &self,
        dir_path: &str,
        recursive: bool,
        include_hidden: bool,
    ) -> Result<Vec<FileEntry>, ToolFailure> {
        Ok(self
            .tools
            .list_files(dir_path, recursive, include_hidden)
            .await?)
    }

    async fn read_text_file(&self, file_path: &str) -> Result<TextFile, ToolFailure> {
        Ok(self.tools.read_text_file(file_path).await?)
    }

    async fn create_text_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure> {
        Ok(self
            .tools
            .create_text_file(file_path, content, overwrite)
            .await?)
    }

    async fn create_markdown_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure> {
        Ok(self
            .tools
            .create_markdown_file(file_path, content, overwrite)
            .await?)
    }

    async fn read_csv_stats(
        &self,
        file_path: &str,
        max_rows_preview: usize,
    ) -> Result<CsvStats, ToolFailure> {
        Ok(self
            .tools
            .read_csv_stats(file_path, max_rows_preview)
            .await?)
    }
}
