//! # Filesystem MCP Server
//!
//! Exposes the [`ToolExecutor`] operations as MCP tools. Results are JSON text content;
//! failures are MCP errors whose `data.kind` carries the [`ErrorKind`](crate::domain::error::ErrorKind).

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::error::ToolError;
use crate::infrastructure::mcp::protocol::{
    CreateFileRequest, ListFilesRequest, ReadCsvRequest, ReadFileRequest,
};
use crate::infrastructure::tools::executor::ToolExecutor;

const INSTRUCTIONS: &str = "Filesystem tools confined to a single root directory. \
All paths are relative to that root; paths that escape it fail with kind `path_traversal`.";

#[derive(Clone)]
pub struct FilesystemServer {
    tools: Arc<ToolExecutor>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FilesystemServer {
    pub fn new(tools: ToolExecutor) -> Self {
        Self {
            tools: Arc::new(tools),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List files and folders under the sandbox root. Returns path, is_dir and size_bytes per entry.")]
    async fn list_files(
        &self,
        Parameters(req): Parameters<ListFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "list_files", path = %req.dir_path, recursive = req.recursive);
        let entries = self
            .tools
            .list_files(&req.dir_path, req.recursive, req.include_hidden)
            .await
            .map_err(to_mcp_error)?;
        json_result(&entries)
    }

    #[tool(description = "Read a UTF-8 text file and return its content.")]
    async fn read_text_file(
        &self,
        Parameters(req): Parameters<ReadFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "read_text_file", path = %req.file_path);
        let file = self
            .tools
            .read_text_file(&req.file_path)
            .await
            .map_err(to_mcp_error)?;
        json_result(&file)
    }

    #[tool(description = "Create a plain text file. Fails if the file exists unless overwrite is true.")]
    async fn create_text_file(
        &self,
        Parameters(req): Parameters<CreateFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "create_text_file", path = %req.file_path, overwrite = req.overwrite);
        let receipt = self
            .tools
            .create_text_file(&req.file_path, &req.content, req.overwrite)
            .await
            .map_err(to_mcp_error)?;
        json_result(&receipt)
    }

    #[tool(description = "Create a markdown file. Fails if the file exists unless overwrite is true.")]
    async fn create_markdown_file(
        &self,
        Parameters(req): Parameters<CreateFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "create_markdown_file", path = %req.file_path, overwrite = req.overwrite);
        let receipt = self
            .tools
            .create_markdown_file(&req.file_path, &req.content, req.overwrite)
            .await
            .map_err(to_mcp_error)?;
        json_result(&receipt)
    }

    #[tool(description = "Read a CSV file. Returns columns, row_count, numeric_stats (count/mean/min/max) and a preview of the first rows.")]
    async fn read_csv_stats(
        &self,
        Parameters(req): Parameters<ReadCsvRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "read_csv_stats", path = %req.file_path, preview = req.max_rows_preview);
        let stats = self
            .tools
            .read_csv_stats(&req.file_path, req.max_rows_preview)
            .await
            .map_err(to_mcp_error)?;
        json_result(&stats)
    }
}

#[tool_handler]
impl ServerHandler for FilesystemServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

pub(crate) fn to_mcp_error(err: ToolError) -> McpError {
    let kind = err.kind();
    if err.is_security_violation() {
        tracing::warn!("{}", crate::strings::logs::tool_rejected(&err.to_string()));
    }
    let data = Some(json!({ "kind": kind }));
    if kind.is_caller_error() {
        McpError::invalid_params(err.to_string(), data)
    } else {
        McpError::internal_error(err.to_string(), data)
    }
}
