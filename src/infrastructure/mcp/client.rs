use anyhow::{Context, Result};
use async_trait::async_trait;
use rmcp::{
    RoleClient, ServiceExt,
    model::{CallToolRequestParam, CallToolResult},
    service::{RunningService, ServiceError},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::process::Command;

use crate::domain::error::{ErrorKind, ToolFailure};
use crate::domain::traits::ToolChannel;
use crate::domain::types::{CsvStats, FileEntry, TextFile, WriteReceipt};
use crate::infrastructure::mcp::protocol::{
    self, CreateFileRequest, ListFilesRequest, ReadCsvRequest, ReadFileRequest,
};

/// MCP client for invoking tools on a `filesystem-mcp` server process
///
/// The server is spawned as a child process and spoken to over its stdin/stdout.
/// Dropping the client without calling [`McpClient::shutdown`] kills the child.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Spawn the server binary and complete the MCP handshake
    ///
    /// # Arguments
    /// * `server_path` - Path to the MCP server binary
    /// * `args` - Arguments passed to the server (e.g. `--root <dir>`)
    pub async fn spawn(server_path: &Path, args: &[String]) -> Result<Self> {
        let command = Command::new(server_path).configure(|cmd| {
            cmd.args(args);
        });
        let transport = TokioChildProcess::new(command)
            .with_context(|| format!("Failed to spawn {}", server_path.display()))?;
        let service = ()
            .serve(transport)
            .await
            .context("MCP handshake with the tool server failed")?;

        tracing::info!("{}", crate::strings::logs::mcp_connected(&server_path.display().to_string()));
        Ok(Self { service })
    }

    /// Names of the tools the server advertises
    pub async fn tool_names(&self) -> Result<Vec<String>, ToolFailure> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(service_failure)?;
        Ok(tools.into_iter().map(|t| t.name.to_string()).collect())
    }

    /// Close the session and wait for the server to exit
    pub async fn shutdown(self) -> Result<()> {
        self.service
            .cancel()
            .await
            .context("Failed to stop the tool server")?;
        Ok(())
    }

    async fn call<A, T>(&self, name: &'static str, args: &A) -> Result<T, ToolFailure>
    where
        A: Serialize + Sync,
        T: DeserializeOwned,
    {
        let arguments = serde_json::to_value(args)
            .map_err(|e| ToolFailure::transport(e.to_string()))?
            .as_object()
            .cloned();

        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.into(),
                arguments,
            })
            .await
            .map_err(service_failure)?;

        decode_result(name, result)
    }
}

fn first_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .iter()
        .find_map(|c| c.raw.as_text().map(|t| t.text.as_str()))
}

fn decode_result<T: DeserializeOwned>(name: &str, result: CallToolResult) -> Result<T, ToolFailure> {
    let text = first_text(&result).unwrap_or_default();
    if result.is_error == Some(true) {
        let kind = result
            .structured_content
            .as_ref()
            .and_then(error_kind)
            .or_else(|| {
                let body: serde_json::Value = serde_json::from_str(text).ok()?;
                error_kind(&body)
            })
            .unwrap_or(ErrorKind::Transport);
        return Err(ToolFailure::new(kind, format!("{name}: {text}")));
    }
    serde_json::from_str(text)
        .map_err(|e| ToolFailure::transport(format!("{name} returned malformed JSON: {e}")))
}

/// Reads a `{"kind": ...}` marker.
fn error_kind(value: &serde_json::Value) -> Option<ErrorKind> {
    serde_json::from_value(value.get("kind")?.clone()).ok()
}

/// Recovers the error kind the server attached to an MCP error, if any.
fn service_failure(err: ServiceError) -> ToolFailure {
    match err {
        ServiceError::McpError(data) => {
            let kind = data
                .data
                .as_ref()
                .and_then(error_kind)
                .unwrap_or(ErrorKind::Transport);
            ToolFailure::new(kind, data.message.to_string())
        }
        other => ToolFailure::transport(other.to_string()),
    }
}

#[async_trait]
impl ToolChannel for McpClient {
    async fn list_files(
        &self,
        dir_path: &str,
        recursive: bool,
        include_hidden: bool,
    ) -> Result<Vec<FileEntry>, ToolFailure> {
        let req = ListFilesRequest {
            dir_path: dir_path.to_string(),
            recursive,
            include_hidden,
        };
        self.call(protocol::LIST_FILES, &req).await
    }

    async fn read_text_file(&self, file_path: &str) -> Result<TextFile, ToolFailure> {
        let req = ReadFileRequest {
            file_path: file_path.to_string(),
        };
        self.call(protocol::READ_TEXT_FILE, &req).await
    }

    async fn create_text_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure> {
        let req = CreateFileRequest {
            file_path: file_path.to_string(),
            content: content.to_string(),
            overwrite,
        };
        self.call(protocol::CREATE_TEXT_FILE, &req).await
    }

    async fn create_markdown_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolFailure> {
        let req = CreateFileRequest {
            file_path: file_path.to_string(),
            content: content.to_string(),
            overwrite,
        };
        self.call(protocol::CREATE_MARKDOWN_FILE, &req).await
    }

    async fn read_csv_stats(
        &self,
        file_path: &str,
        max_rows_preview: usize,
    ) -> Result<CsvStats, ToolFailure> {
        let req = ReadCsvRequest {
            file_path: file_path.to_string(),
            max_rows_preview,
        };
        self.call(protocol::READ_CSV_STATS, &req).await
    }
}
