//! # Tool Executor
//!
//! Handles the filesystem operations exposed as tools (list, read, create, tabular stats).
//! Every path goes through the [`PathSandbox`] first; the operations themselves are thin
//! async wrappers over `tokio::fs`.

use std::path::{Path, PathBuf};

use crate::domain::error::ToolError;
use crate::domain::types::{CsvStats, FileEntry, TextFile, WriteReceipt};
use crate::infrastructure::sandbox::{PathSandbox, ResolvedPath};
use crate::infrastructure::tools::tabular;

/// Limits applied by the tool executor.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Ceiling for `read_text_file`, in bytes.
    pub max_read_bytes: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            max_read_bytes: 200_000,
        }
    }
}

/// Executes filesystem tools inside a sandbox root.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    sandbox: PathSandbox,
    config: ToolConfig,
}

impl ToolExecutor {
    pub fn new(sandbox: PathSandbox, config: ToolConfig) -> Self {
        Self { sandbox, config }
    }

    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    pub async fn list_files(
        &self,
        dir_path: &str,
        recursive: bool,
        include_hidden: bool,
    ) -> Result<Vec<FileEntry>, ToolError> {
        let dir = self.sandbox.resolve(dir_path)?;
        let meta = self.metadata(&dir, dir_path).await?;
        if !meta.is_dir() {
            return Err(ToolError::NotADirectory(dir_path.to_string()));
        }

        let mut results = Vec::new();
        let mut pending: Vec<PathBuf> = vec![dir.into_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current)
                .await
                .map_err(|e| ToolError::io(dir_path, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ToolError::io(dir_path, e))?
            {
                let name = entry.file_name();
                if !include_hidden && name.to_string_lossy().starts_with('.') {
                    continue;
                }

                // file_type() does not follow symlinks, so linked directories are never descended.
                let file_type = match entry.file_type().await {
                    Ok(ft) => ft,
                    Err(_) => continue,
                };
                let path = entry.path();
                let is_dir = file_type.is_dir();
                let size_bytes = if is_dir {
                    0
                } else {
                    entry.metadata().await.map(|m| m.len()).unwrap_or(0)
                };

                results.push(FileEntry {
                    path: self.relative(&path),
                    is_dir,
                    size_bytes,
                });

                if recursive && is_dir {
                    pending.push(path);
                }
            }
        }

        results.sort_by_cached_key(|e| e.path.to_lowercase());
        tracing::debug!("{}", crate::strings::logs::listed(dir_path, results.len()));
        Ok(results)
    }

    pub async fn read_text_file(&self, file_path: &str) -> Result<TextFile, ToolError> {
        let path = self.sandbox.resolve(file_path)?;
        let meta = self.metadata(&path, file_path).await?;
        if meta.is_dir() {
            return Err(ToolError::IsADirectory(file_path.to_string()));
        }
        if meta.len() > self.config.max_read_bytes {
            return Err(ToolError::TooLarge {
                path: file_path.to_string(),
                size: meta.len(),
                limit: self.config.max_read_bytes,
            });
        }

        let bytes = tokio::fs::read(path.as_path())
            .await
            .map_err(|e| ToolError::io(file_path, e))?;

        Ok(TextFile {
            path: self.sandbox.display(&path),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub async fn create_text_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolError> {
        let path = self.sandbox.resolve(file_path)?;

        match tokio::fs::metadata(path.as_path()).await {
            Ok(meta) if meta.is_dir() => {
                return Err(ToolError::IsADirectory(file_path.to_string()));
            }
            Ok(_) if !overwrite => {
                return Err(ToolError::AlreadyExists(file_path.to_string()));
            }
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                return Err(ToolError::io(file_path, e));
            }
            _ => {}
        }

        if let Some(parent) = path.as_path().parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::io(file_path, e))?;
        }

        tokio::fs::write(path.as_path(), content)
            .await
            .map_err(|e| ToolError::io(file_path, e))?;

        let receipt = WriteReceipt {
            path: self.sandbox.display(&path),
            bytes_written: content.len() as u64,
        };
        tracing::info!("{}", crate::strings::logs::file_written(&receipt.path, receipt.bytes_written));
        Ok(receipt)
    }

    /// Same contract as [`Self::create_text_file`]; kept as its own tool for markdown reports.
    pub async fn create_markdown_file(
        &self,
        file_path: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteReceipt, ToolError> {
        self.create_text_file(file_path, content, overwrite).await
    }

    pub async fn read_csv_stats(
        &self,
        file_path: &str,
        max_rows_preview: usize,
    ) -> Result<CsvStats, ToolError> {
        let path = self.sandbox.resolve(file_path)?;
        let meta = self.metadata(&path, file_path).await?;
        if meta.is_dir() {
            return Err(ToolError::IsADirectory(file_path.to_string()));
        }

        let bytes = tokio::fs::read(path.as_path())
            .await
            .map_err(|e| ToolError::io(file_path, e))?;

        let shown = self.sandbox.display(&path);
        let stats = tabular::summarize(&shown, &bytes, max_rows_preview).map_err(|source| {
            ToolError::Csv {
                path: file_path.to_string(),
                source,
            }
        })?;
        tracing::debug!("{}", crate::strings::logs::csv_read(&shown, stats.row_count));
        Ok(stats)
    }

    async fn metadata(&self, path: &ResolvedPath, requested: &str) -> Result<std::fs::Metadata, ToolError> {
        tokio::fs::metadata(path.as_path())
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound(requested.to_string()),
                _ => ToolError::io(requested, e),
            })
    }

    /// Path of a listed entry relative to the root. Entries come from `read_dir` on a
    /// resolved directory, so they always sit below the root.
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.sandbox.root())
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use tempfile::TempDir;

    fn executor(max_read_bytes: u64) -> (TempDir, ToolExecutor) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = PathSandbox::new(dir.path()).unwrap();
        (dir, ToolExecutor::new(sandbox, ToolConfig { max_read_bytes }))
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() -> anyhow::Result<()> {
        let (_dir, tools) = executor(1_000);
        let content = "line one\n한글 내용\n\ttabbed\n";

        let receipt = tools.create_text_file("notes/today.txt", content, false).await?;
        assert_eq!(receipt.path, "notes/today.txt");
        assert_eq!(receipt.bytes_written, content.len() as u64);

        let file = tools.read_text_file("notes/today.txt").await?;
        assert_eq!(file.content.as_bytes(), content.as_bytes());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_refuses_existing_without_overwrite() -> anyhow::Result<()> {
        let (_dir, tools) = executor(1_000);
        tools.create_text_file("a.txt", "first", false).await?;

        let err = tools.create_text_file("a.txt", "second", false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        tools.create_markdown_file("a.txt", "second", true).await?;
        assert_eq!(tools.read_text_file("a.txt").await?.content, "second");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_over_directory_fails() {
        let (dir, tools) = executor(1_000);
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        let err = tools.create_text_file("folder", "x", true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsADirectory);
    }

    #[tokio::test]
    async fn test_read_errors() {
        let (dir, tools) = executor(4);
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        std::fs::write(dir.path().join("big.txt"), "12345").unwrap();

        let missing = tools.read_text_file("missing.txt").await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let folder = tools.read_text_file("folder").await.unwrap_err();
        assert_eq!(folder.kind(), ErrorKind::IsADirectory);

        let big = tools.read_text_file("big.txt").await.unwrap_err();
        assert_eq!(big.kind(), ErrorKind::TooLarge);

        let escape = tools.read_text_file("../outside.txt").await.unwrap_err();
        assert_eq!(escape.kind(), ErrorKind::PathTraversal);
    }

    #[tokio::test]
    async fn test_write_outside_root_is_blocked() {
        let (_dir, tools) = executor(1_000);
        let err = tools
            .create_text_file("../../escaped.txt", "x", true)
            .await
            .unwrap_err();
        assert!(err.is_security_violation());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_after_missing_parent_blocks_io() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let (dir, tools) = executor(1_000);
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let read = tools
            .read_text_file("missing/../link/secret.txt")
            .await
            .unwrap_err();
        assert_eq!(read.kind(), ErrorKind::PathTraversal);

        let write = tools
            .create_text_file("missing/../link/new.txt", "x", true)
            .await
            .unwrap_err();
        assert_eq!(write.kind(), ErrorKind::PathTraversal);
        assert!(!outside.path().join("new.txt").exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_create_reports_unreadable_parent() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, tools) = executor(1_000);
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits, so only check when the lock holds
        if std::fs::metadata(locked.join("a.txt")).is_err_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied) {
            let err = tools.create_text_file("locked/a.txt", "x", true).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Io);
        }
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn test_list_files() -> anyhow::Result<()> {
        let (dir, tools) = executor(1_000);
        std::fs::create_dir_all(dir.path().join("Sub/inner"))?;
        std::fs::write(dir.path().join("b.csv"), "a,b\n")?;
        std::fs::write(dir.path().join("A.txt"), "hello")?;
        std::fs::write(dir.path().join(".hidden"), "")?;
        std::fs::write(dir.path().join("Sub/inner/deep.txt"), "x")?;

        let top = tools.list_files(".", false, false).await?;
        let names: Vec<_> = top.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(names, vec!["A.txt", "b.csv", "Sub"]);
        assert_eq!(top[0].size_bytes, 5);
        assert!(top[2].is_dir);
        assert_eq!(top[2].size_bytes, 0);

        let all = tools.list_files(".", true, true).await?;
        let names: Vec<_> = all.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            names,
            vec![".hidden", "A.txt", "b.csv", "Sub", "Sub/inner", "Sub/inner/deep.txt"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_list_errors() {
        let (dir, tools) = executor(1_000);
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        let missing = tools.list_files("nope", false, false).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let file = tools.list_files("file.txt", false, false).await.unwrap_err();
        assert_eq!(file.kind(), ErrorKind::NotADirectory);

        let escape = tools.list_files("..", false, false).await.unwrap_err();
        assert_eq!(escape.kind(), ErrorKind::PathTraversal);
    }

    #[tokio::test]
    async fn test_read_csv_stats() -> anyhow::Result<()> {
        let (dir, tools) = executor(10);
        std::fs::write(
            dir.path().join("p.csv"),
            "번호,종목명\n1,APPLE\n2,MICROSOFT\n3,NVIDIA\n",
        )?;

        // The text-read ceiling does not apply to tabular reads.
        let stats = tools.read_csv_stats("p.csv", 2).await?;
        assert_eq!(stats.path, "p.csv");
        assert_eq!(stats.row_count, 3);
        assert_eq!(stats.preview.len(), 2);
        assert_eq!(stats.numeric_stats["번호"].max, 3.0);

        let missing = tools.read_csv_stats("none.csv", 2).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        Ok(())
    }
}
