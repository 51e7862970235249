//! # Path Sandbox
//!
//! Resolves caller-supplied relative paths against a fixed root directory and rejects
//! anything that would land outside it, whether through `..` segments, absolute paths
//! or symlinks.

use std::path::{Component, Path, PathBuf};

use crate::domain::error::ToolError;

/// A canonical absolute path that is the sandbox root or lies beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PathSandbox {
    root_dir: PathBuf,
}

impl PathSandbox {
    /// Creates a sandbox rooted at `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let root = root.as_ref();
        let label = root.display().to_string();
        let root_dir = std::fs::canonicalize(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound(label.clone()),
            _ => ToolError::io(label.clone(), e),
        })?;
        if !root_dir.is_dir() {
            return Err(ToolError::NotADirectory(label));
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Resolves `relative` against the root.
    ///
    /// The target does not need to exist. Symlinks are followed wherever they occur on
    /// the path, including after a `..` that steps back out of a missing directory.
    pub fn resolve(&self, relative: &str) -> Result<ResolvedPath, ToolError> {
        let candidate = self.root_dir.join(relative);
        let canonical = canonicalize_lenient(&candidate).ok_or_else(|| {
            tracing::warn!("{}", crate::strings::logs::dangling_symlink(relative));
            traversal(relative)
        })?;

        if is_within(&self.root_dir, &canonical) {
            Ok(ResolvedPath(canonical))
        } else {
            tracing::warn!("{}", crate::strings::logs::traversal_blocked(relative));
            Err(traversal(relative))
        }
    }

    /// Renders a resolved path relative to the root, `"."` for the root itself.
    pub fn display(&self, path: &ResolvedPath) -> String {
        match path.as_path().strip_prefix(&self.root_dir) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().to_string(),
            // Case-insensitive match on a differently cased root: fall back to the component tail.
            Err(_) => path
                .as_path()
                .components()
                .skip(self.root_dir.components().count())
                .collect::<PathBuf>()
                .to_string_lossy()
                .to_string(),
        }
    }
}

fn traversal(relative: &str) -> ToolError {
    ToolError::PathTraversal {
        path: relative.to_string(),
    }
}

/// Canonicalizes `path` one component at a time.
///
/// `..` pops the canonical path built so far. A segment that exists is re-canonicalized
/// when it is a symlink; a missing segment is kept as written. Returns `None` if a
/// symlink on the path cannot be resolved.
fn canonicalize_lenient(path: &Path) -> Option<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(segment) => {
                resolved.push(segment);
                let is_symlink = std::fs::symlink_metadata(&resolved)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);
                if is_symlink {
                    resolved = std::fs::canonicalize(&resolved).ok()?;
                }
            }
        }
    }

    Some(resolved)
}

#[cfg(any(windows, target_os = "macos"))]
fn is_within(root: &Path, candidate: &Path) -> bool {
    let fold = |p: &Path| -> Vec<std::ffi::OsString> {
        p.components()
            .map(|c| c.as_os_str().to_string_lossy().to_lowercase().into())
            .collect()
    };
    let root = fold(root);
    let candidate = fold(candidate);
    candidate.len() >= root.len() && candidate[..root.len()] == root[..]
}

#[cfg(not(any(windows, target_os = "macos")))]
fn is_within(root: &Path, candidate: &Path) -> bool {
    // Component-wise: `/data-evil` does not start with `/data`.
    candidate.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, PathSandbox) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = PathSandbox::new(dir.path()).unwrap();
        (dir, sandbox)
    }

    #[test]
    fn test_parent_escape_is_rejected() {
        let (_dir, sandbox) = sandbox();
        for rel in ["../etc/passwd", "..", "a/../../b", "./../x", "sub/../../../tmp"] {
            let err = sandbox.resolve(rel).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PathTraversal, "{rel} should be rejected");
        }
    }

    #[test]
    fn test_absolute_path_outside_is_rejected() {
        let (_dir, sandbox) = sandbox();
        assert!(sandbox.resolve("/etc/passwd").unwrap_err().is_security_violation());
    }

    #[test]
    fn test_inside_paths_resolve() {
        let (_dir, sandbox) = sandbox();
        let root = sandbox.root().to_path_buf();

        assert_eq!(sandbox.resolve(".").unwrap().as_path(), root);
        assert_eq!(sandbox.resolve("").unwrap().as_path(), root);
        assert_eq!(
            sandbox.resolve("sub/../sub/file.txt").unwrap().as_path(),
            root.join("sub").join("file.txt")
        );
        assert_eq!(
            sandbox.resolve("a/./b/../c").unwrap().as_path(),
            root.join("a").join("c")
        );
        assert_eq!(sandbox.resolve("a/..").unwrap().as_path(), root);
    }

    #[test]
    fn test_existing_directories_resolve() {
        let (dir, sandbox) = sandbox();
        std::fs::create_dir_all(dir.path().join("sub/nested")).unwrap();
        std::fs::write(dir.path().join("sub/file.txt"), "x").unwrap();

        let resolved = sandbox.resolve("sub/nested/../file.txt").unwrap();
        assert_eq!(resolved.as_path(), sandbox.root().join("sub/file.txt"));
        assert_eq!(sandbox.display(&resolved), "sub/file.txt");
    }

    #[test]
    fn test_sibling_with_common_prefix_is_rejected() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("data");
        let evil = parent.path().join("data-evil");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&evil).unwrap();

        let sandbox = PathSandbox::new(&root).unwrap();
        assert!(sandbox.resolve("../data-evil/x").unwrap_err().is_security_violation());
    }

    #[test]
    fn test_display_root() {
        let (_dir, sandbox) = sandbox();
        let resolved = sandbox.resolve(".").unwrap();
        assert_eq!(sandbox.display(&resolved), ".");
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = PathSandbox::new(dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let (dir, sandbox) = sandbox();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        assert!(sandbox.resolve("link/secret.txt").unwrap_err().is_security_violation());
        // New files through the link are caught as well.
        assert!(sandbox.resolve("link/new.txt").unwrap_err().is_security_violation());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_after_missing_parent_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let (dir, sandbox) = sandbox();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        for rel in [
            "missing/../link/secret.txt",
            "missing/../link/new.txt",
            "a/b/../../link/secret.txt",
            "./missing/./../link",
        ] {
            let err = sandbox.resolve(rel).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PathTraversal, "{rel} should be rejected");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nested_symlink_chain_outside_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let (dir, sandbox) = sandbox();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("real/out")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        assert!(sandbox.resolve("alias/out/x.txt").unwrap_err().is_security_violation());
        assert!(sandbox.resolve("nope/../alias/out").unwrap_err().is_security_violation());
        assert_eq!(
            sandbox.resolve("nope/../alias/x.txt").unwrap().as_path(),
            sandbox.root().join("real/x.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_is_allowed() {
        let (dir, sandbox) = sandbox();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let resolved = sandbox.resolve("alias/file.txt").unwrap();
        assert_eq!(resolved.as_path(), sandbox.root().join("real/file.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rejected() {
        let (dir, sandbox) = sandbox();
        std::os::unix::fs::symlink("/nonexistent/target/dir", dir.path().join("dangling")).unwrap();
        assert!(sandbox.resolve("dangling/file.txt").unwrap_err().is_security_violation());
        assert!(sandbox.resolve("gone/../dangling").unwrap_err().is_security_violation());
    }
}
