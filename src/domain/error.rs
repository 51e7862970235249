//! # Errors
//!
//! Typed failures of the sandbox and file tools. Every error maps to an [`ErrorKind`],
//! which is what crosses the tool channel, so callers can tell a sandbox violation
//! apart from routine I/O failures without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PathTraversal,
    NotFound,
    NotADirectory,
    IsADirectory,
    AlreadyExists,
    TooLarge,
    InvalidData,
    Io,
    /// The channel itself failed (process died, malformed response).
    Transport,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PathTraversal => "path_traversal",
            Self::NotFound => "not_found",
            Self::NotADirectory => "not_a_directory",
            Self::IsADirectory => "is_a_directory",
            Self::AlreadyExists => "already_exists",
            Self::TooLarge => "too_large",
            Self::InvalidData => "invalid_data",
            Self::Io => "io",
            Self::Transport => "transport",
        }
    }

    /// Conditions the caller caused and can fix by changing its request.
    pub const fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Io | Self::Transport)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("path traversal detected: {path}")]
    PathTraversal { path: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("file exists: {0} (set overwrite to replace it)")]
    AlreadyExists(String),

    #[error("file too large: {path} is {size} bytes, limit is {limit}")]
    TooLarge { path: String, size: u64, limit: u64 },

    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PathTraversal { .. } => ErrorKind::PathTraversal,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotADirectory(_) => ErrorKind::NotADirectory,
            Self::IsADirectory(_) => ErrorKind::IsADirectory,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Csv { .. } => ErrorKind::InvalidData,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }
}

/// A tool call failure as seen from the calling side of a [`crate::domain::traits::ToolChannel`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ToolFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn is_security_violation(&self) -> bool {
        self.kind == ErrorKind::PathTraversal
    }
}

impl From<ToolError> for ToolFailure {
    fn from(err: ToolError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}
