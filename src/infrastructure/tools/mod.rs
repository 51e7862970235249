//! # Tools Module
//!
//! Provides the sandboxed filesystem tools (list, read, create, tabular stats).
//! Served over MCP by the `filesystem-mcp` binary, or called in-process.

pub mod executor;
pub mod tabular;
