//! # MCP Module
//!
//! Model Context Protocol plumbing for the filesystem tools.
//! Includes the server exposing the tools, the client driving a spawned server,
//! and an in-process channel with the same interface.

pub mod client;
pub mod local;
pub mod protocol;
pub mod server;

pub use client::McpClient;
pub use local::LocalToolChannel;
pub use server::FilesystemServer;
