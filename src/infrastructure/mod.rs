//! # Infrastructure Layer
//!
//! Handles interactions with the filesystem and the MCP transport.
//! Implements the traits defined in the Domain layer (e.g., ToolChannel).

pub mod mcp;
pub mod sandbox;
pub mod tools;
