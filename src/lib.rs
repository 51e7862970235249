//! Sandboxed filesystem tools served over MCP, and the portfolio comparison that drives them.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod strings;
