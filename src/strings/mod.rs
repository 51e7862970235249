//! # Strings Module
//!
//! Centralizes log lines and console messages.

pub mod logs;
pub mod messages;
