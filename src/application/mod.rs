//! # Application Layer
//!
//! Contains the portfolio comparison logic and its orchestration.
//! This includes the diff engine, snapshot building, report rendering and logging setup.

pub mod logging;
pub mod portfolio;
pub mod report;
pub mod scenario;
pub mod snapshot;
