//! rankdrill library crate: the pieces of the `rankdrill` binary that tests
//! drive directly.
//!
//! The engine lives in `rankdrill-core`. This crate adds configuration, the
//! line-oriented drill loop, text rendering and logging setup.

pub mod config;
pub mod drill;
pub mod format;
pub mod report;
pub mod telemetry;
