//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements one subcommand and returns the process exit code.

mod attest;
mod filter;
mod merge;
mod products;
mod verify;

pub use attest::run_attest;
pub use filter::run_filter;
pub use merge::{run_merge, MergeArgs};
pub use products::run_products;
pub use verify::run_verify;
