//! CLI module
//!
//! Command-line entry point and the orchestrator that sequences extraction
//! and transformation over a date window.
//!
//! # Steps
//!
//! - `extract_sales` / `transform_sales` - per day, or once for `--as_range`
//! - `extract_dims` / `transform_dims` - full reference-data snapshots
//! - `all` - everything above, extraction before transformation
//! - `check_storage` - list bucket contents

mod commands;
mod runner;

pub use commands::{Cli, Step};
pub use runner::{execute, RunPlan, RunSummary, Runner};
