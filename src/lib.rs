//! # POS ETL
//!
//! Daily batch pipeline for a point-of-sale REST API: raw JSON snapshots in
//! object storage, flattened into curated, date-partitioned Parquet tables.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   extract    ┌────────────────────┐  transform  ┌──────────────────────────┐
//! │ POS API  │ ───────────▶ │ raw/sales/*.json   │ ──────────▶ │ curated/sales/.../*.pq   │
//! │          │              │ raw/dimensions/... │             │ curated/dimensions/...   │
//! └──────────┘              └────────────────────┘             └──────────────────────────┘
//! ```
//!
//! Sales are processed one day at a time (or one range with `--as_range`);
//! dimensions (products, categories, employees, spots) are full snapshots
//! dated by the run date. Every write is a full overwrite of a
//! deterministic key, so reruns are idempotent.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pos_etl::cli::{RunPlan, Runner, Step};
//! use pos_etl::config::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! let runner = Runner::from_config(plan, &config)?;
//! let summary = runner.run().await?;
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Environment-driven configuration
pub mod config;

/// HTTP client with per-request timeouts
pub mod http;

/// POS API endpoints
pub mod api;

/// Object storage access
pub mod storage;

/// Raw snapshot shapes
pub mod snapshot;

/// Date windows and storage key layout
pub mod partition;

/// Raw JSON to flat tables
pub mod transform;

/// Arrow/Parquet output
pub mod output;

/// Raw snapshot extraction
pub mod extract;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
