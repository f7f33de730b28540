//! CLI commands and argument parsing

use crate::partition::parse_date;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// POS batch pipeline: extract from the POS API, flatten into Parquet
#[derive(Parser, Debug)]
#[command(name = "pos-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline step to run
    #[arg(long, value_enum, default_value = "all")]
    pub step: Step,

    /// First day to process (YYYY-MM-DD); requires --end_date
    #[arg(long = "start_date", requires = "end_date", value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Last day to process, inclusive (YYYY-MM-DD); requires --start_date
    #[arg(long = "end_date", requires = "start_date", value_parser = parse_date_arg)]
    pub end_date: Option<NaiveDate>,

    /// Process the whole date window as one snapshot instead of day by day
    #[arg(long = "as_range", requires = "start_date")]
    pub as_range: bool,

    /// Environment file to load (defaults to $ENV_PATH, then config/.env)
    #[arg(long = "env_file")]
    pub env_file: Option<PathBuf>,

    /// Key prefix to list with --step check_storage
    #[arg(long)]
    pub prefix: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Step {
    /// Fetch transactions and store raw snapshots
    #[value(name = "extract_sales")]
    ExtractSales,
    /// Fetch dimension snapshots
    #[value(name = "extract_dims")]
    ExtractDims,
    /// Flatten raw sales into curated Parquet
    #[value(name = "transform_sales")]
    TransformSales,
    /// Coerce raw dimensions into curated Parquet
    #[value(name = "transform_dims")]
    TransformDims,
    /// Every step, extraction before transformation
    #[value(name = "all")]
    All,
    /// List objects in the bucket to verify storage access
    #[value(name = "check_storage")]
    CheckStorage,
}

impl Step {
    pub fn extracts_sales(self) -> bool {
        matches!(self, Step::ExtractSales | Step::All)
    }

    pub fn transforms_sales(self) -> bool {
        matches!(self, Step::TransformSales | Step::All)
    }

    pub fn extracts_dims(self) -> bool {
        matches!(self, Step::ExtractDims | Step::All)
    }

    pub fn transforms_dims(self) -> bool {
        matches!(self, Step::TransformDims | Step::All)
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}
