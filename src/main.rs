//! POS ETL CLI
//!
//! Command-line entry point for the batch pipeline

use clap::Parser;
use pos_etl::cli::{self, Cli};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let today = chrono::Local::now().date_naive();
    match cli::execute(&cli, today).await {
        Ok(summary) if summary.is_clean() => info!("Pipeline completed"),
        Ok(summary) => {
            for failure in &summary.failures {
                error!("{}", failure);
            }
            info!("Pipeline completed with {} failed units", summary.failures.len());
        }
        Err(e) => {
            error!("Pipeline failed: {e}");
            std::process::exit(1);
        }
    }
}
