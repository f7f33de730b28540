//! CLI runner - sequences extraction and transformation over a date window

use crate::api::PosApi;
use crate::cli::commands::{Cli, Step};
use crate::config::{load_env_file, resolve_env_path, AppConfig};
use crate::error::{Error, Result, ResultExt};
use crate::extract::{DimensionExtractor, ExtractOutcome, SalesExtractor};
use crate::partition::DateWindow;
use crate::storage::ObjectStoreClient;
use crate::transform::{DimensionTransform, SalesTransform, TransformOutcome};
use crate::types::Dimension;
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{error, info, warn};

/// A resolved invocation: which steps run over which dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub step: Step,
    /// Sales window; yesterday unless given explicitly
    pub window: DateWindow,
    /// Whether `--start_date`/`--end_date` were given
    pub explicit_window: bool,
    /// Treat the window as one unit instead of iterating days
    pub as_range: bool,
    /// Run date, used to date dimension snapshots
    pub today: NaiveDate,
    /// Prefix for `check_storage`
    pub prefix: Option<String>,
}

impl RunPlan {
    /// Resolve the command line against the run date
    pub fn from_cli(cli: &Cli, today: NaiveDate) -> Result<Self> {
        let window = resolve_window(cli.start_date, cli.end_date, today)?;
        let explicit_window = cli.start_date.is_some();

        if cli.as_range && !explicit_window {
            return Err(Error::config("--as_range requires --start_date and --end_date"));
        }

        Ok(Self {
            step: cli.step,
            window,
            explicit_window,
            as_range: cli.as_range,
            today,
            prefix: cli.prefix.clone(),
        })
    }

    /// Units the sales steps iterate over
    pub fn sales_units(&self) -> Vec<DateWindow> {
        if self.as_range {
            vec![self.window]
        } else {
            self.window.days().collect()
        }
    }

    /// Dates whose dimension snapshots get transformed
    ///
    /// Only a standalone `transform_dims` run honours an explicit window;
    /// otherwise the snapshot extracted today is the one transformed.
    pub fn dimension_dates(&self) -> Vec<NaiveDate> {
        if self.step == Step::TransformDims && self.explicit_window {
            self.window.days().map(|d| d.start()).collect()
        } else {
            vec![self.today]
        }
    }
}

/// Resolve the processing window; both bounds or neither
pub fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateWindow> {
    match (start, end) {
        (Some(start), Some(end)) => DateWindow::new(start, end),
        (None, None) => Ok(DateWindow::yesterday(today)),
        _ => Err(Error::config(
            "--start_date and --end_date must be given together",
        )),
    }
}

/// Tally of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Snapshots and tables written
    pub written: usize,
    /// Units with nothing to write (empty responses, zero rows, unconfigured)
    pub empty: usize,
    /// Transform units with no raw snapshot
    pub missing: usize,
    /// Units that failed, as `step unit: error`
    pub failures: Vec<String>,
}

impl RunSummary {
    fn record_extract(&mut self, outcome: &ExtractOutcome) {
        match outcome {
            ExtractOutcome::Written { .. } => self.written += 1,
            ExtractOutcome::Empty | ExtractOutcome::NotConfigured => self.empty += 1,
        }
    }

    fn record_transform(&mut self, outcome: &TransformOutcome) {
        match outcome {
            TransformOutcome::Written { .. } => self.written += 1,
            TransformOutcome::Empty => self.empty += 1,
            TransformOutcome::MissingInput => self.missing += 1,
        }
    }

    /// Whether every unit completed without error
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pipeline runner
#[derive(Debug)]
pub struct Runner {
    plan: RunPlan,
    api: PosApi,
    store: ObjectStoreClient,
}

impl Runner {
    /// Create a new runner
    pub fn new(plan: RunPlan, api: PosApi, store: ObjectStoreClient) -> Self {
        Self { plan, api, store }
    }

    /// Build the API and storage clients from configuration
    pub fn from_config(plan: RunPlan, config: &AppConfig) -> Result<Self> {
        let api = PosApi::new(config.api.clone())?;
        let store = ObjectStoreClient::from_config(&config.storage)?;
        Ok(Self::new(plan, api, store))
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Run the planned steps
    ///
    /// Request, storage and transform failures are logged per unit and the
    /// run moves on; configuration errors abort it.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let step = self.plan.step;

        if step == Step::CheckStorage {
            self.check_storage().await?;
            return Ok(summary);
        }

        info!("Running step {:?} for {}", step, self.plan.window);

        if step.extracts_sales() || step.transforms_sales() {
            self.run_sales(&mut summary).await?;
        }
        if step.extracts_dims() {
            self.extract_dimensions(&mut summary).await?;
        }
        if step.transforms_dims() {
            self.transform_dimensions(&mut summary).await?;
        }

        info!(
            "Finished in {:.1}s: {} written, {} empty, {} missing, {} failed",
            started.elapsed().as_secs_f64(),
            summary.written,
            summary.empty,
            summary.missing,
            summary.failures.len()
        );
        Ok(summary)
    }

    async fn run_sales(&self, summary: &mut RunSummary) -> Result<()> {
        let step = self.plan.step;
        let extractor = SalesExtractor::new(&self.api, &self.store);
        let transform = SalesTransform::new(self.store.clone());

        for unit in self.plan.sales_units() {
            if step.extracts_sales() {
                match extractor.run(&unit).await {
                    Ok(outcome) => summary.record_extract(&outcome),
                    Err(e) => {
                        record_failure(summary, "extract_sales", &unit.to_string(), e)?;
                        // Nothing fresh to transform for this unit
                        continue;
                    }
                }
            }

            if step.transforms_sales() {
                match transform.run(&unit).await {
                    Ok(outcome) => summary.record_transform(&outcome),
                    Err(e) => record_failure(summary, "transform_sales", &unit.to_string(), e)?,
                }
            }
        }
        Ok(())
    }

    async fn extract_dimensions(&self, summary: &mut RunSummary) -> Result<()> {
        let extractor = DimensionExtractor::new(&self.api, &self.store);
        for (dim, result) in extractor.run_all(self.plan.today).await {
            match result {
                Ok(outcome) => summary.record_extract(&outcome),
                Err(e) => record_failure(summary, "extract_dims", dim.name(), e)?,
            }
        }
        Ok(())
    }

    async fn transform_dimensions(&self, summary: &mut RunSummary) -> Result<()> {
        let transform = DimensionTransform::new(self.store.clone());
        for date in self.plan.dimension_dates() {
            for (dim, result) in transform.run_all(date).await {
                match result {
                    Ok(outcome) => summary.record_transform(&outcome),
                    Err(e) => {
                        record_failure(summary, "transform_dims", &unit_label(dim, date), e)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// List stored objects under the plan's prefix
    async fn check_storage(&self) -> Result<()> {
        let prefix = self.plan.prefix.as_deref();
        info!(
            "Listing objects in {} (prefix: {})",
            self.store.location(),
            prefix.unwrap_or("<none>")
        );

        let objects = self.store.list(prefix).await?;
        if objects.is_empty() {
            println!("Bucket is empty");
            return Ok(());
        }

        for object in &objects {
            println!("{} ({} bytes)", object.key, object.size);
        }
        info!("Storage reachable: {} objects listed", objects.len());
        Ok(())
    }
}

fn unit_label(dim: Dimension, date: NaiveDate) -> String {
    format!("{dim} {date}")
}

fn record_failure(summary: &mut RunSummary, step: &str, unit: &str, err: Error) -> Result<()> {
    if !err.is_recoverable() {
        return Err(err);
    }
    error!("{} failed for {}: {}", step, unit, err);
    summary.failures.push(format!("{step} {unit}: {err}"));
    Ok(())
}

/// Full CLI flow: environment, configuration, then the run
pub async fn execute(cli: &Cli, today: NaiveDate) -> Result<RunSummary> {
    let env_path = resolve_env_path(cli.env_file.as_deref());
    if !load_env_file(&env_path)? {
        warn!(
            "Environment file {} not found, using process environment",
            env_path.display()
        );
    }

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let plan = RunPlan::from_cli(cli, today)?;
    let runner = Runner::from_config(plan, &config)?;
    runner.run().await
}
