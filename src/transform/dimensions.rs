//! Dimension transform
//!
//! Dimension snapshots are flat lists of records. Each is normalised, the
//! dimension's numeric allowlist is applied, and the result lands at
//! `curated/dimensions/<name>/dt=<date>/<name>.parquet`.

use super::coerce::CoercionRules;
use super::flatten::normalize_records;
use super::types::TransformOutcome;
use crate::error::{Error, Result};
use crate::output::{table_to_record_batch, ParquetWriterConfig};
use crate::partition::{curated_dimension_key, raw_dimension_key};
use crate::snapshot::Snapshot;
use crate::storage::ObjectStoreClient;
use crate::types::Dimension;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

/// Normalise and coerce a raw dimension document
///
/// Returns `None` for an empty snapshot or one whose records carry no
/// fields.
pub fn transform_dimension(
    dim: Dimension,
    document: Value,
    source: &str,
) -> Result<Option<RecordBatch>> {
    let records = Snapshot::from_value(document, source)
        .map_err(|e| Error::transform(source, e.to_string()))?
        .into_records();

    if records.is_empty() {
        return Ok(None);
    }

    info!("Transforming {} rows for {}", records.len(), dim);
    let table = normalize_records(&records, source)?;
    let batch = table_to_record_batch(&table, &CoercionRules::for_dimension(dim))?;
    Ok(Some(batch).filter(|b| b.num_rows() > 0))
}

/// Runs dimension transforms against object storage
#[derive(Debug, Clone)]
pub struct DimensionTransform {
    store: ObjectStoreClient,
    writer_config: ParquetWriterConfig,
}

impl DimensionTransform {
    /// Create a transform writing with default Parquet settings
    pub fn new(store: ObjectStoreClient) -> Self {
        Self {
            store,
            writer_config: ParquetWriterConfig::default(),
        }
    }

    /// Transform one dimension's snapshot taken on `date`
    ///
    /// A missing snapshot is a warning, not a failure.
    pub async fn run(&self, dim: Dimension, date: NaiveDate) -> Result<TransformOutcome> {
        let raw_key = raw_dimension_key(dim, date);

        let Some(document) = self.store.get_json(&raw_key).await? else {
            warn!("Skipping {}: no raw data found for {}", dim, date);
            return Ok(TransformOutcome::MissingInput);
        };

        let Some(batch) = transform_dimension(dim, document, &raw_key)? else {
            warn!("Skipping {}: raw snapshot for {} is empty", dim, date);
            return Ok(TransformOutcome::Empty);
        };

        let key = curated_dimension_key(dim, date);
        self.store
            .put_parquet(&key, &batch, &self.writer_config)
            .await?;

        Ok(TransformOutcome::Written {
            key,
            rows: batch.num_rows(),
        })
    }

    /// Transform every dimension for `date`, continuing past failures
    pub async fn run_all(&self, date: NaiveDate) -> Vec<(Dimension, Result<TransformOutcome>)> {
        let mut outcomes = Vec::with_capacity(Dimension::ALL.len());
        for dim in Dimension::ALL {
            outcomes.push((dim, self.run(dim, date).await));
        }
        outcomes
    }
}
