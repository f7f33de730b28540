//! Sales transform
//!
//! Raw sales snapshot → one row per product line item → coerced Parquet at
//! the curated partition key for the window.

use super::coerce::CoercionRules;
use super::flatten::{flatten_transactions, has_products};
use super::types::TransformOutcome;
use crate::error::{Error, Result};
use crate::output::{table_to_record_batch, ParquetWriterConfig};
use crate::partition::{curated_sales_key, raw_sales_key, DateWindow};
use crate::snapshot::Snapshot;
use crate::storage::ObjectStoreClient;
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use tracing::info;

/// Flatten and coerce a raw sales document
///
/// Returns `None` when no transaction carries products or the flattened
/// table has no rows. Documents that are
/// neither a list nor a `response` envelope are a transform error for
/// `source`.
pub fn transform_sales(document: Value, source: &str) -> Result<Option<RecordBatch>> {
    let snapshot = Snapshot::from_value(document, source).map_err(|e| match e {
        Error::UnexpectedShape { message, .. } => {
            Error::transform(source, format!("snapshot structure compromised: {message}"))
        }
        other => other,
    })?;

    let transactions = snapshot.records();
    let with_products = transactions.iter().filter(|t| has_products(t)).count();
    info!(
        "{}: {} transactions, {} with products",
        source,
        transactions.len(),
        with_products
    );

    if with_products == 0 {
        return Ok(None);
    }

    let table = flatten_transactions(transactions, source)?;
    if table.is_empty() {
        return Ok(None);
    }

    let batch = table_to_record_batch(&table, &CoercionRules::sales())?;
    // Rows without any fields leave a column-less, zero-row batch
    Ok(Some(batch).filter(|b| b.num_rows() > 0))
}

/// Runs the sales transform against object storage
#[derive(Debug, Clone)]
pub struct SalesTransform {
    store: ObjectStoreClient,
    writer_config: ParquetWriterConfig,
}

impl SalesTransform {
    /// Create a transform writing with default Parquet settings
    pub fn new(store: ObjectStoreClient) -> Self {
        Self {
            store,
            writer_config: ParquetWriterConfig::default(),
        }
    }

    /// Transform the raw snapshot for `window` into its curated table
    ///
    /// Reruns overwrite the same curated key.
    pub async fn run(&self, window: &DateWindow) -> Result<TransformOutcome> {
        let raw_key = raw_sales_key(window);

        let Some(document) = self.store.get_json(&raw_key).await? else {
            info!("No raw sales data for {}", window);
            return Ok(TransformOutcome::MissingInput);
        };

        let Some(batch) = transform_sales(document, &raw_key)? else {
            info!("Sales for {} flattened to zero rows; nothing written", window);
            return Ok(TransformOutcome::Empty);
        };

        let key = curated_sales_key(window);
        self.store
            .put_parquet(&key, &batch, &self.writer_config)
            .await?;

        Ok(TransformOutcome::Written {
            key,
            rows: batch.num_rows(),
        })
    }
}
