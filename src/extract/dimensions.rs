//! Dimension extraction

use super::ExtractOutcome;
use crate::api::PosApi;
use crate::error::{Error, Result};
use crate::partition::raw_dimension_key;
use crate::storage::ObjectStoreClient;
use crate::types::Dimension;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

/// Fetches full dimension snapshots and stores them unwrapped
#[derive(Debug, Clone, Copy)]
pub struct DimensionExtractor<'a> {
    api: &'a PosApi,
    store: &'a ObjectStoreClient,
}

impl<'a> DimensionExtractor<'a> {
    pub fn new(api: &'a PosApi, store: &'a ObjectStoreClient) -> Self {
        Self { api, store }
    }

    /// Fetch one dimension and write its snapshot dated `date`
    pub async fn run(&self, dim: Dimension, date: NaiveDate) -> Result<ExtractOutcome> {
        if self.api.config().dimension_url(dim).is_none() {
            warn!("No endpoint configured for {} ({} is unset)", dim, dim.url_var());
            return Ok(ExtractOutcome::NotConfigured);
        }

        let records = match self.api.fetch_dimension(dim).await {
            Ok(records) => records,
            Err(Error::UnexpectedShape { message, .. }) => {
                warn!("Unexpected response format for {} dimension: {}", dim, message);
                return Ok(ExtractOutcome::Empty);
            }
            Err(e) => return Err(e),
        };

        if records.is_empty() {
            warn!("No data fetched for {} dimension", dim);
            return Ok(ExtractOutcome::Empty);
        }

        let count = records.len();
        let key = raw_dimension_key(dim, date);
        self.store.put_json(&key, &Value::Array(records)).await?;
        info!("Uploaded {} dimension data to {}", dim, self.store.url_for(&key));

        Ok(ExtractOutcome::Written {
            key,
            records: count,
        })
    }

    /// Extract every dimension, continuing past failures
    pub async fn run_all(&self, date: NaiveDate) -> Vec<(Dimension, Result<ExtractOutcome>)> {
        let mut outcomes = Vec::with_capacity(Dimension::ALL.len());
        for dim in Dimension::ALL {
            outcomes.push((dim, self.run(dim, date).await));
        }
        outcomes
    }
}
