//! POS API client
//!
//! Two request shapes: the transaction list for a date window and the full
//! list of one dimension. Both answers come wrapped in a `response`
//! envelope.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::partition::DateWindow;
use crate::snapshot::Snapshot;
use crate::types::Dimension;
use serde_json::Value;
use tracing::info;

/// Client for the POS REST API
#[derive(Debug)]
pub struct PosApi {
    http: HttpClient,
    config: ApiConfig,
}

impl PosApi {
    /// Create a client with its own HTTP session
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .timeout(config.timeout)
                .build(),
        )?;
        Ok(Self { http, config })
    }

    /// API configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn base_request(&self) -> RequestConfig {
        RequestConfig::new()
            .query("token", self.config.token.clone())
            .timeout(self.config.timeout)
    }

    /// Fetch every transaction in `window`, receipts and delivery included
    ///
    /// Returns the response body verbatim once the envelope is confirmed to
    /// hold a list.
    pub async fn fetch_transactions(&self, window: &DateWindow) -> Result<Value> {
        let url = self
            .config
            .transactions_url
            .as_deref()
            .ok_or_else(|| Error::missing_field("TRANSACTION_URL"))?;

        info!("Fetching transactions for {} from POS API", window);
        let request = self
            .base_request()
            .query("date_from", window.api_from())
            .query("date_to", window.api_to())
            .query("include_receipts", "true")
            .query("include_delivery", "true");

        let body = self.http.get_json(url, request).await?;

        let count = match body.get(crate::snapshot::ENVELOPE_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|t| t.get("transaction_id").is_some())
                .count(),
            _ => {
                return Err(Error::unexpected_shape(
                    "transactions",
                    "no transaction list in the response",
                ))
            }
        };
        info!("Fetched {} transaction ids", count);

        Ok(body)
    }

    /// Fetch the full list of one dimension, unwrapped from its envelope
    pub async fn fetch_dimension(&self, dim: Dimension) -> Result<Vec<Value>> {
        let url = self
            .config
            .dimension_url(dim)
            .ok_or_else(|| Error::missing_field(dim.url_var()))?;

        info!("Fetching {} dimension data from POS API", dim);
        let body = self.http.get_json(url, self.base_request()).await?;

        match Snapshot::from_value(body, dim.name())? {
            Snapshot::Enveloped(records) => Ok(records),
            Snapshot::Bare(_) => Err(Error::unexpected_shape(
                dim.name(),
                "response is not wrapped in an envelope",
            )),
        }
    }
}
