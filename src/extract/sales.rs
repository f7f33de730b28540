//! Sales extraction

use super::ExtractOutcome;
use crate::api::PosApi;
use crate::error::{Error, Result};
use crate::partition::{raw_sales_key, DateWindow};
use crate::snapshot::ENVELOPE_KEY;
use crate::storage::ObjectStoreClient;
use serde_json::Value;
use tracing::{info, warn};

/// Fetches transactions for a window and stores the raw response
#[derive(Debug, Clone, Copy)]
pub struct SalesExtractor<'a> {
    api: &'a PosApi,
    store: &'a ObjectStoreClient,
}

impl<'a> SalesExtractor<'a> {
    pub fn new(api: &'a PosApi, store: &'a ObjectStoreClient) -> Self {
        Self { api, store }
    }

    /// Fetch `window` and write `raw/sales/sales_<label>.json`
    ///
    /// A response without a transaction list is logged and yields
    /// [`ExtractOutcome::Empty`]; request and storage failures are returned.
    pub async fn run(&self, window: &DateWindow) -> Result<ExtractOutcome> {
        let body = match self.api.fetch_transactions(window).await {
            Ok(body) => body,
            Err(Error::UnexpectedShape { message, .. }) => {
                warn!("No transaction headers found for {}: {}", window, message);
                return Ok(ExtractOutcome::Empty);
            }
            Err(e) => return Err(e),
        };

        let records = body
            .get(ENVELOPE_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let key = raw_sales_key(window);
        self.store.put_json(&key, &body).await?;
        info!("Saved raw sales for {} to {}", window, self.store.url_for(&key));

        Ok(ExtractOutcome::Written { key, records })
    }
}
