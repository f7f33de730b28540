//! JSON flattening
//!
//! Sales snapshots nest product line items inside each receipt. Flattening
//! emits one row per line item, with a fixed set of receipt attributes copied
//! onto every row under a `receipt_` prefix. Nested objects are expanded into
//! dotted column names.

use super::table::Table;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Field holding a receipt's product line items
pub const PRODUCTS_FIELD: &str = "products";

/// Prefix applied to receipt-level columns
pub const RECEIPT_PREFIX: &str = "receipt_";

/// Receipt attributes copied onto every line item row
pub const RECEIPT_FIELDS: &[&str] = &[
    // identifiers
    "transaction_id",
    "spot_id",
    "table_name",
    "user_id",
    "client_id",
    // time
    "date_start",
    "date_close",
    // financials
    "payed_sum",
    "pay_type",
    "discount",
    "bonus",
    "tip_sum",
    "tax_sum",
    // operations
    "guests_count",
    "service_mode",
    "status",
];

/// Whether a transaction carries at least one product line item
pub fn has_products(transaction: &JsonValue) -> bool {
    transaction
        .get(PRODUCTS_FIELD)
        .and_then(JsonValue::as_array)
        .is_some_and(|items| !items.is_empty())
}

/// Flatten transactions into one row per product line item
///
/// Transactions without products are dropped. A line item that is not an
/// object makes the whole snapshot unflattenable.
pub fn flatten_transactions(transactions: &[JsonValue], source: &str) -> Result<Table> {
    let mut table = Table::new();

    for (tx_idx, transaction) in transactions.iter().enumerate() {
        let Some(items) = transaction
            .get(PRODUCTS_FIELD)
            .and_then(JsonValue::as_array)
            .filter(|items| !items.is_empty())
        else {
            continue;
        };

        for (item_idx, item) in items.iter().enumerate() {
            let JsonValue::Object(item) = item else {
                return Err(Error::transform(
                    source,
                    format!("transaction {tx_idx}: product {item_idx} is not an object"),
                ));
            };

            let mut row = JsonObject::new();
            flatten_into(&mut row, "", item);

            for field in RECEIPT_FIELDS {
                if let Some(value) = transaction.get(*field) {
                    row.insert(format!("{RECEIPT_PREFIX}{field}"), value.clone());
                }
            }

            table.push_row(row);
        }
    }

    Ok(table)
}

/// Normalise flat-ish records (dimension snapshots) into a table
pub fn normalize_records(records: &[JsonValue], source: &str) -> Result<Table> {
    let mut table = Table::new();

    for (idx, record) in records.iter().enumerate() {
        let JsonValue::Object(record) = record else {
            return Err(Error::transform(
                source,
                format!("record {idx} is not an object"),
            ));
        };

        let mut row = JsonObject::new();
        flatten_into(&mut row, "", record);
        table.push_row(row);
    }

    Ok(table)
}

/// Copy `object` into `row`, expanding nested non-empty objects as `a.b`
fn flatten_into(row: &mut JsonObject, prefix: &str, object: &JsonObject) {
    for (key, value) in object {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            JsonValue::Object(nested) if !nested.is_empty() => flatten_into(row, &name, nested),
            _ => {
                row.insert(name, value.clone());
            }
        }
    }
}
