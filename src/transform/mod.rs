//! Flattening and transform engine
//!
//! # Overview
//!
//! - [`flatten_transactions`] turns nested receipts into one row per product
//!   line item; [`normalize_records`] does the same for flat dimension records
//! - [`CoercionRules`] declare per-column types; coercion never fails
//! - [`SalesTransform`] and [`DimensionTransform`] read raw snapshots from
//!   object storage and write curated Parquet tables

mod coerce;
mod dimensions;
mod flatten;
mod sales;
mod table;
mod types;

pub use coerce::{
    coerce_epoch_millis, coerce_identifier, coerce_numeric, CoercionRules, ColumnRule,
    DIMENSION_NUMERIC_COLUMNS, SALES_IDENTIFIER_COLUMNS, SALES_NUMERIC_COLUMNS,
    SALES_TIMESTAMP_COLUMNS,
};
pub use dimensions::{transform_dimension, DimensionTransform};
pub use flatten::{
    flatten_transactions, has_products, normalize_records, PRODUCTS_FIELD, RECEIPT_FIELDS,
    RECEIPT_PREFIX,
};
pub use sales::{transform_sales, SalesTransform};
pub use table::Table;
pub use types::TransformOutcome;
