//! Date windows and storage keys
//!
//! # Overview
//!
//! Every artifact the pipeline writes lives at a key derived from a date
//! window (sales) or a dimension name plus snapshot date (reference data):
//!
//! - `raw/sales/sales_<date>.json` or `raw/sales/sales_<start>_<end>.json`
//! - `curated/sales/year=<Y>/month=<M>/day=<D>/sales_<date>.parquet`
//!   or `curated/sales/sales_<start>_<end>.parquet`
//! - `raw/dimensions/<name>/<name>_dim_<date>.json`
//! - `curated/dimensions/<name>/dt=<date>/<name>.parquet`

mod keys;
mod types;

pub use keys::{curated_dimension_key, curated_sales_key, raw_dimension_key, raw_sales_key};
pub use types::{parse_date, DateWindow, API_DATE_FORMAT, KEY_DATE_FORMAT};
