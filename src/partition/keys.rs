//! Storage key builders

use super::types::{DateWindow, KEY_DATE_FORMAT};
use crate::types::Dimension;
use chrono::{Datelike, NaiveDate};

/// Raw sales snapshot key
pub fn raw_sales_key(window: &DateWindow) -> String {
    format!("raw/sales/sales_{}.json", window.label())
}

/// Curated sales table key
///
/// Single days are Hive-partitioned by year/month/day (unpadded); ranges are
/// written flat.
pub fn curated_sales_key(window: &DateWindow) -> String {
    if window.is_single() {
        let date = window.start();
        format!(
            "curated/sales/year={}/month={}/day={}/sales_{}.parquet",
            date.year(),
            date.month(),
            date.day(),
            date.format(KEY_DATE_FORMAT)
        )
    } else {
        format!("curated/sales/sales_{}.parquet", window.label())
    }
}

/// Raw dimension snapshot key
pub fn raw_dimension_key(dim: Dimension, date: NaiveDate) -> String {
    let name = dim.name();
    format!(
        "raw/dimensions/{name}/{name}_dim_{}.json",
        date.format(KEY_DATE_FORMAT)
    )
}

/// Curated dimension table key
pub fn curated_dimension_key(dim: Dimension, date: NaiveDate) -> String {
    let name = dim.name();
    format!(
        "curated/dimensions/{name}/dt={}/{name}.parquet",
        date.format(KEY_DATE_FORMAT)
    )
}
