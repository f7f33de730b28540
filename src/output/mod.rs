//! Output module
//!
//! Converts flattened tables into Arrow RecordBatches and serialises them as
//! Parquet.

mod schema;
mod writer;

pub use schema::{arrow_to_json, table_to_record_batch};
pub use writer::{read_parquet_bytes, write_batch_to_parquet_bytes, ParquetWriterConfig};

#[cfg(test)]
mod tests;
