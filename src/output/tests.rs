//! Tests for output module

use super::*;
use crate::transform::{CoercionRules, ColumnRule, Table};
use crate::types::JsonValue;
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use parquet::basic::Compression;
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::json;

fn table_of(rows: Vec<JsonValue>) -> Table {
    let mut table = Table::new();
    for row in rows {
        let JsonValue::Object(obj) = row else {
            panic!("Expected object row");
        };
        table.push_row(obj);
    }
    table
}

// ============================================================================
// Type Inference Tests
// ============================================================================

#[test]
fn test_infer_unruled_columns() {
    let table = table_of(vec![
        json!({"name": "Latte", "count": 2, "ratio": 0.5, "active": true}),
        json!({"name": "Mocha", "count": 3, "ratio": 1, "active": false}),
    ]);

    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();
    let schema = batch.schema();

    assert_eq!(schema.field_with_name("name").unwrap().data_type(), &DataType::Utf8);
    assert_eq!(schema.field_with_name("count").unwrap().data_type(), &DataType::Int64);
    assert_eq!(schema.field_with_name("ratio").unwrap().data_type(), &DataType::Float64);
    assert_eq!(schema.field_with_name("active").unwrap().data_type(), &DataType::Boolean);
}

#[test]
fn test_infer_mixed_types_fall_back_to_text() {
    let table = table_of(vec![json!({"code": 7}), json!({"code": "A7"})]);

    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();
    let records = arrow_to_json(&batch).unwrap();

    assert_eq!(records, vec![json!({"code": "7"}), json!({"code": "A7"})]);
}

#[test]
fn test_all_null_column_is_text() {
    let table = table_of(vec![json!({"note": null}), json!({"note": null})]);

    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();
    assert_eq!(
        batch.schema().field_with_name("note").unwrap().data_type(),
        &DataType::Utf8
    );
    assert_eq!(batch.column(0).null_count(), 2);
}

#[test]
fn test_nested_values_are_json_text() {
    let table = table_of(vec![json!({"modifications": [{"m": 1}]})]);

    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();
    let records = arrow_to_json(&batch).unwrap();
    assert_eq!(records[0]["modifications"], json!("[{\"m\":1}]"));
}

#[test]
fn test_column_order_follows_table() {
    let table = table_of(vec![json!({"b": 1, "a": 2})]);
    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();

    let names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, table.columns().to_vec());
}

// ============================================================================
// Coercion Rule Tests
// ============================================================================

#[test]
fn test_ruled_columns() {
    let rules = CoercionRules::new()
        .with(ColumnRule::Numeric, &["price"])
        .with(ColumnRule::Identifier, &["id"])
        .with(ColumnRule::EpochMillis, &["closed"]);

    let table = table_of(vec![
        json!({"price": "10.5", "id": 123_456_789_012_345_i64, "closed": "1700000000000"}),
        json!({"price": "free", "closed": "never"}),
    ]);

    let batch = table_to_record_batch(&table, &rules).unwrap();
    let schema = batch.schema();

    let price = schema.field_with_name("price").unwrap();
    assert_eq!(price.data_type(), &DataType::Float64);
    assert!(!price.is_nullable());

    let id = schema.field_with_name("id").unwrap();
    assert_eq!(id.data_type(), &DataType::Utf8);
    assert!(!id.is_nullable());

    assert_eq!(
        schema.field_with_name("closed").unwrap().data_type(),
        &DataType::Int64
    );

    let records = arrow_to_json(&batch).unwrap();
    assert_eq!(
        records,
        vec![
            json!({"price": 10.5, "id": "123456789012345", "closed": 1_700_000_000_000_i64}),
            json!({"price": 0.0, "id": "0", "closed": null}),
        ]
    );
}

#[test]
fn test_empty_table() {
    let batch = table_to_record_batch(&Table::new(), &CoercionRules::sales()).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 0);
}

// ============================================================================
// Parquet Tests
// ============================================================================

#[test]
fn test_parquet_written_with_default_properties() {
    let table = table_of(vec![json!({"product_id": "9"})]);
    let batch = table_to_record_batch(&table, &CoercionRules::sales()).unwrap();
    let bytes = write_batch_to_parquet_bytes(&batch, None).unwrap();

    let reader = SerializedFileReader::new(bytes).unwrap();
    let metadata = reader.metadata();
    assert_eq!(metadata.num_row_groups(), 1);
    assert_eq!(metadata.row_group(0).column(0).compression(), Compression::SNAPPY);
}

#[test]
fn test_parquet_bytes_read_back() {
    let table = table_of(vec![
        json!({"product_id": "9", "product_price": "10.5"}),
        json!({"product_id": "10", "product_price": "3"}),
    ]);
    let batch = table_to_record_batch(&table, &CoercionRules::sales()).unwrap();

    let bytes = write_batch_to_parquet_bytes(&batch, None).unwrap();
    assert!(bytes.starts_with(b"PAR1"));

    let batches = read_parquet_bytes(bytes).unwrap();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 2);

    let records = arrow_to_json(&batches[0]).unwrap();
    assert_eq!(records[1]["product_id"], json!("10"));
    assert_eq!(records[1]["product_price"], json!(3.0));
}

#[test]
fn test_parquet_bytes_deterministic() {
    let table = table_of(vec![json!({"a": 1, "b": "x"})]);
    let batch = table_to_record_batch(&table, &CoercionRules::new()).unwrap();
    let config = ParquetWriterConfig::default();

    let first = write_batch_to_parquet_bytes(&batch, Some(&config)).unwrap();
    let second = write_batch_to_parquet_bytes(&batch, Some(&config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_read_garbage_is_error() {
    assert!(read_parquet_bytes(bytes::Bytes::from_static(b"not parquet")).is_err());
}
