//! Table to Arrow conversion
//!
//! Ruled columns get fixed types from their [`ColumnRule`]; every other column
//! has its type inferred from the JSON values it holds.

use crate::error::{Error, Result};
use crate::transform::{
    coerce_epoch_millis, coerce_identifier, coerce_numeric, CoercionRules, ColumnRule, Table,
};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;

/// Convert a table to an Arrow RecordBatch, applying coercion rules
pub fn table_to_record_batch(table: &Table, rules: &CoercionRules) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = Vec::with_capacity(table.columns().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for name in table.columns() {
        let values: Vec<Option<&Value>> = table.column_values(name).collect();

        let (field, array) = match rules.rule_for(name) {
            Some(ColumnRule::Numeric) => {
                let arr: Float64Array = values
                    .iter()
                    .map(|v| Some(coerce_numeric(*v)))
                    .collect();
                (Field::new(name, DataType::Float64, false), Arc::new(arr) as ArrayRef)
            }
            Some(ColumnRule::Identifier) => {
                let arr: StringArray = values
                    .iter()
                    .map(|v| Some(coerce_identifier(*v)))
                    .collect();
                (Field::new(name, DataType::Utf8, false), Arc::new(arr) as ArrayRef)
            }
            Some(ColumnRule::EpochMillis) => {
                let arr: Int64Array = values.iter().map(|v| coerce_epoch_millis(*v)).collect();
                (Field::new(name, DataType::Int64, true), Arc::new(arr) as ArrayRef)
            }
            None => {
                let data_type = infer_column_type(&values);
                let array = build_array(&values, &data_type);
                (Field::new(name, data_type, true), array)
            }
        };

        fields.push(field);
        columns.push(array);
    }

    if columns.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Infer the Arrow type of a column from its values
///
/// Columns with no non-null values, nested values, or conflicting scalar
/// types are stored as text.
fn infer_column_type(values: &[Option<&Value>]) -> DataType {
    let merged = values
        .iter()
        .flatten()
        .map(|v| infer_type(v))
        .fold(DataType::Null, |acc, t| merge_types(&acc, &t));

    if merged == DataType::Null {
        DataType::Utf8
    } else {
        merged
    }
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) | Value::Array(_) | Value::Object(_) => DataType::Utf8,
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        // Same types
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Numbers can merge (prefer Float64 for mixed)
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Arc::new(arr)
        }

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Arc::new(arr)
        }
    }
}

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns a vector of JSON objects, one per row in the batch.
pub fn arrow_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let num_rows = batch.num_rows();
    let mut records = Vec::with_capacity(num_rows);

    for row_idx in 0..num_rows {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let column = batch.column(col_idx);
            let value = array_value_to_json(column.as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let downcast_error = |name: &str| Error::Output {
        message: format!("Failed to downcast to {name}"),
    };

    match array.data_type() {
        DataType::Boolean => {
            let arr = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| downcast_error("BooleanArray"))?;
            Ok(Value::Bool(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| downcast_error("Int64Array"))?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| downcast_error("Float64Array"))?;
            let val = arr.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| downcast_error("StringArray"))?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        other => Err(Error::output(format!("Unsupported column type {other}"))),
    }
}
