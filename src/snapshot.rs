//! Raw snapshot shapes
//!
//! The POS API wraps lists in a `{"response": [...]}` envelope, while
//! dimension snapshots are stored already unwrapped. Both are accepted here
//! and normalised so downstream code only sees a plain list of records.

use crate::error::{Error, Result};
use serde_json::Value;

/// Key of the API response envelope
pub const ENVELOPE_KEY: &str = "response";

/// A raw fetch result, before any transformation
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// `{"response": [...]}`
    Enveloped(Vec<Value>),
    /// `[...]`
    Bare(Vec<Value>),
}

impl Snapshot {
    /// Classify a parsed JSON document
    ///
    /// Anything that is neither a list nor an object holding a `response`
    /// list is an [`Error::UnexpectedShape`] attributed to `source_name`.
    pub fn from_value(value: Value, source_name: &str) -> Result<Self> {
        match value {
            Value::Array(records) => Ok(Snapshot::Bare(records)),
            Value::Object(mut obj) => match obj.remove(ENVELOPE_KEY) {
                Some(Value::Array(records)) => Ok(Snapshot::Enveloped(records)),
                Some(other) => Err(Error::unexpected_shape(
                    source_name,
                    format!("'{ENVELOPE_KEY}' is {}, expected a list", type_name(&other)),
                )),
                None => Err(Error::unexpected_shape(
                    source_name,
                    format!("object has no '{ENVELOPE_KEY}' key"),
                )),
            },
            other => Err(Error::unexpected_shape(
                source_name,
                format!("document is {}, expected a list or envelope", type_name(&other)),
            )),
        }
    }

    /// Records held by the snapshot
    pub fn records(&self) -> &[Value] {
        match self {
            Snapshot::Enveloped(records) | Snapshot::Bare(records) => records,
        }
    }

    /// Consume the snapshot, yielding its records
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Snapshot::Enveloped(records) | Snapshot::Bare(records) => records,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
