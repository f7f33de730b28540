//! Row-oriented intermediate table
//!
//! Rows are JSON objects; the table tracks the union of their keys in the
//! order each column was first seen, so output column order is stable.

use crate::types::{JsonObject, JsonValue};
use std::collections::HashSet;

/// Flattened rows plus their column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    seen: HashSet<String>,
    rows: Vec<JsonObject>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, registering any new columns
    pub fn push_row(&mut self, row: JsonObject) {
        for key in row.keys() {
            if self.seen.insert(key.clone()) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether a column exists in any row
    pub fn has_column(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// All rows
    pub fn rows(&self) -> &[JsonObject] {
        &self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column; `None` where the row lacks the column
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a JsonValue>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}
