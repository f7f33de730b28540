//! Column type coercion
//!
//! Coercion never fails: unparseable numerics become `0`, missing identifiers
//! become the text `"0"`, and unparseable timestamps become null.

use crate::types::{Dimension, JsonValue};
use std::collections::BTreeMap;

/// Sales columns parsed as floating point
pub const SALES_NUMERIC_COLUMNS: &[&str] = &[
    "product_price",
    "num",
    "product_profit",
    "product_cost",
    "product_cost_netto",
    "receipt_payed_sum",
    "receipt_discount",
    "receipt_tip_sum",
    "receipt_guests_count",
    "receipt_tax_sum",
    "receipt_bonus",
];

/// Sales columns forced to text
pub const SALES_IDENTIFIER_COLUMNS: &[&str] = &[
    "receipt_transaction_id",
    "receipt_user_id",
    "receipt_client_id",
    "modification_id",
    "product_id",
];

/// Sales columns holding epoch-millisecond timestamps
pub const SALES_TIMESTAMP_COLUMNS: &[&str] = &["receipt_date_close", "receipt_date_start"];

/// Numeric columns per dimension; dimensions not listed get no coercion
pub const DIMENSION_NUMERIC_COLUMNS: &[(Dimension, &[&str])] = &[
    (Dimension::Products, &["price", "cost", "net_cost"]),
    (Dimension::Spots, &["profit"]),
    (Dimension::Categories, &[]),
];

/// How a column is coerced before output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Non-null Float64, unparseable values become 0
    Numeric,
    /// Non-null text, missing values become "0"
    Identifier,
    /// Nullable Int64 epoch milliseconds
    EpochMillis,
}

/// Column name to rule mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionRules {
    rules: BTreeMap<String, ColumnRule>,
}

impl CoercionRules {
    /// No coercion at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `rule` to every column in `columns`
    #[must_use]
    pub fn with(mut self, rule: ColumnRule, columns: &[&str]) -> Self {
        for column in columns {
            self.rules.insert((*column).to_string(), rule);
        }
        self
    }

    /// Rules for the flattened sales table
    pub fn sales() -> Self {
        Self::new()
            .with(ColumnRule::Numeric, SALES_NUMERIC_COLUMNS)
            .with(ColumnRule::Identifier, SALES_IDENTIFIER_COLUMNS)
            .with(ColumnRule::EpochMillis, SALES_TIMESTAMP_COLUMNS)
    }

    /// Rules for one dimension table
    pub fn for_dimension(dim: Dimension) -> Self {
        DIMENSION_NUMERIC_COLUMNS
            .iter()
            .find(|(d, _)| *d == dim)
            .map_or_else(Self::new, |(_, columns)| {
                Self::new().with(ColumnRule::Numeric, columns)
            })
    }

    /// Rule for a column, if any
    pub fn rule_for(&self, column: &str) -> Option<ColumnRule> {
        self.rules.get(column).copied()
    }

    /// Number of ruled columns
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no column is ruled
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse a cell as a float, defaulting to 0
pub fn coerce_numeric(value: Option<&JsonValue>) -> f64 {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        Some(JsonValue::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Render a cell as identifier text, defaulting to "0"
pub fn coerce_identifier(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => "0".to_string(),
        Some(JsonValue::String(s)) => match s.trim() {
            "" | "nan" | "None" => "0".to_string(),
            _ => s.clone(),
        },
        Some(JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    // integral floats print without a trailing ".0"
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
                    _ => n.to_string(),
                }
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Parse a cell as epoch milliseconds; unparseable values are null
pub fn coerce_epoch_millis(value: Option<&JsonValue>) -> Option<i64> {
    match value? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("10.5") => 10.5 ; "decimal string")]
    #[test_case(json!(" 2 ") => 2.0 ; "padded string")]
    #[test_case(json!(3) => 3.0 ; "integer")]
    #[test_case(json!(1.25) => 1.25 ; "float")]
    #[test_case(json!("free") => 0.0 ; "word")]
    #[test_case(json!("") => 0.0 ; "empty string")]
    #[test_case(json!(null) => 0.0 ; "null")]
    #[test_case(json!("NaN") => 0.0 ; "nan string")]
    #[test_case(json!({"amount": 1}) => 0.0 ; "object")]
    #[test_case(json!(true) => 1.0 ; "boolean")]
    fn test_coerce_numeric(value: JsonValue) -> f64 {
        coerce_numeric(Some(&value))
    }

    #[test]
    fn test_coerce_numeric_missing() {
        assert_eq!(coerce_numeric(None), 0.0);
    }

    #[test_case(json!("123456789012345") => "123456789012345" ; "long id string")]
    #[test_case(json!("007") => "007" ; "leading zeros")]
    #[test_case(json!(123_456_789_012_345_i64) => "123456789012345" ; "long id number")]
    #[test_case(json!(42.0) => "42" ; "integral float")]
    #[test_case(json!("") => "0" ; "empty")]
    #[test_case(json!(null) => "0" ; "null")]
    #[test_case(json!("None") => "0" ; "none text")]
    fn test_coerce_identifier(value: JsonValue) -> String {
        coerce_identifier(Some(&value))
    }

    #[test]
    fn test_coerce_identifier_missing() {
        assert_eq!(coerce_identifier(None), "0");
    }

    #[test_case(json!("1700000000000") => Some(1_700_000_000_000) ; "string millis")]
    #[test_case(json!(1_700_000_000_000_i64) => Some(1_700_000_000_000) ; "number millis")]
    #[test_case(json!("1700000000000.0") => Some(1_700_000_000_000) ; "float string")]
    #[test_case(json!("yesterday") => None ; "word")]
    #[test_case(json!(null) => None ; "null")]
    fn test_coerce_epoch_millis(value: JsonValue) -> Option<i64> {
        coerce_epoch_millis(Some(&value))
    }

    #[test]
    fn test_sales_rules() {
        let rules = CoercionRules::sales();
        assert_eq!(rules.rule_for("product_price"), Some(ColumnRule::Numeric));
        assert_eq!(rules.rule_for("receipt_bonus"), Some(ColumnRule::Numeric));
        assert_eq!(rules.rule_for("product_id"), Some(ColumnRule::Identifier));
        assert_eq!(
            rules.rule_for("receipt_date_close"),
            Some(ColumnRule::EpochMillis)
        );
        assert_eq!(rules.rule_for("receipt_table_name"), None);
        assert_eq!(rules.len(), 18);
    }

    #[test]
    fn test_dimension_rules() {
        let products = CoercionRules::for_dimension(Dimension::Products);
        assert_eq!(products.rule_for("net_cost"), Some(ColumnRule::Numeric));
        assert_eq!(products.len(), 3);

        let spots = CoercionRules::for_dimension(Dimension::Spots);
        assert_eq!(spots.rule_for("profit"), Some(ColumnRule::Numeric));

        assert!(CoercionRules::for_dimension(Dimension::Categories).is_empty());
        assert!(CoercionRules::for_dimension(Dimension::Employees).is_empty());
    }
}
