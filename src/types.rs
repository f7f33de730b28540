//! Common types used throughout the pipeline
//!
//! Shared type aliases and the reference-data dimension catalogue.

use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Dimensions
// ============================================================================

/// Reference entity fetched as a full snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Products,
    Categories,
    Employees,
    Spots,
}

impl Dimension {
    /// Every dimension, in extraction order
    pub const ALL: [Dimension; 4] = [
        Dimension::Products,
        Dimension::Categories,
        Dimension::Employees,
        Dimension::Spots,
    ];

    /// Name used in storage keys and logs
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Products => "products",
            Dimension::Categories => "categories",
            Dimension::Employees => "employees",
            Dimension::Spots => "spots",
        }
    }

    /// Environment variable holding the endpoint URL
    pub fn url_var(self) -> &'static str {
        match self {
            Dimension::Products => "PRODUCTS_URL",
            Dimension::Categories => "CATEGORIES_URL",
            Dimension::Employees => "EMPLOYEES_URL",
            Dimension::Spots => "SPOTS_URL",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown dimension: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_names_round_trip() {
        for dim in Dimension::ALL {
            assert_eq!(dim.name().parse::<Dimension>().unwrap(), dim);
        }
        assert!("waiters".parse::<Dimension>().is_err());
    }
}
