//! Transform result types

/// What a transform run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// A curated table was written
    Written { key: String, rows: usize },
    /// The snapshot existed but flattened to zero rows; nothing was written
    Empty,
    /// No raw snapshot exists for the key
    MissingInput,
}
