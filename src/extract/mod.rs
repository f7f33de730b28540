//! Extraction module
//!
//! Fetches data from the POS API and persists it verbatim as raw JSON
//! snapshots. Nothing is transformed here.

mod dimensions;
mod sales;

pub use dimensions::DimensionExtractor;
pub use sales::SalesExtractor;

/// What an extraction produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// A raw snapshot was written
    Written { key: String, records: usize },
    /// The API answered without usable data; nothing was written
    Empty,
    /// The source has no endpoint configured
    NotConfigured,
}
