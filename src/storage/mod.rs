//! Object storage module
//!
//! Raw JSON snapshots and curated Parquet tables live in one bucket (or a
//! local directory for development runs), addressed by the keys built in
//! [`crate::partition`].

mod client;

pub use client::{ObjectStoreClient, ObjectSummary};
