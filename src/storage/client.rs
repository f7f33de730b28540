//! Object store client
//!
//! Reads and writes whole objects by key. Every write is a full overwrite;
//! a missing key on read is `Ok(None)`, never an error.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Error, Result};
use crate::output::{write_batch_to_parquet_bytes, ParquetWriterConfig};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Summary of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: usize,
}

/// Object store client for raw snapshots and curated tables
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Human-readable root, e.g. `s3://bucket`, used in logs
    location: String,
}

impl ObjectStoreClient {
    /// Wrap an existing object store
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
        }
    }

    /// Client over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory://local")
    }

    /// Build the client described by the storage configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match &config.backend {
            StorageBackend::S3 {
                bucket,
                region,
                access_key_id,
                secret_access_key,
                endpoint,
            } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(key) = access_key_id {
                    builder = builder.with_access_key_id(key);
                }
                if let Some(secret) = secret_access_key {
                    builder = builder.with_secret_access_key(secret);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }

                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;

                Ok(Self::new(Arc::new(store), format!("s3://{bucket}")))
            }
            StorageBackend::Local { root } => Self::local(root),
        }
    }

    /// Client over a local directory, created if absent
    pub fn local(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            Error::config(format!("Failed to create directory {}: {e}", root.display()))
        })?;

        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self::new(
            Arc::new(store),
            format!("file://{}", root.display()),
        ))
    }

    /// Root location, for logging
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Full URL of a key, for logging
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.location.trim_end_matches('/'))
    }

    /// Write raw bytes at `key`
    pub async fn put_bytes(&self, key: &str, data: Bytes) -> Result<()> {
        self.store
            .put(&ObjectPath::from(key), data.into())
            .await
            .map_err(|e| Error::storage_write(key, e.to_string()))?;
        Ok(())
    }

    /// Read raw bytes at `key`; `None` if absent
    pub async fn get_bytes(&self, key: &str) -> Result<Option<Bytes>> {
        let result = match self.store.get(&ObjectPath::from(key)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                debug!("No object at {}", self.url_for(key));
                return Ok(None);
            }
            Err(e) => return Err(Error::storage_read(key, e.to_string())),
        };

        let data = result
            .bytes()
            .await
            .map_err(|e| Error::storage_read(key, e.to_string()))?;
        Ok(Some(data))
    }

    /// Serialise `value` as pretty-printed JSON and write it at `key`
    pub async fn put_json(&self, key: &str, value: &Value) -> Result<()> {
        let body = serde_json::to_vec_pretty(value)?;
        let records = value
            .as_array()
            .or_else(|| value.get(crate::snapshot::ENVELOPE_KEY).and_then(Value::as_array))
            .map_or(1, Vec::len);

        info!("Uploading {} records to {}", records, self.url_for(key));
        self.put_bytes(key, Bytes::from(body)).await
    }

    /// Read and parse the JSON document at `key`; `None` if absent
    pub async fn get_json(&self, key: &str) -> Result<Option<Value>> {
        let Some(data) = self.get_bytes(key).await? else {
            return Ok(None);
        };

        let value = serde_json::from_slice(&data)
            .map_err(|e| Error::transform(key, format!("stored JSON is invalid: {e}")))?;
        debug!("Read {} bytes from {}", data.len(), self.url_for(key));
        Ok(Some(value))
    }

    /// Serialise a RecordBatch as Parquet and write it at `key`
    ///
    /// Returns the number of bytes written.
    pub async fn put_parquet(
        &self,
        key: &str,
        batch: &RecordBatch,
        config: &ParquetWriterConfig,
    ) -> Result<usize> {
        let data = write_batch_to_parquet_bytes(batch, Some(config))?;
        let size = data.len();
        self.put_bytes(key, data).await?;
        info!(
            "Wrote {} rows ({} bytes) to {}",
            batch.num_rows(),
            size,
            self.url_for(key)
        );
        Ok(size)
    }

    /// List objects under an optional prefix, sorted by key
    pub async fn list(&self, prefix: Option<&str>) -> Result<Vec<ObjectSummary>> {
        let prefix_path = prefix.map(ObjectPath::from);
        let mut objects: Vec<ObjectSummary> = self
            .store
            .list(prefix_path.as_ref())
            .map_ok(|meta| ObjectSummary {
                key: meta.location.to_string(),
                size: meta.size,
            })
            .try_collect()
            .await
            .map_err(|e| Error::storage_read(prefix.unwrap_or(""), e.to_string()))?;

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}
