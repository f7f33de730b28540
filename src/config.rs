//! Runtime configuration
//!
//! The whole pipeline is configured from environment variables, optionally
//! seeded from a `.env` file. [`AppConfig`] is built once at process start and
//! handed to every component constructor.

use crate::error::{Error, Result};
use crate::types::Dimension;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default location of the environment file
pub const DEFAULT_ENV_PATH: &str = "config/.env";

/// Default per-request timeout against the POS API
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// API Config
// ============================================================================

/// Remote POS API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Access token sent as the `token` query parameter
    pub token: String,
    /// Transaction list endpoint
    pub transactions_url: Option<String>,
    /// Endpoint per dimension; absent dimensions are skipped
    pub dimension_urls: HashMap<Dimension, String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Endpoint for a dimension, if configured
    pub fn dimension_url(&self, dim: Dimension) -> Option<&str> {
        self.dimension_urls.get(&dim).map(String::as_str)
    }
}

// ============================================================================
// Storage Config
// ============================================================================

/// Where snapshots and curated tables are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3 (or an S3-compatible service)
    S3 {
        bucket: String,
        region: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        endpoint: Option<String>,
    },
    /// Local directory, used for development runs
    Local { root: PathBuf },
}

/// Object storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

// ============================================================================
// App Config
// ============================================================================

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("POSTER_TOKEN")
            .or_else(|| get("POS_API_TOKEN"))
            .ok_or_else(|| Error::missing_field("POSTER_TOKEN"))?;

        let dimension_urls = Dimension::ALL
            .into_iter()
            .filter_map(|dim| get(dim.url_var()).map(|url| (dim, url)))
            .collect();

        let timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::invalid_value("HTTP_TIMEOUT_SECS", format!("not a number: {raw}"))
                })?;
                if secs == 0 {
                    return Err(Error::invalid_value(
                        "HTTP_TIMEOUT_SECS",
                        "must be greater than zero",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let backend = match get("LOCAL_STORAGE_DIR") {
            Some(root) => StorageBackend::Local {
                root: PathBuf::from(root),
            },
            None => StorageBackend::S3 {
                bucket: get("S3_BUCKET").ok_or_else(|| Error::missing_field("S3_BUCKET"))?,
                region: get("AWS_REGION"),
                access_key_id: get("AWS_ACCESS_KEY_ID"),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
                endpoint: get("S3_ENDPOINT"),
            },
        };

        Ok(Self {
            api: ApiConfig {
                token,
                transactions_url: get("TRANSACTION_URL"),
                dimension_urls,
                timeout,
            },
            storage: StorageConfig { backend },
        })
    }
}

/// Resolve which environment file to load
///
/// An explicit path wins, then `ENV_PATH`, then [`DEFAULT_ENV_PATH`].
pub fn resolve_env_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("ENV_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_PATH))
}

/// Load variables from an environment file without overriding the process env
///
/// Returns whether the file was found and loaded.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(e) if e.not_found() => {
            debug!("No environment file at {}", path.display());
            Ok(false)
        }
        Err(e) => Err(Error::config(format!(
            "Failed to load environment file {}: {e}",
            path.display()
        ))),
    }
}
