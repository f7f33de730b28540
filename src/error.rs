//! Error types for the POS pipeline
//!
//! Every public API returns `Result<T, Error>`. Each variant maps onto one of
//! the failure classes in [`ErrorKind`], which is what the orchestrator uses to
//! decide between logging and continuing or aborting the run.

use thiserror::Error;

/// The main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // Remote API Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Unexpected response shape from '{source_name}': {message}")]
    UnexpectedShape {
        source_name: String,
        message: String,
    },

    // ============================================================================
    // Object Store Errors
    // ============================================================================
    #[error("Failed to write '{key}': {message}")]
    StorageWrite { key: String, message: String },

    #[error("Failed to read '{key}': {message}")]
    StorageRead { key: String, message: String },

    // ============================================================================
    // Transform Errors
    // ============================================================================
    #[error("Transform failed for '{key}': {message}")]
    Transform { key: String, message: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure classes of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, non-2xx status or timeout from the remote API
    Request,
    /// Response envelope missing the expected list
    UnexpectedShape,
    /// Object store write failure
    StorageWrite,
    /// Object store read failure (other than not-found)
    StorageRead,
    /// Malformed or unflattenable snapshot
    Transform,
    /// Invalid or missing configuration
    Config,
    /// Anything else
    Internal,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an unexpected shape error
    pub fn unexpected_shape(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage read error
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a transform error
    pub fn transform(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::Timeout { .. }
            | Error::InvalidUrl(_)
            | Error::Decode { .. } => ErrorKind::Request,
            Error::UnexpectedShape { .. } => ErrorKind::UnexpectedShape,
            Error::StorageWrite { .. } => ErrorKind::StorageWrite,
            Error::StorageRead { .. } => ErrorKind::StorageRead,
            Error::Transform { .. }
            | Error::Arrow(_)
            | Error::Parquet(_)
            | Error::Output { .. }
            | Error::JsonParse(_) => ErrorKind::Transform,
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. } => ErrorKind::Config,
            Error::Io(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// Whether a backfill loop may log this error and move on to the next unit
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Config)
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
