//! HTTP client module
//!
//! One shared session with per-request timeouts. Failed requests are
//! reported to the caller and never retried.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
