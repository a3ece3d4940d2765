//! HTTP client abstraction for testability

use super::types::SourceError;
use std::future::Future;
use std::time::Duration;
use tracing::{trace, warn};

/// Default User-Agent string for HTTP requests.
/// Some public tile servers reject requests without a User-Agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP GET operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error. Non-success statuses are
    /// reported as [`SourceError::HttpStatus`].
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Real HTTP client implementation using reqwest.
///
/// Uses non-blocking I/O with a shared connection pool, so the handful of
/// in-flight tile requests of a batch reuse warm connections to the tile
/// server.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| SourceError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        trace!(url = url, "HTTP GET request starting");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::HttpError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(SourceError::HttpError(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}
