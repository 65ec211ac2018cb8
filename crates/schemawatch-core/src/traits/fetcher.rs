// # Schema Fetcher Trait
//
// Defines the interface for retrieving the watched document.
//
// ## Purpose
//
// A fetcher performs exactly one conditional request per engine run. The
// engine attaches the cache validators remembered from the last successful
// fetch; the transport turns them into `If-None-Match` / `If-Modified-Since`
// preconditions so an unchanged server can short-circuit with 304.
//
// ## Implementations
//
// - HTTP: `schemawatch-fetch-http` crate (reqwest)
// - Test doubles live in the core crate's contract tests

use async_trait::async_trait;

/// Cache validators carried between runs
///
/// Both fields are opaque server-supplied strings; the engine never parses
/// them, it only echoes them back as request preconditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheValidators {
    /// Entity tag from the last successful fetch
    pub etag: Option<String>,
    /// Last-modification timestamp from the last successful fetch
    pub last_modified: Option<String>,
}

impl CacheValidators {
    /// True when neither validator is present (the request will be unconditional)
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// Result of a single fetch attempt
///
/// Transport failures (network errors, unexpected HTTP statuses) are not a
/// variant here; they surface as `Err(Error::Http)` from [`SchemaFetcher::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The server honored a precondition and signalled no change (304)
    NotModified,

    /// The server returned the document body
    Modified {
        /// Exact response body
        body: String,
        /// Validators supplied with this response (absent if the server sent none)
        validators: CacheValidators,
    },
}

/// Trait for transport implementations
///
/// # Single Attempt
///
/// One call is one bounded attempt: no retries, no backoff. Any timeout
/// policy belongs to the implementation, not the engine.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Fetch the document, conditionally if validators are present
    ///
    /// # Parameters
    ///
    /// - `url`: Where to fetch the document from
    /// - `validators`: Preconditions to attach; empty means unconditional
    ///
    /// # Returns
    ///
    /// - `Ok(FetchResult::NotModified)`: 304 short-circuit
    /// - `Ok(FetchResult::Modified { .. })`: 2xx with the body
    /// - `Err(Error)`: network failure or any other HTTP status
    async fn fetch(
        &self,
        url: &str,
        validators: &CacheValidators,
    ) -> Result<FetchResult, crate::Error>;

    /// Get the fetcher name (for logging/debugging)
    fn fetcher_name(&self) -> &'static str;
}
