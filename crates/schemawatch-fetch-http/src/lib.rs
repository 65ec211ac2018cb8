// # HTTP Schema Fetcher
//
// This crate provides the HTTP transport for the schemawatch system.
//
// ## Architecture
//
// One fetch is one conditional GET: the engine's remembered validators are
// sent as `If-None-Match` / `If-Modified-Since`, a 304 becomes
// `FetchResult::NotModified`, a 2xx carries the body plus any fresh
// validators, and everything else is a transport error. No retries, no
// redirect tuning beyond reqwest defaults; the request timeout is the only
// policy this crate owns.

use schemawatch_core::config::FetchConfig;
use schemawatch_core::traits::fetcher::{CacheValidators, FetchResult, SchemaFetcher};
use schemawatch_core::{Error, Result};

use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use std::time::Duration;

/// HTTP-based schema fetcher
pub struct HttpSchemaFetcher {
    /// HTTP client
    client: reqwest::Client,
}

impl HttpSchemaFetcher {
    /// Create a fetcher from transport configuration
    pub fn new(config: &FetchConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

/// Read a response header as an owned string, dropping non-UTF-8 values
fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait::async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn fetch(&self, url: &str, validators: &CacheValidators) -> Result<FetchResult> {
        let mut request = self.client.get(url);
        if let Some(etag) = &validators.etag {
            request = request.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = &validators.last_modified {
            request = request.header(IF_MODIFIED_SINCE, last_modified);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_MODIFIED {
            tracing::debug!(%url, "Server returned 304 Not Modified");
            return Ok(FetchResult::NotModified);
        }

        if !status.is_success() {
            return Err(Error::http(format!("Fetch failed: {}", status)));
        }

        // Read validators before the body consumes the response
        let validators = CacheValidators {
            etag: header_string(&response, ETAG),
            last_modified: header_string(&response, LAST_MODIFIED),
        };

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(%url, bytes = body.len(), "Fetched schema body");
        Ok(FetchResult::Modified { body, validators })
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}
