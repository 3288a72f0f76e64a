//! Document fetcher for daily newsletter pages.
//!
//! One [`DocumentFetcher`] serves a whole batch: it holds a single shared
//! [`reqwest::Client`] so connections are reused across keys rather than
//! re-established per request. Pages are addressed as `GET {base}/{key}`
//! with a fixed browser user-agent.
//!
//! Batch fetches run with bounded concurrency but preserve input key order
//! in their output, so the final aggregation step can rely on row order
//! matching the order the date keys were supplied.

use crate::errors::{PipelineError, Result};
use crate::models::DateKey;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Endpoint the daily pages are served from; one page per date key.
pub const DEFAULT_BASE_URL: &str = "https://thecolumn.co/daily";

/// Default per-request timeout; a timed-out fetch is a fetch error.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default bound on in-flight fetches for a batch.
pub const DEFAULT_CONCURRENCY: usize = 8;

// The source serves different markup to unknown agents, so present as a
// desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36";

/// Fetches raw HTML for date keys over one shared connection pool.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
    base_url: Url,
    concurrency: usize,
}

impl DocumentFetcher {
    /// Build a fetcher with the default endpoint, timeout, and concurrency.
    pub fn new() -> std::result::Result<Self, Box<dyn Error>> {
        Self::with_options(
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_CONCURRENCY,
        )
    }

    /// Build a fetcher against a specific base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Endpoint prefix; the date key becomes the last path segment
    /// * `timeout` - Per-request timeout
    /// * `concurrency` - Maximum in-flight requests during a batch fetch
    ///
    /// # Errors
    ///
    /// Fails if `base_url` does not parse or the HTTP client cannot be built.
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        concurrency: usize,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            concurrency: concurrency.max(1),
        })
    }

    /// URL for one date key: the key appended as a path segment.
    fn page_url(&self, key: &DateKey) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(key.as_str());
        }
        url
    }

    /// Fetch the raw HTML page for one date key.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Fetch`] naming the key on any non-2xx
    /// response, transport failure, or timeout.
    #[instrument(level = "debug", skip(self), fields(key = %key))]
    pub async fn fetch_page(&self, key: &DateKey) -> Result<String> {
        let url = self.page_url(key);
        debug!(%url, "Requesting daily page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                key: key.to_string(),
                status: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::Fetch {
                key: key.to_string(),
                status: format!("HTTP {}", response.status()),
            });
        }

        let body = response.text().await.map_err(|e| PipelineError::Fetch {
            key: key.to_string(),
            status: e.to_string(),
        })?;
        debug!(bytes = body.len(), "Fetched daily page");
        Ok(body)
    }

    /// Fetch pages for a batch of keys with bounded concurrency.
    ///
    /// Per-key failures are collected instead of aborting the batch. The
    /// returned vector pairs each key with its outcome, in the same order
    /// the keys were supplied, regardless of fetch completion order.
    #[instrument(level = "info", skip_all, fields(keys = keys.len()))]
    pub async fn fetch_pages(&self, keys: &[DateKey]) -> Vec<(DateKey, Result<String>)> {
        let pages: Vec<(DateKey, Result<String>)> = stream::iter(keys.iter().cloned())
            .map(|key| async move {
                let page = self.fetch_page(&key).await;
                if let Err(ref e) = page {
                    warn!(key = %key, error = %e, "Fetch failed");
                }
                (key, page)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let fetched = pages.iter().filter(|(_, page)| page.is_ok()).count();
        info!(
            total = pages.len(),
            fetched,
            failed = pages.len() - fetched,
            "Fetched daily pages"
        );
        pages
    }
}
