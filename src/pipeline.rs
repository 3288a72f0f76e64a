//! Batch orchestration: date keys in, a [`BatchReport`] out.
//!
//! Fetching runs with bounded concurrency; parsing runs per page once its
//! body is in hand (the parsed HTML tree is not `Send`, and extraction over
//! an in-memory page is cheap). A failure on one date is recorded against
//! that date and the batch continues, so the caller can always report which
//! dates succeeded, which failed, and why. Successful results keep the
//! order their keys were supplied in.

use crate::errors::Result;
use crate::extract;
use crate::fetch::DocumentFetcher;
use crate::models::{BatchFailure, BatchReport, DateKey, ParsedDateResult};
use crate::normalize;
use crate::utils::truncate_for_log;
use scraper::Html;
use tracing::{info, instrument, warn};

/// Parse one fetched page body into its per-date record bundle.
///
/// # Errors
///
/// Propagates extraction and normalization errors, all attributed to `key`.
pub fn parse_page(key: &DateKey, html: &str) -> Result<ParsedDateResult> {
    let doc = Html::parse_document(html);
    let sections = extract::extract(&doc, key)?;
    normalize::normalize(key, &sections)
}

/// Fetch and parse a batch of date keys, collecting per-date failures.
#[instrument(level = "info", skip_all, fields(keys = keys.len()))]
pub async fn run(fetcher: &DocumentFetcher, keys: &[DateKey]) -> BatchReport {
    let pages = fetcher.fetch_pages(keys).await;

    let mut report = BatchReport::default();
    for (key, page) in pages {
        let parsed = page.and_then(|html| {
            parse_page(&key, &html).map_err(|e| {
                warn!(
                    key = %key,
                    preview = %truncate_for_log(&html, 200),
                    "Page did not match either layout's structure"
                );
                e
            })
        });
        match parsed {
            Ok(result) => {
                info!(
                    key = %key,
                    sections = result.articles.len(),
                    links = result.links.len(),
                    "Parsed daily page"
                );
                report.results.push(result);
            }
            Err(error) => {
                warn!(key = %key, error = %error, "Skipping date");
                report.failures.push(BatchFailure {
                    key: key.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        total = keys.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Batch complete"
    );
    report
}
