//! # Column Data Pipeline
//!
//! An ingestion pipeline that fetches daily Column newsletter pages,
//! extracts their content sections across two historical HTML layouts, and
//! normalizes the result into two flat tables (links, article sections)
//! for downstream analytics and dashboard code.
//!
//! ## Features
//!
//! - Fetches daily pages by `MMDDYYYY` date key over one shared connection
//!   pool, with bounded concurrency and per-request timeouts
//! - Auto-selects the extraction strategy per document: id-marked sections
//!   (current layout) or positional recovery by row-count signature
//!   (legacy layout), so mixed-era batches need no format flag
//! - Collects per-date failures instead of aborting the batch, and reports
//!   which dates succeeded, which failed, and why
//! - Writes the link and article tables as CSV and/or a batch JSON document
//!
//! ## Usage
//!
//! ```sh
//! column_data_pipeline 10272021 10292021 11052021 -o ./data
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Download raw HTML for each date key (concurrent, order-preserving)
//! 2. **Extraction**: Locate the page's sections with the layout-appropriate strategy
//! 3. **Normalization**: Emit link and article-section records per date
//! 4. **Aggregation**: Concatenate per-date records into the two final tables

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregate;
mod cli;
mod errors;
mod extract;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod utils;

use cli::{Cli, OutputFormat};
use fetch::DocumentFetcher;
use models::{BatchFailure, DateKey};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("column_data_pipeline starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.out_dir, ?args.format, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.out_dir).await {
        error!(
            path = %args.out_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Collect date keys ----
    let mut raw_keys = args.dates.clone();
    if let Some(ref path) = args.dates_file {
        let contents = tokio::fs::read_to_string(path).await?;
        raw_keys.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    info!(count = raw_keys.len(), "Date keys to process");

    // Invalid keys are reported alongside fetch/parse failures rather than
    // aborting the run.
    let mut keys = Vec::with_capacity(raw_keys.len());
    let mut key_failures = Vec::new();
    for raw in &raw_keys {
        match DateKey::parse(raw) {
            Ok(key) => keys.push(key),
            Err(e) => {
                warn!(key = %raw, error = %e, "Skipping invalid date key");
                key_failures.push(BatchFailure {
                    key: raw.clone(),
                    error: e,
                });
            }
        }
    }

    // ---- Fetch and parse ----
    let fetcher = DocumentFetcher::with_options(
        &args.base_url,
        Duration::from_secs(args.timeout_secs),
        args.concurrency,
    )?;
    let mut report = pipeline::run(&fetcher, &keys).await;
    report.failures.extend(key_failures);

    // ---- Aggregate and write tables ----
    let (link_table, article_table) = aggregate::aggregate(&report.results);
    info!(
        link_rows = link_table.len(),
        article_rows = article_table.len(),
        "Aggregated tables"
    );

    if matches!(args.format, OutputFormat::Csv | OutputFormat::Both) {
        if let Err(e) = outputs::csv::write_tables(&link_table, &article_table, &args.out_dir).await
        {
            error!(error = %e, "Failed to write CSV tables");
            return Err(e);
        }
    }
    if matches!(args.format, OutputFormat::Json | OutputFormat::Both) {
        if let Err(e) = outputs::json::write_batch(
            &link_table,
            &article_table,
            &report.failures,
            &args.out_dir,
        )
        .await
        {
            error!(error = %e, "Failed to write batch JSON");
            return Err(e);
        }
    }

    // ---- Run report ----
    for failure in &report.failures {
        error!(key = %failure.key, error = %failure.error, "Date failed");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Execution complete"
    );

    Ok(())
}
