//! JSON output bundling both tables and the batch failure list.
//!
//! One document per batch run, so a downstream consumer can ingest the
//! tables and see in the same place which dates failed and why.

use crate::models::{ArticleSectionRecord, BatchFailure, LinkRecord};
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct BatchDocument<'a> {
    link_data: &'a [LinkRecord],
    article_section_data: &'a [ArticleSectionRecord],
    failures: Vec<FailureEntry>,
}

#[derive(Debug, Serialize)]
struct FailureEntry {
    key: String,
    error: String,
}

/// Write the batch document to `{out_dir}/batch.json`.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir))]
pub async fn write_batch(
    links: &[LinkRecord],
    articles: &[ArticleSectionRecord],
    failures: &[BatchFailure],
    out_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let document = BatchDocument {
        link_data: links,
        article_section_data: articles,
        failures: failures
            .iter()
            .map(|f| FailureEntry {
                key: f.key.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    };
    let json = serde_json::to_string(&document)?;

    fs::create_dir_all(out_dir).await?;
    let path = format!("{}/batch.json", out_dir.trim_end_matches('/'));
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote batch JSON");

    Ok(())
}
