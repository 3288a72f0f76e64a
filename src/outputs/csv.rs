//! CSV output for the link and article tables.
//!
//! Column headers are a compatibility contract with the downstream
//! dashboard and must match the record field names exactly. Fields are
//! quoted only when they contain a delimiter, quote, or newline, with
//! embedded quotes doubled.

use crate::models::{ArticleSectionRecord, LinkRecord};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Write both tables as CSV files under `out_dir`.
///
/// Produces `{out_dir}/link_data.csv` and
/// `{out_dir}/article_section_data.csv`, creating the directory if needed.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir, links = links.len(), articles = articles.len()))]
pub async fn write_tables(
    links: &[LinkRecord],
    articles: &[ArticleSectionRecord],
    out_dir: &str,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir).await?;
    let base = out_dir.trim_end_matches('/');

    let link_path = format!("{base}/link_data.csv");
    fs::write(&link_path, render_link_table(links)).await?;
    info!(path = %link_path, rows = links.len(), "Wrote link table");

    let article_path = format!("{base}/article_section_data.csv");
    fs::write(&article_path, render_article_table(articles)).await?;
    info!(path = %article_path, rows = articles.len(), "Wrote article table");

    Ok(())
}

/// Render the link table with its fixed header row.
pub fn render_link_table(links: &[LinkRecord]) -> String {
    let mut out = String::from("Date,SectionId,LinkHref,LinkText\n");
    for link in links {
        out.push_str(&format!(
            "{},{},{},{}\n",
            link.date,
            csv_field(link.section_id.as_str()),
            csv_field(&link.link_href),
            csv_field(&link.link_text),
        ));
    }
    out
}

/// Render the article table with its fixed header row.
pub fn render_article_table(articles: &[ArticleSectionRecord]) -> String {
    let mut out = String::from("Date,SectionId,SectionText,SectionTextLength\n");
    for article in articles {
        out.push_str(&format!(
            "{},{},{},{}\n",
            article.date,
            csv_field(article.section_id.as_str()),
            csv_field(&article.section_text),
            article.section_text_length,
        ));
    }
    out
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
