//! Record aggregator: per-date bundles in, the two final tables out.
//!
//! Aggregation is plain concatenation. Row order follows the order the
//! per-date results are supplied, which the pipeline keeps equal to the
//! order the date keys were requested; nothing is sorted or deduplicated,
//! and a date key supplied twice legally produces its rows twice.

use crate::models::{ArticleSectionRecord, LinkRecord, ParsedDateResult};

/// Flatten per-date results into the link table and the article table.
pub fn aggregate(
    results: &[ParsedDateResult],
) -> (Vec<LinkRecord>, Vec<ArticleSectionRecord>) {
    let mut link_table = Vec::new();
    let mut article_table = Vec::new();
    for result in results {
        link_table.extend(result.links.iter().cloned());
        article_table.extend(result.articles.iter().cloned());
    }
    (link_table, article_table)
}
