//! Section extraction strategies for the two historical page layouts.
//!
//! Every daily page carries the same five logical sections (three lead
//! stories, a headlines list, and a message of the day), but the markup
//! changed over time:
//!
//! - **Current layout** ([`current`]): each section sits inside a `<tr>`
//!   tagged with its section id, so extraction is a direct lookup.
//! - **Legacy layout** ([`legacy`]): no id markers; sections are recovered
//!   positionally from the sequence of `table.container` blocks using a
//!   row-count signature and the page's own embedded date.
//!
//! The strategy is auto-selected per document by [`detect_strategy`]: the
//! current layout is signalled by the presence of an id-marked section row,
//! so mixed-era batches need no caller-supplied format flag.

pub mod current;
pub mod legacy;

use crate::errors::Result;
use crate::models::{DateKey, SectionMap};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::fmt;
use tracing::debug;

/// Date on and after which pages carry the two extra sections.
pub static FORMAT_CUTOVER: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2020, 12, 28).unwrap());

// An id-marked first-story row only exists in the current layout.
static CURRENT_MARKER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"tr[id="1"]"#).unwrap());

/// Which extraction strategy applies to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Id-marked sections; direct lookup.
    Current,
    /// Unlabeled sections; positional recovery.
    Legacy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Current => f.write_str("current"),
            Strategy::Legacy => f.write_str("legacy"),
        }
    }
}

/// Pick the extraction strategy for one parsed document.
pub fn detect_strategy(doc: &Html) -> Strategy {
    if doc.select(&CURRENT_MARKER).next().is_some() {
        Strategy::Current
    } else {
        Strategy::Legacy
    }
}

/// Extract the section map from a document, auto-selecting the strategy.
///
/// # Errors
///
/// Returns [`crate::errors::PipelineError::MalformedDocument`] or
/// [`crate::errors::PipelineError::ParseDate`] (legacy pages embed their own
/// date) attributed to `key` when the page violates its layout's structural
/// assumptions.
pub fn extract<'a>(doc: &'a Html, key: &DateKey) -> Result<SectionMap<'a>> {
    let strategy = detect_strategy(doc);
    debug!(key = %key, %strategy, "Selected extraction strategy");
    match strategy {
        Strategy::Current => current::extract(doc, key),
        Strategy::Legacy => legacy::extract(doc, key),
    }
}
