//! Data models for daily pages, sections, and the produced table rows.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`DateKey`]: validated `MMDDYYYY` key identifying one daily page
//! - [`SectionId`] / [`Section`]: a located content block within one page
//! - [`LinkRecord`] / [`ArticleSectionRecord`]: the flat rows of the two
//!   output tables
//! - [`ParsedDateResult`]: the per-date bundle produced by the normalizer
//! - [`BatchReport`]: per-batch successes plus attributable failures
//!
//! The record structs use serde renames to pin the exact column names
//! (`Date`, `SectionId`, `LinkHref`, ...) that downstream dashboard and
//! storage consumers depend on.

use crate::errors::{PipelineError, Result};
use chrono::NaiveDate;
use scraper::ElementRef;
use serde::Serialize;
use std::fmt;

/// A calendar date encoded as an 8-character `MMDDYYYY` string.
///
/// The key doubles as the fetch key (`GET {base}/{key}`) and the lookup key
/// across all intermediate collections. Construction validates that the
/// string is a real calendar date; the parsed [`NaiveDate`] is carried
/// alongside the raw string so record emission never re-parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateKey {
    raw: String,
    date: NaiveDate,
}

impl DateKey {
    /// Parse and validate an `MMDDYYYY` date key.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ParseDate`] carrying the offending string if
    /// the input is not exactly 8 characters or does not name a real
    /// calendar date.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() != 8 {
            return Err(PipelineError::ParseDate {
                input: raw.to_string(),
            });
        }
        let date = NaiveDate::parse_from_str(raw, "%m%d%Y").map_err(|_| {
            PipelineError::ParseDate {
                input: raw.to_string(),
            }
        })?;
        Ok(Self {
            raw: raw.to_string(),
            date,
        })
    }

    /// The raw 8-character key, as used in fetch URLs.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed calendar date, as carried on every emitted record.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Identifier of one logical section within a daily page.
///
/// The set is fixed and ordered: three story sections followed by up to two
/// extra sections. Discovery order in both layouts always follows this
/// order, so positional assignment in the legacy extractor indexes straight
/// into [`SectionId::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SectionId {
    /// First lead story.
    #[serde(rename = "1")]
    Story1,
    /// Second lead story.
    #[serde(rename = "2")]
    Story2,
    /// Third lead story.
    #[serde(rename = "3")]
    Story3,
    /// Headlines list (post-cutover pages only).
    #[serde(rename = "headlines")]
    Headlines,
    /// Message of the day (post-cutover pages only).
    #[serde(rename = "MOTD")]
    Motd,
}

impl SectionId {
    /// All section ids in assignment order.
    pub const ALL: [SectionId; 5] = [
        SectionId::Story1,
        SectionId::Story2,
        SectionId::Story3,
        SectionId::Headlines,
        SectionId::Motd,
    ];

    /// Number of story sections every page is expected to carry.
    pub const STORY_COUNT: usize = 3;

    /// The id string as it appears in page markup and table rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Story1 => "1",
            SectionId::Story2 => "2",
            SectionId::Story3 => "3",
            SectionId::Headlines => "headlines",
            SectionId::Motd => "MOTD",
        }
    }

    /// Whether this id names a story section (title row + body row layout).
    pub fn is_story(&self) -> bool {
        matches!(
            self,
            SectionId::Story1 | SectionId::Story2 | SectionId::Story3
        )
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located content block within a parsed page.
///
/// Borrows its node from the page's [`scraper::Html`] tree, so sections are
/// created per document and consumed immediately by the normalizer; they are
/// never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    /// The `table.container` element holding this section's content.
    pub node: ElementRef<'a>,
    /// Story sections get title-row/body-row handling in the normalizer.
    pub is_story: bool,
}

/// Ordered section collection for one page, at most 5 entries.
pub type SectionMap<'a> = Vec<(SectionId, Section<'a>)>;

/// One hyperlink discovered inside a section's content.
///
/// Duplicate hrefs across sections are legal and preserved; no uniqueness is
/// enforced anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Calendar date of the page the link was found on.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Section the link was found in.
    #[serde(rename = "SectionId")]
    pub section_id: SectionId,
    /// The link's `href` attribute; empty if the anchor carries none.
    #[serde(rename = "LinkHref")]
    pub link_href: String,
    /// The anchor's own display text, stripped and space-joined.
    #[serde(rename = "LinkText")]
    pub link_text: String,
}

/// The full display text of one section, exactly one row per section per
/// date.
///
/// `section_text_length` is derived and must always equal the character
/// count of `section_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSectionRecord {
    /// Calendar date of the page.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Section the text was assembled from.
    #[serde(rename = "SectionId")]
    pub section_id: SectionId,
    /// Stripped text nodes joined with single spaces.
    #[serde(rename = "SectionText")]
    pub section_text: String,
    /// Character count of `section_text`.
    #[serde(rename = "SectionTextLength")]
    pub section_text_length: usize,
}

/// The per-date bundle produced by the normalizer; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDateResult {
    /// The date key this bundle was parsed from.
    pub key: DateKey,
    /// All hyperlinks discovered across the page's sections.
    pub links: Vec<LinkRecord>,
    /// One text record per discovered section.
    pub articles: Vec<ArticleSectionRecord>,
}

/// One failed date within a batch, with the error that sank it.
#[derive(Debug)]
pub struct BatchFailure {
    /// The raw date key that failed.
    pub key: String,
    /// Why it failed.
    pub error: PipelineError,
}

/// Outcome of one batch run: successes in input order plus failures.
///
/// A single bad date never aborts the batch; it lands here instead so the
/// caller can report which dates succeeded, which failed, and why.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully parsed dates, in the order their keys were supplied.
    pub results: Vec<ParsedDateResult>,
    /// Dates that failed, with their attributable errors.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of dates that parsed successfully.
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    /// Number of dates that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
