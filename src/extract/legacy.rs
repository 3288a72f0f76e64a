//! Positional extraction for the legacy page layout.
//!
//! Legacy pages carry no section id markers, so sections are recovered from
//! the flat sequence of `table.container` blocks in document order. A block
//! qualifies as a story only while stories are still being sought and only
//! if it contains exactly four `<tr>` rows, the structural signature that
//! separates story layout from masthead, advert, and footer blocks.
//!
//! Once the three stories are found, the page's own embedded date decides
//! whether scanning continues: pages dated before the cutover
//! (2020-12-28) end there, while later pages assign the next two blocks,
//! whatever their row counts, to the extra sections.

use crate::errors::{PipelineError, Result};
use crate::extract::FORMAT_CUTOVER;
use crate::models::{DateKey, Section, SectionId, SectionMap};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("table.container").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

// Embedded dates render as "July 20, 2020", sometimes with a leading
// weekday; match just the month-day-year core.
static DOC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]+ \d{1,2}, \d{4})").unwrap());

// Story blocks always render as exactly four rows.
const STORY_ROW_COUNT: usize = 4;

/// Extract sections positionally from a legacy-layout document.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedDocument`] if fewer than three story
/// blocks qualify, and [`PipelineError::ParseDate`] or
/// [`PipelineError::MalformedDocument`] if the page's embedded date is
/// missing or unreadable.
pub fn extract<'a>(doc: &'a Html, key: &DateKey) -> Result<SectionMap<'a>> {
    let mut sections: SectionMap<'a> = Vec::with_capacity(SectionId::ALL.len());
    let mut searching_extras = false;

    for block in doc.select(&CONTAINER) {
        if sections.len() == SectionId::ALL.len() {
            break;
        }

        if searching_extras {
            let id = SectionId::ALL[sections.len()];
            sections.push((
                id,
                Section {
                    node: block,
                    is_story: false,
                },
            ));
            continue;
        }

        let rows = block.select(&ROW).count();
        if rows != STORY_ROW_COUNT {
            continue;
        }

        let id = SectionId::ALL[sections.len()];
        sections.push((
            id,
            Section {
                node: block,
                is_story: true,
            },
        ));

        if sections.len() == SectionId::STORY_COUNT {
            // The page's own date decides whether extras exist at all.
            let page_date = document_date(doc, key)?;
            if page_date >= *FORMAT_CUTOVER {
                searching_extras = true;
            } else {
                debug!(key = %key, %page_date, "Pre-cutover page, no extra sections");
                break;
            }
        }
    }

    if sections.len() < SectionId::STORY_COUNT {
        return Err(PipelineError::MalformedDocument {
            key: key.to_string(),
            section: "document".to_string(),
            reason: format!(
                "found {} story blocks with {} rows, expected {}",
                sections.len(),
                STORY_ROW_COUNT,
                SectionId::STORY_COUNT
            ),
        });
    }

    Ok(sections)
}

/// Read the page's own date from its leading paragraph.
fn document_date(doc: &Html, key: &DateKey) -> Result<NaiveDate> {
    let paragraph = doc.select(&PARAGRAPH).next().ok_or_else(|| {
        PipelineError::MalformedDocument {
            key: key.to_string(),
            section: "document".to_string(),
            reason: "no leading date paragraph".to_string(),
        }
    })?;

    let text = paragraph.text().collect::<Vec<_>>().join(" ");
    let matched = DOC_DATE_RE
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| PipelineError::ParseDate {
            input: text.trim().to_string(),
        })?;

    NaiveDate::parse_from_str(matched.as_str(), "%B %d, %Y").map_err(|_| {
        PipelineError::ParseDate {
            input: matched.as_str().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{LEGACY_POST_CUTOVER_PAGE, LEGACY_PRE_CUTOVER_PAGE};

    #[test]
    fn test_pre_cutover_page_yields_exactly_three_stories() {
        let doc = Html::parse_document(LEGACY_PRE_CUTOVER_PAGE);
        let key = DateKey::parse("07202020").unwrap();
        let sections = extract(&doc, &key).unwrap();

        assert_eq!(sections.len(), 3);
        let ids: Vec<&str> = sections.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(sections.iter().all(|(_, s)| s.is_story));
    }

    #[test]
    fn test_pre_cutover_page_ignores_four_row_footer() {
        // The trailing footer block also has four rows; it must not be
        // assigned once the three stories are found.
        let doc = Html::parse_document(LEGACY_PRE_CUTOVER_PAGE);
        let key = DateKey::parse("07202020").unwrap();
        let sections = extract(&doc, &key).unwrap();
        assert!(!sections.iter().any(|(id, _)| !id.is_story()));
    }

    #[test]
    fn test_post_cutover_page_yields_five_sections_in_order() {
        let doc = Html::parse_document(LEGACY_POST_CUTOVER_PAGE);
        let key = DateKey::parse("01152021").unwrap();
        let sections = extract(&doc, &key).unwrap();

        let ids: Vec<&str> = sections.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "headlines", "MOTD"]);
        let flags: Vec<bool> = sections.iter().map(|(_, s)| s.is_story).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_extras_ignore_row_count_signature() {
        // The headlines block has 5 rows and the MOTD block 2; both must be
        // taken as extras regardless.
        let doc = Html::parse_document(LEGACY_POST_CUTOVER_PAGE);
        let key = DateKey::parse("01152021").unwrap();
        let sections = extract(&doc, &key).unwrap();

        let headlines = &sections[3].1;
        let motd = &sections[4].1;
        assert_eq!(headlines.node.select(&ROW).count(), 5);
        assert_eq!(motd.node.select(&ROW).count(), 2);
    }

    #[test]
    fn test_scanning_stops_at_five_sections() {
        // The trailing footer block after MOTD must not displace anything.
        let doc = Html::parse_document(LEGACY_POST_CUTOVER_PAGE);
        let key = DateKey::parse("01152021").unwrap();
        let sections = extract(&doc, &key).unwrap();
        assert_eq!(sections.len(), 5);
        let motd_text = sections[4].1.node.text().collect::<String>();
        assert!(motd_text.contains("Message of the day"));
    }

    #[test]
    fn test_sparse_page_is_malformed() {
        let html = r#"<html><body>
            <p>July 20, 2020</p>
            <table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>
            <table class="container">
              <tr><td>only</td></tr><tr><td>two rows</td></tr>
            </table>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let key = DateKey::parse("07202020").unwrap();
        let err = extract(&doc, &key).unwrap_err();
        match err {
            PipelineError::MalformedDocument { key, reason, .. } => {
                assert_eq!(key, "07202020");
                assert!(reason.contains("found 1 story blocks"));
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_date_paragraph_is_malformed() {
        // Three qualifying stories but nothing to read the page date from.
        let story = r#"<table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>"#;
        let html = format!("<html><body>{story}{story}{story}</body></html>");
        let doc = Html::parse_document(&html);
        let key = DateKey::parse("07202020").unwrap();
        let err = extract(&doc, &key).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDocument { .. }));
    }

    #[test]
    fn test_unreadable_date_text_is_parse_date_error() {
        let story = r#"<table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>"#;
        let html = format!("<html><body><p>no date here</p>{story}{story}{story}</body></html>");
        let doc = Html::parse_document(&html);
        let key = DateKey::parse("07202020").unwrap();
        let err = extract(&doc, &key).unwrap_err();
        assert!(matches!(err, PipelineError::ParseDate { .. }));
    }

    #[test]
    fn test_weekday_prefixed_date_parses() {
        let doc = Html::parse_document(LEGACY_PRE_CUTOVER_PAGE);
        let key = DateKey::parse("07202020").unwrap();
        let date = document_date(&doc, &key).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 7, 20).unwrap());
    }

    #[test]
    fn test_cutover_boundary_date_includes_extras() {
        // A page dated exactly on the cutover keeps searching for extras.
        let html = r#"<html><body>
            <p>December 28, 2020</p>
            <table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>
            <table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>
            <table class="container">
              <tr><td>a</td></tr><tr><td>b</td></tr>
              <tr><td>c</td></tr><tr><td>d</td></tr>
            </table>
            <table class="container">
              <tr><td>headlines</td></tr>
            </table>
            <table class="container">
              <tr><td>motd</td></tr>
            </table>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let key = DateKey::parse("12282020").unwrap();
        let sections = extract(&doc, &key).unwrap();
        assert_eq!(sections.len(), 5);
    }
}
