//! Section content normalizer: sections in, flat table rows out.
//!
//! For each located section this module extracts the hyperlink list and the
//! display text, branching on the section kind:
//!
//! - **Story sections** end with a title row followed by a body row; links
//!   are taken from the body row only, and the display text is the stripped
//!   text of the title row then the body row.
//! - **Plain sections** (headlines, message of the day) contribute links
//!   and text from the whole block.
//!
//! Normalization is a pure function of its inputs: running it twice over
//! the same section map yields identical record collections.

use crate::errors::{PipelineError, Result};
use crate::models::{
    ArticleSectionRecord, DateKey, LinkRecord, ParsedDateResult, SectionMap,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Normalize one date's section map into link and article records.
///
/// Every emitted record carries the parsed calendar date for `key`, not the
/// raw key string. Exactly one [`ArticleSectionRecord`] is emitted per
/// section, plus one [`LinkRecord`] per hyperlink discovered.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedDocument`] naming `key` and the section
/// id if a story section has fewer than the two rows its title/body split
/// requires.
pub fn normalize(key: &DateKey, sections: &SectionMap<'_>) -> Result<ParsedDateResult> {
    let date = key.date();
    let mut links = Vec::new();
    let mut articles = Vec::new();

    for (id, section) in sections {
        let (anchors, section_text) = if section.is_story {
            let rows: Vec<ElementRef<'_>> = section.node.select(&ROW).collect();
            if rows.len() < 2 {
                return Err(PipelineError::MalformedDocument {
                    key: key.to_string(),
                    section: id.to_string(),
                    reason: format!(
                        "story section has {} rows, need a title row and a body row",
                        rows.len()
                    ),
                });
            }
            let title_row = rows[rows.len() - 2];
            let body_row = rows[rows.len() - 1];
            let anchors: Vec<ElementRef<'_>> = body_row.select(&ANCHOR).collect();
            (anchors, joined_text(&[title_row, body_row]))
        } else {
            let anchors: Vec<ElementRef<'_>> = section.node.select(&ANCHOR).collect();
            (anchors, joined_text(&[section.node]))
        };

        for anchor in anchors {
            links.push(LinkRecord {
                date,
                section_id: *id,
                link_href: anchor
                    .value()
                    .attr("href")
                    .unwrap_or_default()
                    .to_string(),
                link_text: joined_text(&[anchor]),
            });
        }

        let section_text_length = section_text.chars().count();
        articles.push(ArticleSectionRecord {
            date,
            section_id: *id,
            section_text,
            section_text_length,
        });
    }

    Ok(ParsedDateResult {
        key: key.clone(),
        links,
        articles,
    })
}

/// Stripped text nodes of the given elements, joined with single spaces.
fn joined_text(nodes: &[ElementRef<'_>]) -> String {
    nodes
        .iter()
        .flat_map(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{CURRENT_PAGE, LEGACY_POST_CUTOVER_PAGE};
    use crate::extract;
    use crate::models::{Section, SectionId};
    use scraper::Html;

    fn parse_current() -> (DateKey, Html) {
        (
            DateKey::parse("10272021").unwrap(),
            Html::parse_document(CURRENT_PAGE),
        )
    }

    #[test]
    fn test_one_article_record_per_section() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();
        assert_eq!(result.articles.len(), 5);
        let ids: Vec<SectionId> = result.articles.iter().map(|a| a.section_id).collect();
        assert_eq!(ids, SectionId::ALL.to_vec());
    }

    #[test]
    fn test_length_invariant_holds_for_every_record() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();
        for article in &result.articles {
            assert_eq!(
                article.section_text_length,
                article.section_text.chars().count(),
                "length mismatch for section {}",
                article.section_id
            );
        }
    }

    #[test]
    fn test_story_links_come_from_body_row_only() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();

        let story1_hrefs: Vec<&str> = result
            .links
            .iter()
            .filter(|l| l.section_id == SectionId::Story1)
            .map(|l| l.link_href.as_str())
            .collect();
        // The sponsor link lives in an earlier row and must be excluded.
        assert_eq!(
            story1_hrefs,
            vec!["https://news.example/court", "https://news.example/court-2"]
        );
    }

    #[test]
    fn test_story_text_is_title_then_body() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();

        let story1 = &result.articles[0];
        assert!(story1.section_text.starts_with("Court weighs landmark case"));
        assert!(story1.section_text.contains("Arguments opened Monday."));
        // Earlier rows (masthead, sponsor) contribute nothing.
        assert!(!story1.section_text.contains("THE COLUMN"));
        assert!(!story1.section_text.contains("Presented by"));
    }

    #[test]
    fn test_plain_section_takes_links_from_whole_block() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();

        let headline_links: Vec<&str> = result
            .links
            .iter()
            .filter(|l| l.section_id == SectionId::Headlines)
            .map(|l| l.link_text.as_str())
            .collect();
        assert_eq!(
            headline_links,
            vec!["Vote scheduled for Thursday", "Launch delayed again"]
        );
    }

    #[test]
    fn test_records_carry_parsed_date() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();
        assert!(result.links.iter().all(|l| l.date == key.date()));
        assert!(result.articles.iter().all(|a| a.date == key.date()));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let (key, doc) = parse_current();
        let sections = extract::extract(&doc, &key).unwrap();
        let first = normalize(&key, &sections).unwrap();
        let second = normalize(&key, &sections).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_legacy_sections_normalize_too() {
        let key = DateKey::parse("01152021").unwrap();
        let doc = Html::parse_document(LEGACY_POST_CUTOVER_PAGE);
        let sections = extract::extract(&doc, &key).unwrap();
        let result = normalize(&key, &sections).unwrap();

        assert_eq!(result.articles.len(), 5);
        let headlines = result
            .links
            .iter()
            .filter(|l| l.section_id == SectionId::Headlines)
            .count();
        assert_eq!(headlines, 4);
    }

    #[test]
    fn test_single_row_story_section_is_malformed() {
        let html = r#"<html><body>
            <table class="container"><tr><td>just one row</td></tr></table>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let container = Selector::parse("table.container").unwrap();
        let node = doc.select(&container).next().unwrap();

        let key = DateKey::parse("07202020").unwrap();
        let sections: SectionMap<'_> = vec![(
            SectionId::Story1,
            Section {
                node,
                is_story: true,
            },
        )];
        let err = normalize(&key, &sections).unwrap_err();
        match err {
            PipelineError::MalformedDocument { key, section, reason } => {
                assert_eq!(key, "07202020");
                assert_eq!(section, "1");
                assert!(reason.contains("1 rows"));
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_anchor_without_href_yields_empty_href() {
        let html = r#"<html><body>
            <table class="container">
              <tr><td><a name="top">Anchor only</a></td></tr>
            </table>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let container = Selector::parse("table.container").unwrap();
        let node = doc.select(&container).next().unwrap();

        let key = DateKey::parse("01152021").unwrap();
        let sections: SectionMap<'_> = vec![(
            SectionId::Motd,
            Section {
                node,
                is_story: false,
            },
        )];
        let result = normalize(&key, &sections).unwrap();
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.links[0].link_href, "");
        assert_eq!(result.links[0].link_text, "Anchor only");
    }
}
