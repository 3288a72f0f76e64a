//! Extraction for the current page layout.
//!
//! Current-era pages tag each section with an id-marked `<tr>` whose nested
//! `table.container` holds the section content, so extraction is five direct
//! lookups with no positional ambiguity.

use crate::errors::{PipelineError, Result};
use crate::models::{DateKey, Section, SectionId, SectionMap};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("table.container").unwrap());

// One attribute selector per section id; ids like "1" are not valid CSS
// id selectors, so `tr[id="1"]` form is required.
static SECTION_ROWS: Lazy<Vec<(SectionId, Selector)>> = Lazy::new(|| {
    SectionId::ALL
        .iter()
        .map(|id| {
            let selector = Selector::parse(&format!(r#"tr[id="{}"]"#, id.as_str())).unwrap();
            (*id, selector)
        })
        .collect()
});

/// Extract all five sections from a current-layout document.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedDocument`] naming `key` and the section
/// id if an id-marked row is missing or carries no content container.
pub fn extract<'a>(doc: &'a Html, key: &DateKey) -> Result<SectionMap<'a>> {
    let mut sections: SectionMap<'a> = Vec::with_capacity(SectionId::ALL.len());

    for (id, row_selector) in SECTION_ROWS.iter() {
        let row = doc.select(row_selector).next().ok_or_else(|| {
            PipelineError::MalformedDocument {
                key: key.to_string(),
                section: id.to_string(),
                reason: "no row carries this section id".to_string(),
            }
        })?;
        let node = row.select(&CONTAINER).next().ok_or_else(|| {
            PipelineError::MalformedDocument {
                key: key.to_string(),
                section: id.to_string(),
                reason: "section row has no content container".to_string(),
            }
        })?;
        sections.push((
            *id,
            Section {
                node,
                is_story: id.is_story(),
            },
        ));
    }

    Ok(sections)
}
