//! Error types for the ingestion pipeline.
//!
//! Every failure in the pipeline is attributable to a specific date key so a
//! batch run can report which dates succeeded and which failed. The three
//! kinds mirror the three ways a daily page goes wrong:
//!
//! - [`PipelineError::Fetch`]: the page could not be retrieved (non-2xx
//!   status, network failure, or timeout)
//! - [`PipelineError::MalformedDocument`]: the page was retrieved but its
//!   structure violates the layout assumptions the extractor depends on
//! - [`PipelineError::ParseDate`]: a date key or an embedded document date
//!   is not a valid calendar date

use thiserror::Error;

/// Convenience alias used throughout the pipeline modules.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure while fetching, extracting, or normalizing one daily page.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The page for `key` failed to be retrieved.
    #[error("page for {key} failed to be retrieved: {status}")]
    Fetch {
        /// The date key whose fetch failed.
        key: String,
        /// Status detail: HTTP status line or transport error text.
        status: String,
    },

    /// A structural assumption about the page layout was violated.
    #[error("malformed document for {key} (section {section}): {reason}")]
    MalformedDocument {
        /// The date key of the offending document.
        key: String,
        /// The section id being processed, or `"document"` for page-level
        /// failures such as too few story blocks.
        section: String,
        /// What was expected and what was found.
        reason: String,
    },

    /// A date string failed to parse as a real calendar date.
    #[error("'{input}' does not parse as a calendar date")]
    ParseDate {
        /// The offending input string.
        input: String,
    },
}
