//! Output generation for the two produced tables.
//!
//! The aggregated link and article tables are delivered as flat files for
//! the downstream storage and dashboard consumers:
//!
//! - [`csv`]: one CSV file per table, column headers matching the record
//!   field contract exactly
//! - [`json`]: a single JSON document bundling both tables and the batch
//!   failure list
//!
//! # Output Structure
//!
//! ```text
//! out_dir/
//! ├── link_data.csv
//! ├── article_section_data.csv
//! └── batch.json
//! ```

pub mod csv;
pub mod json;
