//! Command-line interface definitions for the Column data pipeline.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::{Parser, ValueEnum};

/// Which table files to write after a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// CSV files only.
    Csv,
    /// Batch JSON only.
    Json,
    /// Both CSV files and batch JSON.
    Both,
}

/// Command-line arguments for the Column data pipeline.
///
/// # Examples
///
/// ```sh
/// # Fetch three dates and write CSV tables
/// column_data_pipeline 10272021 10292021 11052021 -o ./data
///
/// # Read keys from a file, one per line, and write both formats
/// column_data_pipeline --dates-file dates.txt -o ./data --format both
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Date keys in MMDDYYYY form (e.g. 10272021)
    #[arg(required_unless_present = "dates_file")]
    pub dates: Vec<String>,

    /// File with one MMDDYYYY date key per line
    #[arg(long)]
    pub dates_file: Option<String>,

    /// Output directory for the table files
    #[arg(short, long, default_value = "./data")]
    pub out_dir: String,

    /// Endpoint prefix the daily pages are fetched from
    #[arg(long, default_value = crate::fetch::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum in-flight fetches
    #[arg(long, default_value_t = crate::fetch::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = crate::fetch::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Which table files to write
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}
