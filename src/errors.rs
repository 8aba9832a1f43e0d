use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for ingestion, configuration, and argument failures.
///
/// The aggregation engine itself never fails; only the adapters around it do.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading an input or configuration file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A CSV record could not be decoded.
    #[error("delimited-text parse failure: {0}")]
    Csv(#[from] csv::Error),
    /// A JSON export or configuration document is malformed.
    #[error("json parse failure: {0}")]
    Json(#[from] serde_json::Error),
    /// A spreadsheet workbook could not be opened or read.
    #[error("spreadsheet read failure: {0}")]
    Spreadsheet(#[from] calamine::Error),
    /// The file extension has no ingestion adapter.
    #[error("unsupported input format '{extension}' for {}", path.display())]
    UnsupportedFormat {
        /// File that was requested.
        path: PathBuf,
        /// Lower-cased extension, empty when the path has none.
        extension: String,
    },
    /// Configuration values the engine cannot use.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A date argument did not match any supported convention.
    #[error("invalid date '{0}': expected DD/MM/YYYY")]
    InvalidDate(String),
}
