#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Group-counting of filtered rows into chart series.
pub mod aggregate;
/// Engine configuration and JSON loading.
pub mod config;
/// Centralized constants used across the normalizer, resolver and charts.
pub mod constants;
/// Date normalization into one canonical day.
pub mod dates;
/// Reusable example runners shared by the demo binaries.
pub mod example_apps;
/// Logical field resolution over heterogeneous headers.
pub mod fields;
/// Row filtering and the creator inclusion set.
pub mod filter;
/// CSV, JSON, workbook and cell-grid adapters.
pub mod ingestion;
/// Display shaping for chart series.
pub mod metrics;
/// End-to-end report construction.
pub mod report;
/// Untyped rows and cell values.
pub mod row;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use aggregate::{
    AggregateDiagnostics, AggregateSeries, Aggregator, DateCount, LabelCount, aggregate,
};
pub use config::ReportConfig;
pub use dates::{CanonicalDate, normalize};
pub use errors::ReportError;
pub use fields::{FieldPatterns, LogicalField};
pub use filter::{CallCenterMatcher, FilterCriteria, InclusionSet, RecordFilter, filter_rows};
pub use ingestion::{
    distinct_labels, load_rows, read_csv, read_workbook, retain_complete_rows, rows_from_grid,
    rows_from_json, sample_rows,
};
pub use metrics::{SourceSlice, pie_slices};
pub use report::{AppointmentReport, ReportDiagnostics, build_report};
pub use row::{CellValue, Row};
pub use types::{ColumnName, CreatorName, FieldPattern, Label, MatchToken, SourceName};
