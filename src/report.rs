use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{AggregateDiagnostics, Aggregator, DateCount, LabelCount};
use crate::config::ReportConfig;
use crate::filter::{FilterCriteria, RecordFilter};
use crate::metrics::{SourceSlice, pie_slices};
use crate::row::Row;

/// Row accounting for one report, returned next to the series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDiagnostics {
    /// Rows supplied by the caller.
    pub rows_in: usize,
    /// Rows removed by the record filter.
    pub rows_filtered_out: usize,
    /// Aggregation-stage counters.
    #[serde(flatten)]
    pub aggregate: AggregateDiagnostics,
}

/// Chart-ready output of one report request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentReport {
    /// Appointments per creator, first-seen order.
    pub by_creator: Vec<LabelCount>,
    /// Appointments per source channel, first-seen order.
    pub by_source: Vec<LabelCount>,
    /// Appointments per day, chronological order.
    pub by_date: Vec<DateCount>,
    /// Appointments per store, first-seen order.
    pub by_location: Vec<LabelCount>,
    /// Row accounting.
    pub diagnostics: ReportDiagnostics,
}

impl AppointmentReport {
    /// False when all four series are empty ("no data for this filter").
    pub fn has_data(&self) -> bool {
        !(self.by_creator.is_empty()
            && self.by_source.is_empty()
            && self.by_date.is_empty()
            && self.by_location.is_empty())
    }

    /// Source series shaped for a pie chart.
    pub fn source_slices(&self, max_slices: usize) -> Vec<SourceSlice> {
        pie_slices(&self.by_source, max_slices)
    }

    /// Total appointments counted in the creator dimension.
    pub fn total_by_creator(&self) -> usize {
        self.by_creator.iter().map(|entry| entry.count).sum()
    }
}

/// Filter `rows` with `criteria`, then aggregate what remains.
///
/// Pure: identical inputs always yield an identical report.
pub fn build_report(
    rows: &[Row],
    criteria: &FilterCriteria,
    config: &ReportConfig,
) -> AppointmentReport {
    let kept = RecordFilter::new(config).apply(rows, criteria);
    let series = Aggregator::new(config).aggregate(&kept, &criteria.inclusion);

    let diagnostics = ReportDiagnostics {
        rows_in: rows.len(),
        rows_filtered_out: rows.len() - kept.len(),
        aggregate: series.diagnostics,
    };
    debug!(
        rows_in = diagnostics.rows_in,
        rows_filtered_out = diagnostics.rows_filtered_out,
        rows_gated = diagnostics.aggregate.rows_gated,
        unparsed_dates = diagnostics.aggregate.unparsed_date,
        "[appointments:report] aggregated {} creators, {} sources, {} days, {} locations",
        series.by_creator.len(),
        series.by_source.len(),
        series.by_date.len(),
        series.by_location.len()
    );

    AppointmentReport {
        by_creator: series.by_creator,
        by_source: series.by_source,
        by_date: series.by_date,
        by_location: series.by_location,
        diagnostics,
    }
}
