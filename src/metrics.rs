use serde::{Deserialize, Serialize};

use crate::aggregate::LabelCount;
use crate::constants::charts::{OTHER_LABEL, UNKNOWN_LABEL};
use crate::types::Label;

/// One pie slice with its share of the displayed total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSlice {
    /// Source label, or `Other` for the merged tail.
    pub label: Label,
    /// Rows in the slice.
    pub count: usize,
    /// Fraction of the displayed total in `0.0..=1.0`.
    pub share: f64,
}

/// Shape a label series for a pie chart.
///
/// Blank, `Unknown` and zero-count entries are dropped. When more than
/// `max_slices` remain, entries are ranked by count (ties keep input order)
/// and everything from rank `max_slices` on is merged into one `Other` slice.
pub fn pie_slices(series: &[LabelCount], max_slices: usize) -> Vec<SourceSlice> {
    let max_slices = max_slices.max(1);
    let mut kept: Vec<(Label, usize)> = series
        .iter()
        .map(|entry| (entry.label.trim().to_string(), entry.count))
        .filter(|(label, count)| !label.is_empty() && label != UNKNOWN_LABEL && *count > 0)
        .collect();

    if kept.len() > max_slices {
        kept.sort_by(|a, b| b.1.cmp(&a.1));
        let tail: usize = kept.drain(max_slices - 1..).map(|(_, count)| count).sum();
        kept.push((OTHER_LABEL.to_string(), tail));
    }

    let total: usize = kept.iter().map(|(_, count)| count).sum();
    kept.into_iter()
        .map(|(label, count)| SourceSlice {
            label,
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect()
}
