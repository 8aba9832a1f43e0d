use std::borrow::Borrow;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::dates::{CanonicalDate, normalize};
use crate::fields::{FieldPatterns, LogicalField};
use crate::filter::InclusionSet;
use crate::row::Row;
use crate::types::Label;

/// One bar/slice of a label dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Trimmed resolved value.
    pub label: Label,
    /// Rows carrying that value.
    pub count: usize,
}

/// One point of the time dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    /// Calendar day, serialized as `DD/MM/YYYY`.
    pub date: CanonicalDate,
    /// Rows created on that day.
    pub count: usize,
}

/// Counters describing what the aggregator skipped and why.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDiagnostics {
    /// Rows handed to the aggregator.
    pub rows_considered: usize,
    /// Rows skipped in every dimension by the inclusion set.
    pub rows_gated: usize,
    /// Counted rows without a creator.
    pub missing_creator: usize,
    /// Counted rows without a source.
    pub missing_source: usize,
    /// Counted rows without a location.
    pub missing_location: usize,
    /// Counted rows without any date cell.
    pub missing_date: usize,
    /// Counted rows whose date cell could not be normalized.
    pub unparsed_date: usize,
}

/// The four chart series produced by one aggregation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    /// Appointments per creator, first-seen order.
    pub by_creator: Vec<LabelCount>,
    /// Appointments per source channel, first-seen order.
    pub by_source: Vec<LabelCount>,
    /// Appointments per day, chronological order.
    pub by_date: Vec<DateCount>,
    /// Appointments per store, first-seen order.
    pub by_location: Vec<LabelCount>,
    /// What was skipped along the way.
    pub diagnostics: AggregateDiagnostics,
}

impl AggregateSeries {
    /// False when every series is empty.
    pub fn has_data(&self) -> bool {
        !(self.by_creator.is_empty()
            && self.by_source.is_empty()
            && self.by_date.is_empty()
            && self.by_location.is_empty())
    }
}

#[derive(Default)]
struct Buckets {
    creator: IndexMap<Label, usize>,
    source: IndexMap<Label, usize>,
    location: IndexMap<Label, usize>,
    date: BTreeMap<CanonicalDate, usize>,
}

fn bump<K: std::hash::Hash + Eq>(bucket: &mut IndexMap<K, usize>, key: K) {
    *bucket.entry(key).or_insert(0) += 1;
}

fn into_series(bucket: IndexMap<Label, usize>) -> Vec<LabelCount> {
    bucket
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

/// Group-counts rows along creator, source, date and location.
#[derive(Clone, Copy, Debug)]
pub struct Aggregator<'a> {
    fields: &'a FieldPatterns,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator using the resolver settings in `config`.
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            fields: &config.fields,
        }
    }

    /// Count every row into its dimensions.
    ///
    /// Dimensions are independent: a row without a date still counts toward
    /// its creator, source and location. A non-empty `inclusion` set drops a
    /// row from all four dimensions when its creator is present and not
    /// listed.
    pub fn aggregate<R>(&self, rows: &[R], inclusion: &InclusionSet) -> AggregateSeries
    where
        R: Borrow<Row>,
    {
        let mut buckets = Buckets::default();
        let mut diagnostics = AggregateDiagnostics::default();

        for row in rows {
            let row = row.borrow();
            diagnostics.rows_considered += 1;

            let creator = self.fields.resolve_label(row, LogicalField::Creator);
            if !inclusion.admits(creator.as_deref()) {
                diagnostics.rows_gated += 1;
                continue;
            }

            match creator {
                Some(creator) => bump(&mut buckets.creator, creator),
                None => diagnostics.missing_creator += 1,
            }
            match self.fields.resolve_label(row, LogicalField::Source) {
                Some(source) => bump(&mut buckets.source, source),
                None => diagnostics.missing_source += 1,
            }
            match self.fields.resolve_label(row, LogicalField::Location) {
                Some(location) => bump(&mut buckets.location, location),
                None => diagnostics.missing_location += 1,
            }

            let raw_date = self.fields.resolve(row, LogicalField::Date);
            if raw_date.is_empty() {
                diagnostics.missing_date += 1;
            } else if let Some(date) = normalize(&raw_date) {
                *buckets.date.entry(date).or_insert(0) += 1;
            } else {
                diagnostics.unparsed_date += 1;
            }
        }

        AggregateSeries {
            by_creator: into_series(buckets.creator),
            by_source: into_series(buckets.source),
            by_date: buckets
                .date
                .into_iter()
                .map(|(date, count)| DateCount { date, count })
                .collect(),
            by_location: into_series(buckets.location),
            diagnostics,
        }
    }
}

/// Aggregate with the default configuration.
pub fn aggregate<R: Borrow<Row>>(rows: &[R], inclusion: &InclusionSet) -> AggregateSeries {
    Aggregator::new(&ReportConfig::default()).aggregate(rows, inclusion)
}
