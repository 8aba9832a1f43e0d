use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::fields::{
    CREATOR_PATTERNS, DATE_PATTERNS, LOCATION_PATTERNS, SOURCE_PATTERNS,
};
use crate::errors::ReportError;
use crate::row::{CellValue, Row};
use crate::types::{FieldPattern, Label};
use crate::utils::{compact_lowercase, contains_either};

/// Semantic field independent of how a particular export spells its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    /// User who created the appointment.
    Creator,
    /// Booking channel.
    Source,
    /// Store or branch.
    Location,
    /// Creation date.
    Date,
}

impl LogicalField {
    /// Every logical field in a stable order.
    pub const ALL: [LogicalField; 4] = [
        LogicalField::Creator,
        LogicalField::Source,
        LogicalField::Location,
        LogicalField::Date,
    ];

    /// Lower-case field name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Creator => "creator",
            LogicalField::Source => "source",
            LogicalField::Location => "location",
            LogicalField::Date => "date",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header candidates for each logical field.
///
/// Matching is deliberately loose: a pattern and a header match when, after
/// stripping whitespace and lower-casing both, either contains the other.
/// Patterns are tried in order and, per pattern, headers in row order; the
/// first hit wins even when its cell is blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPatterns {
    /// Creator header candidates.
    pub creator: Vec<FieldPattern>,
    /// Source header candidates.
    pub source: Vec<FieldPattern>,
    /// Location header candidates.
    pub location: Vec<FieldPattern>,
    /// Date header candidates.
    pub date: Vec<FieldPattern>,
}

impl Default for FieldPatterns {
    fn default() -> Self {
        Self {
            creator: owned(CREATOR_PATTERNS),
            source: owned(SOURCE_PATTERNS),
            location: owned(LOCATION_PATTERNS),
            date: owned(DATE_PATTERNS),
        }
    }
}

fn owned(patterns: &[&str]) -> Vec<FieldPattern> {
    patterns.iter().map(|pattern| pattern.to_string()).collect()
}

impl FieldPatterns {
    /// Candidate list for `field`.
    pub fn patterns(&self, field: LogicalField) -> &[FieldPattern] {
        match field {
            LogicalField::Creator => &self.creator,
            LogicalField::Source => &self.source,
            LogicalField::Location => &self.location,
            LogicalField::Date => &self.date,
        }
    }

    /// Replace the candidate list for `field`.
    pub fn with_patterns<I, S>(mut self, field: LogicalField, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldPattern>,
    {
        let patterns = patterns.into_iter().map(Into::into).collect();
        match field {
            LogicalField::Creator => self.creator = patterns,
            LogicalField::Source => self.source = patterns,
            LogicalField::Location => self.location = patterns,
            LogicalField::Date => self.date = patterns,
        }
        self
    }

    /// Reject candidate lists that could never match anything.
    pub fn validate(&self) -> Result<(), ReportError> {
        for field in LogicalField::ALL {
            let usable = self
                .patterns(field)
                .iter()
                .any(|pattern| !compact_lowercase(pattern).is_empty());
            if !usable {
                return Err(ReportError::Configuration(format!(
                    "no usable header patterns for field '{field}'"
                )));
            }
        }
        Ok(())
    }

    /// Header and cell matched for `field`, if any.
    pub fn matching_cell<'r>(
        &self,
        row: &'r Row,
        field: LogicalField,
    ) -> Option<(&'r str, &'r CellValue)> {
        for pattern in self.patterns(field) {
            let pattern = compact_lowercase(pattern);
            if pattern.is_empty() {
                continue;
            }
            for (column, value) in row.iter() {
                let key = compact_lowercase(column);
                // A blank header would otherwise be contained in every pattern.
                if !key.is_empty() && contains_either(&key, &pattern) {
                    return Some((column, value));
                }
            }
        }
        None
    }

    /// Value of `field` in `row`, trimmed if textual; `Empty` when unmatched.
    pub fn resolve(&self, row: &Row, field: LogicalField) -> CellValue {
        self.matching_cell(row, field)
            .map(|(_, value)| value.trimmed())
            .unwrap_or_default()
    }

    /// Value of `field` rendered as a label, `None` when unmatched or blank.
    pub fn resolve_label(&self, row: &Row, field: LogicalField) -> Option<Label> {
        self.matching_cell(row, field)
            .and_then(|(_, value)| value.as_label())
    }
}
