use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::constants::call_center::{PREFIXES, SUBSTRINGS};
use crate::dates::{CanonicalDate, normalize};
use crate::fields::LogicalField;
use crate::row::Row;
use crate::types::{CreatorName, MatchToken, SourceName};

/// Name-based heuristic that flags creators belonging to a call center.
///
/// The creator is lower-cased and checked for any configured substring or
/// prefix. False positives and negatives are expected; the token lists are
/// specific to one organization's naming and are meant to be overridden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallCenterMatcher {
    /// Substrings matched anywhere in the creator.
    pub substrings: Vec<MatchToken>,
    /// Prefixes matched at the start of the creator.
    pub prefixes: Vec<MatchToken>,
}

impl Default for CallCenterMatcher {
    fn default() -> Self {
        Self::new(SUBSTRINGS.iter().copied(), PREFIXES.iter().copied())
    }
}

impl CallCenterMatcher {
    /// Build a matcher from explicit token lists.
    pub fn new<S, P>(
        substrings: impl IntoIterator<Item = S>,
        prefixes: impl IntoIterator<Item = P>,
    ) -> Self
    where
        S: Into<MatchToken>,
        P: Into<MatchToken>,
    {
        Self {
            substrings: substrings.into_iter().map(Into::into).collect(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `creator` looks like a call-center agent.
    pub fn matches(&self, creator: &str) -> bool {
        let creator = creator.to_lowercase();
        if creator.is_empty() {
            return false;
        }
        self.substrings
            .iter()
            .filter(|token| !token.is_empty())
            .any(|token| creator.contains(&token.to_lowercase()))
            || self
                .prefixes
                .iter()
                .filter(|token| !token.is_empty())
                .any(|token| creator.starts_with(&token.to_lowercase()))
    }
}

/// Allow-list of creators that gates every aggregation dimension.
///
/// An empty set admits everyone. Updates return a new set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InclusionSet {
    creators: BTreeSet<CreatorName>,
}

impl InclusionSet {
    /// Empty set (admits every creator).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `creator` if absent, remove it if present.
    pub fn toggled(mut self, creator: impl Into<CreatorName>) -> Self {
        let creator = creator.into();
        if !self.creators.remove(&creator) {
            self.creators.insert(creator);
        }
        self
    }

    /// Add every creator in `creators`.
    pub fn with_all<I, S>(mut self, creators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CreatorName>,
    {
        self.creators.extend(creators.into_iter().map(Into::into));
        self
    }

    /// Drop every creator, which re-admits everyone.
    pub fn cleared(self) -> Self {
        Self::new()
    }

    /// Exact membership test.
    pub fn contains(&self, creator: &str) -> bool {
        self.creators.contains(creator)
    }

    /// True when no creator has been selected.
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    /// Number of selected creators.
    pub fn len(&self) -> usize {
        self.creators.len()
    }

    /// Selected creators in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.creators.iter().map(String::as_str)
    }

    /// Whether a row with this creator passes the gate.
    ///
    /// Rows without a creator always pass.
    pub fn admits(&self, creator: Option<&str>) -> bool {
        match creator {
            Some(creator) if !creator.is_empty() && !self.is_empty() => self.contains(creator),
            _ => true,
        }
    }
}

impl<S: Into<CreatorName>> FromIterator<S> for InclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new().with_all(iter)
    }
}

/// User-selected predicates for one report request.
///
/// Built fresh per request and passed by reference; nothing in the engine
/// mutates it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Exact source channel to keep.
    pub source: Option<SourceName>,
    /// Exact creator to keep.
    pub creator: Option<CreatorName>,
    /// Creator allow-list applied by the aggregator.
    pub inclusion: InclusionSet,
    /// Inclusive lower date bound.
    pub start: Option<CanonicalDate>,
    /// Inclusive upper date bound.
    pub end: Option<CanonicalDate>,
    /// Keep only creators matched by the call-center heuristic.
    pub call_center_only: bool,
}

impl FilterCriteria {
    /// Criteria that keep every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose source equals `source`.
    pub fn with_source(mut self, source: impl Into<SourceName>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Keep rows whose creator equals `creator`.
    pub fn with_creator(mut self, creator: impl Into<CreatorName>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Gate aggregation on this creator allow-list.
    pub fn with_inclusion(mut self, inclusion: InclusionSet) -> Self {
        self.inclusion = inclusion;
        self
    }

    /// Keep rows dated on or after `start`.
    pub fn with_start(mut self, start: CanonicalDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Keep rows dated on or before `end`.
    pub fn with_end(mut self, end: CanonicalDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Keep rows in the inclusive `[start, end]` range.
    pub fn with_date_range(self, start: CanonicalDate, end: CanonicalDate) -> Self {
        self.with_start(start).with_end(end)
    }

    /// Keep only call-center creators.
    pub fn with_call_center_only(mut self, call_center_only: bool) -> Self {
        self.call_center_only = call_center_only;
        self
    }

    /// True when either date bound is set.
    pub fn has_date_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Inclusive bound check; `None` dates fail whenever a bound is set.
    pub fn date_in_range(&self, date: Option<CanonicalDate>) -> bool {
        if !self.has_date_bounds() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Applies `FilterCriteria` to a row set using one configuration.
#[derive(Clone, Copy, Debug)]
pub struct RecordFilter<'a> {
    config: &'a ReportConfig,
}

impl<'a> RecordFilter<'a> {
    /// Create a filter bound to `config`.
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Order-preserving subsequence of `rows` that pass every set predicate.
    pub fn apply<'r>(&self, rows: &'r [Row], criteria: &FilterCriteria) -> Vec<&'r Row> {
        rows.iter()
            .filter(|row| self.accepts(row, criteria))
            .collect()
    }

    /// Whether a single row passes every set predicate.
    pub fn accepts(&self, row: &Row, criteria: &FilterCriteria) -> bool {
        let fields = &self.config.fields;

        if let Some(source) = criteria.source.as_deref() {
            if fields.resolve_label(row, LogicalField::Source).as_deref() != Some(source) {
                return false;
            }
        }

        let creator = fields.resolve_label(row, LogicalField::Creator);
        if let Some(wanted) = criteria.creator.as_deref() {
            if creator.as_deref() != Some(wanted) {
                return false;
            }
        }

        if criteria.has_date_bounds() {
            let date = normalize(&fields.resolve(row, LogicalField::Date));
            if !criteria.date_in_range(date) {
                return false;
            }
        }

        if criteria.call_center_only {
            let is_agent = creator
                .as_deref()
                .is_some_and(|creator| self.config.call_center.matches(creator));
            if !is_agent {
                return false;
            }
        }

        true
    }
}

/// Filter with the default configuration.
pub fn filter_rows<'r>(rows: &'r [Row], criteria: &FilterCriteria) -> Vec<&'r Row> {
    RecordFilter::new(&ReportConfig::default()).apply(rows, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> CanonicalDate {
        raw.parse().unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new()
                .with("User", "a")
                .with("Source", "S1")
                .with("Date", "01/01/2025"),
            Row::new()
                .with("User", "call_center_agent1")
                .with("Source", "S1")
                .with("Date", "02/01/2025 09:15"),
            Row::new()
                .with("User", "b")
                .with("Source", "S2 ")
                .with("Date", "not a date"),
            Row::new().with("User", "cc_desk").with("Source", "s1"),
        ]
    }

    fn creators(kept: &[&Row]) -> Vec<String> {
        let fields = crate::fields::FieldPatterns::default();
        kept.iter()
            .filter_map(|row| fields.resolve_label(row, LogicalField::Creator))
            .collect()
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let rows = rows();
        let kept = filter_rows(&rows, &FilterCriteria::new());
        assert_eq!(kept.len(), 4);
        assert_eq!(
            creators(&kept),
            vec!["a", "call_center_agent1", "b", "cc_desk"]
        );
    }

    #[test]
    fn source_equality_is_exact_and_case_sensitive() {
        let rows = rows();
        let kept = filter_rows(&rows, &FilterCriteria::new().with_source("S1"));
        assert_eq!(creators(&kept), vec!["a", "call_center_agent1"]);

        let trimmed = filter_rows(&rows, &FilterCriteria::new().with_source("S2"));
        assert_eq!(creators(&trimmed), vec!["b"]);
    }

    #[test]
    fn creator_equality_is_exact() {
        let rows = rows();
        let kept = filter_rows(&rows, &FilterCriteria::new().with_creator("b"));
        assert_eq!(creators(&kept), vec!["b"]);
        assert!(filter_rows(&rows, &FilterCriteria::new().with_creator("B")).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive_and_drop_undated_rows() {
        let rows = rows();
        let day_two = date("02/01/2025");
        let kept = filter_rows(
            &rows,
            &FilterCriteria::new().with_date_range(day_two, day_two),
        );
        assert_eq!(creators(&kept), vec!["call_center_agent1"]);

        let from_day_one = filter_rows(&rows, &FilterCriteria::new().with_start(date("01/01/2025")));
        assert_eq!(creators(&from_day_one), vec!["a", "call_center_agent1"]);

        let until_day_one = filter_rows(&rows, &FilterCriteria::new().with_end(date("01/01/2025")));
        assert_eq!(creators(&until_day_one), vec!["a"]);
    }

    #[test]
    fn call_center_heuristic_uses_configured_tokens() {
        let rows = rows();
        let kept = filter_rows(&rows, &FilterCriteria::new().with_call_center_only(true));
        assert_eq!(creators(&kept), vec!["call_center_agent1", "cc_desk"]);

        let config = ReportConfig::default()
            .with_call_center(CallCenterMatcher::new(["agent"], Vec::<String>::new()));
        let custom = RecordFilter::new(&config)
            .apply(&rows, &FilterCriteria::new().with_call_center_only(true));
        assert_eq!(creators(&custom), vec!["call_center_agent1"]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let rows = rows();
        let criteria = FilterCriteria::new()
            .with_source("S1")
            .with_call_center_only(true)
            .with_start(date("01/01/2025"));
        assert_eq!(creators(&filter_rows(&rows, &criteria)), vec!["call_center_agent1"]);
    }

    #[test]
    fn default_matcher_covers_known_spellings() {
        let matcher = CallCenterMatcher::default();
        assert!(matcher.matches("Call Center Athens"));
        assert!(matcher.matches("callcenter02"));
        assert!(matcher.matches("ccmaria"));
        assert!(matcher.matches("Κέντρο Εξυπηρέτησης"));
        assert!(matcher.matches("kentro_1"));
        assert!(!matcher.matches("k_tsipasis"));
        assert!(!matcher.matches("acc"));
        assert!(!matcher.matches(""));
    }

    #[test]
    fn inclusion_set_toggles_and_gates() {
        let set = InclusionSet::new();
        assert!(set.admits(Some("anyone")));

        let set = set.toggled("a").toggled("b").toggled("b");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a"]);
        assert!(set.admits(Some("a")));
        assert!(!set.admits(Some("b")));
        assert!(set.admits(None));
        assert!(set.admits(Some("")));

        let all = set.with_all(["c", "d"]);
        assert_eq!(all.len(), 3);
        assert!(all.cleared().is_empty());
    }
}
