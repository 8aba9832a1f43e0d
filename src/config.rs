use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::charts::MAX_SOURCE_SLICES;
use crate::errors::ReportError;
use crate::fields::FieldPatterns;
use crate::filter::CallCenterMatcher;

/// Top-level engine configuration.
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides, e.g. `{"call_center": {"substrings": ["agent"]}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Header candidates used by the field resolver.
    pub fields: FieldPatterns,
    /// Creator heuristic applied by the call-center-only filter.
    pub call_center: CallCenterMatcher,
    /// Pie slices kept before the source long tail is merged into "Other".
    pub max_source_slices: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fields: FieldPatterns::default(),
            call_center: CallCenterMatcher::default(),
            max_source_slices: MAX_SOURCE_SLICES,
        }
    }
}

impl ReportConfig {
    /// Override header candidates.
    pub fn with_fields(mut self, fields: FieldPatterns) -> Self {
        self.fields = fields;
        self
    }

    /// Override the call-center heuristic.
    pub fn with_call_center(mut self, call_center: CallCenterMatcher) -> Self {
        self.call_center = call_center;
        self
    }

    /// Override the pie slice limit.
    pub fn with_max_source_slices(mut self, max_source_slices: usize) -> Self {
        self.max_source_slices = max_source_slices;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ReportError> {
        let config: ReportConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.max_source_slices == 0 {
            return Err(ReportError::Configuration(
                "max_source_slices must be at least 1".to_string(),
            ));
        }
        self.fields.validate()
    }
}
