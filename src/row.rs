use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{ColumnName, Label};

/// A single scalar cell as produced by an ingestion adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// Free text, untrimmed as exported.
    Text(String),
    /// Numeric cell (spreadsheet serial dates arrive this way).
    Number(f64),
    /// Missing or blank cell.
    #[default]
    Empty,
}

impl CellValue {
    /// True for `Empty` and for text that is blank after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(_) => false,
            CellValue::Empty => true,
        }
    }

    /// Copy of this value with surrounding whitespace removed from text.
    pub fn trimmed(&self) -> CellValue {
        match self {
            CellValue::Text(text) => CellValue::Text(text.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Render the value as an aggregation label, or `None` when blank.
    ///
    /// Numbers use their shortest decimal form (`5`, `5.5`).
    pub fn as_label(&self) -> Option<Label> {
        match self {
            CellValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(value) if value.is_finite() => Some(value.to_string()),
            CellValue::Number(_) | CellValue::Empty => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// One input record: column names in export order mapped to scalar cells.
///
/// Rows are built once by ingestion and only read afterwards; the engine
/// borrows them and never hands out mutable access.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<ColumnName, CellValue>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append (or replace) a cell while building the row.
    pub fn with(mut self, column: impl Into<ColumnName>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Exact-name lookup.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Column names in export order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Cells in export order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row carries no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<ColumnName>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_preserves_insertion_order() {
        let row = Row::new()
            .with("zeta", "1")
            .with("alpha", "2")
            .with("mid", 3.0);
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.get("mid"), Some(&CellValue::Number(3.0)));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn labels_trim_text_and_render_numbers() {
        assert_eq!(CellValue::from("  SP4 ").as_label().as_deref(), Some("SP4"));
        assert_eq!(CellValue::from("   ").as_label(), None);
        assert_eq!(CellValue::Empty.as_label(), None);
        assert_eq!(CellValue::Number(5.0).as_label().as_deref(), Some("5"));
        assert_eq!(CellValue::Number(5.5).as_label().as_deref(), Some("5.5"));
        assert_eq!(CellValue::Number(f64::NAN).as_label(), None);
    }

    #[test]
    fn emptiness_covers_blank_text() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::from(" \t").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::from("x").is_empty());
        assert_eq!(CellValue::from(None::<&str>), CellValue::Empty);
    }

    #[test]
    fn row_serializes_as_plain_object() {
        let row: Row = [("User", CellValue::from("a")), ("Serial", CellValue::Number(45.0))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"User":"a","Serial":45.0}"#);
    }
}
