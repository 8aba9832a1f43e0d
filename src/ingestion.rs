//! Adapters that turn exported files into the row set the engine consumes.
//!
//! Adapters are the only fallible layer: a file that cannot be read or parsed
//! is reported here and never reaches the filter or the aggregator.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::ingestion::{EMPTY_HEADER, UTF8_BOM, WORKBOOK_EXTENSIONS};
use crate::errors::ReportError;
use crate::fields::{FieldPatterns, LogicalField};
use crate::row::{CellValue, Row};
use crate::types::{ColumnName, Label};

/// Read delimited text whose first record holds the column names.
///
/// Blank lines and records with only blank fields are skipped, short and long
/// records are tolerated, and empty fields become `CellValue::Empty`.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Row>, ReportError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let raw_headers: Vec<CellValue> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let header = if idx == 0 {
                header.trim_start_matches(UTF8_BOM)
            } else {
                header
            };
            text_cell(header)
        })
        .collect();
    let headers = header_names(&raw_headers);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            skipped += 1;
            continue;
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), text_cell(field)))
            .collect();
        rows.push(row);
    }

    debug!(
        rows = rows.len(),
        columns = headers.len(),
        skipped,
        "[appointments:ingest] parsed delimited text"
    );
    Ok(rows)
}

/// Convert a spreadsheet cell grid whose first row holds the column names.
///
/// Blank header cells are named `__EMPTY`, `__EMPTY_1`, ...; repeated headers
/// get `_1`, `_2` suffixes. Empty cells are left out of a row and rows with
/// no cells at all are skipped. Numeric cells (serial dates) stay numeric.
pub fn rows_from_grid<G, R>(grid: G) -> Vec<Row>
where
    G: IntoIterator<Item = R>,
    R: IntoIterator<Item = CellValue>,
{
    let mut lines = grid
        .into_iter()
        .map(|line| line.into_iter().collect::<Vec<_>>());
    let Some(mut header_cells) = lines.next() else {
        return Vec::new();
    };
    let body: Vec<Vec<CellValue>> = lines.collect();

    let width = body
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(header_cells.len());
    header_cells.resize(width, CellValue::Empty);
    let headers = header_names(&header_cells);

    let rows: Vec<Row> = body
        .into_iter()
        .map(|line| {
            headers
                .iter()
                .zip(line)
                .filter(|(_, cell)| !matches!(cell, CellValue::Empty))
                .map(|(header, cell)| (header.clone(), cell))
                .collect::<Row>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    debug!(
        rows = rows.len(),
        columns = headers.len(),
        "[appointments:ingest] converted cell grid"
    );
    rows
}

/// Parse a JSON array of flat objects (one object per row, keys in order).
pub fn rows_from_json(raw: &str) -> Result<Vec<Row>, ReportError> {
    let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_str(raw)?;
    Ok(objects
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(key, value)| (key, json_cell(value)))
                .collect()
        })
        .collect())
}

/// Read the first worksheet of a spreadsheet workbook.
///
/// Cells go through `rows_from_grid`, so header naming matches any other
/// grid. Numeric and date-time cells stay numeric and reach the date
/// normalizer as serial days.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Vec<Row>, ReportError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        warn!(
            path = %path.display(),
            "[appointments:ingest] workbook has no worksheets"
        );
        return Ok(Vec::new());
    };
    let range = range?;
    Ok(rows_from_grid(
        range
            .rows()
            .map(|line| line.iter().map(workbook_cell).collect::<Vec<_>>()),
    ))
}

/// Load rows from a delimited-text, JSON or workbook file, chosen by extension.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<Row>, ReportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => read_csv(File::open(path)?)?,
        "json" => rows_from_json(&fs::read_to_string(path)?)?,
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook(path)?,
        _ => {
            return Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        }
    };

    info!(
        "[appointments:ingest] loaded {} rows from {}",
        rows.len(),
        path.display()
    );
    Ok(rows)
}

/// Keep only rows that resolve both a creation date and a creator.
///
/// Optional upload-time check; the engine itself accepts incomplete rows.
pub fn retain_complete_rows(rows: Vec<Row>, fields: &FieldPatterns) -> Vec<Row> {
    let before = rows.len();
    let kept: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            fields.resolve_label(row, LogicalField::Date).is_some()
                && fields.resolve_label(row, LogicalField::Creator).is_some()
        })
        .collect();
    if kept.len() < before {
        info!(
            "[appointments:ingest] dropped {} rows missing a date or creator",
            before - kept.len()
        );
    }
    kept
}

/// Distinct resolved values of `field` in first-seen order.
///
/// Feeds the source and creator pickers.
pub fn distinct_labels(rows: &[Row], fields: &FieldPatterns, field: LogicalField) -> Vec<Label> {
    rows.iter()
        .filter_map(|row| fields.resolve_label(row, field))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Small built-in dataset used when no file is supplied.
pub fn sample_rows() -> Vec<Row> {
    const SAMPLE: [(&str, &str, &str, &str); 8] = [
        ("k_tsipasis", "ΒΟΤΑΝΙΚΟΣ-ΣΤΡΥΜΟΝΟΣ 2 MOTO", "01/08/2025", "SP4"),
        ("s_sarellis", "ΒΟΛΟΣ ΒΟΛΟΣ- Λ.ΔΙΟΜ/ΝΙΚΗ ΖΩΝΗ", "01/08/2025", "SP4"),
        ("l_lianakis", "ΜΑΡΟΥΣΙ - ΚΗΦΙΣΙΑΣ 55 & ΑΜΑΡ. ΑΡΤΕΜΙΔΟΣ 1", "02/08/2025", "SP4"),
        ("e_davradi", "ΓΛΥΚΑ ΝΕΡΑ- Λ.ΛΑΥΡΙΟΥ 81", "03/08/2025", "SP4"),
        ("s_stamopoulos", "ΓΛΥΚΑ ΝΕΡΑ- Λ.ΛΑΥΡΙΟΥ 81", "04/08/2025", "SP4"),
        ("m_tsirigaki", "ΠΕΡΙΣΤΕΡΙ - Λ. ΚΗΦΙΣΟΥ 36", "05/08/2025", "SP4"),
        ("s_kouvari", "ΜΑΡΟΥΣΙ - ΚΗΦΙΣΙΑΣ 55 & ΑΜΑΡ. ΑΡΤΕΜΙΔΟΣ 1", "05/08/2025", "SP4"),
        ("call_center_agent1", "ΒΟΤΑΝΙΚΟΣ-ΣΤΡΥΜΟΝΟΣ 2 MOTO", "06/08/2025", "OnlineOSB"),
    ];
    SAMPLE
        .iter()
        .map(|(creator, store, date, source)| {
            Row::new()
                .with("Χρήστης δημιουργίας", *creator)
                .with("Υποκατάστημα", *store)
                .with("Ημερομηνία δημιουργίας", *date)
                .with("Source Type", *source)
        })
        .collect()
}

fn text_cell(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(field.to_string())
    }
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text_cell(text),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::DateTime(serial) => CellValue::Number(serial.as_f64()),
        Data::Bool(flag) => CellValue::Text(flag.to_string()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn json_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(text) => text_cell(&text),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        other => CellValue::Text(other.to_string()),
    }
}

/// Unique, non-blank column names for a header line.
fn header_names(cells: &[CellValue]) -> Vec<ColumnName> {
    let mut taken: HashSet<ColumnName> = HashSet::new();
    cells
        .iter()
        .map(|cell| {
            let base = match cell {
                CellValue::Text(text) if !text.trim().is_empty() => text.clone(),
                CellValue::Number(_) => cell.as_label().unwrap_or_else(|| EMPTY_HEADER.to_string()),
                _ => EMPTY_HEADER.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while taken.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|value| text_cell(value)).collect()
    }

    #[test]
    fn csv_uses_first_record_as_header_and_skips_blank_records() {
        let data = "\u{feff}User,Source Type,Date\n\
                    alice,SP4,01/08/2025\n\
                    \n\
                    ,,\n\
                    bob,,02/08/2025\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["User", "Source Type", "Date"]);
        assert_eq!(rows[0].get("User"), Some(&CellValue::from("alice")));
        assert_eq!(rows[1].get("Source Type"), Some(&CellValue::Empty));
    }

    #[test]
    fn csv_tolerates_ragged_records_and_quoted_fields() {
        let data = "User,Store,Date\n\"k, t\",Athens\nbob,Volos,03/08/2025,extra\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("User"), Some(&CellValue::from("k, t")));
        assert_eq!(rows[0].get("Date"), None);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn grid_names_blank_and_duplicate_headers() {
        let grid = vec![
            cells(&["User", "", "User", ""]),
            vec![
                CellValue::from("a"),
                CellValue::from("x"),
                CellValue::from("b"),
                CellValue::Empty,
                CellValue::Number(45_658.0),
            ],
            vec![CellValue::Empty, CellValue::Empty],
            vec![CellValue::from("c")],
        ];
        let rows = rows_from_grid(grid);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].columns().collect::<Vec<_>>(),
            vec!["User", "__EMPTY", "User_1", "__EMPTY_2"]
        );
        assert_eq!(rows[0].get("__EMPTY_2"), Some(&CellValue::Number(45_658.0)));
        assert_eq!(rows[1].columns().collect::<Vec<_>>(), vec!["User"]);
    }

    #[test]
    fn grid_without_rows_is_empty() {
        assert!(rows_from_grid(Vec::<Vec<CellValue>>::new()).is_empty());
        assert!(rows_from_grid(vec![cells(&["User"])]).is_empty());
    }

    #[test]
    fn json_rows_keep_key_order_and_scalar_kinds() {
        let raw = r#"[
            {"Source Type": "SP4", "User": "a", "Date": 45658, "Flag": true, "Note": null},
            {"User": ""}
        ]"#;
        let rows = rows_from_json(raw).unwrap();
        assert_eq!(
            rows[0].columns().collect::<Vec<_>>(),
            vec!["Source Type", "User", "Date", "Flag", "Note"]
        );
        assert_eq!(rows[0].get("Date"), Some(&CellValue::Number(45_658.0)));
        assert_eq!(rows[0].get("Flag"), Some(&CellValue::from("true")));
        assert_eq!(rows[0].get("Note"), Some(&CellValue::Empty));
        assert_eq!(rows[1].get("User"), Some(&CellValue::Empty));

        assert!(matches!(rows_from_json("{\"User\": 1}"), Err(ReportError::Json(_))));
    }

    #[test]
    fn load_rows_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("export.CSV");
        fs::write(&csv_path, "User,Date\na,01/01/2025\n").unwrap();
        assert_eq!(load_rows(&csv_path).unwrap().len(), 1);

        let json_path = dir.path().join("export.json");
        fs::write(&json_path, r#"[{"User": "a"}, {"User": "b"}]"#).unwrap();
        assert_eq!(load_rows(&json_path).unwrap().len(), 2);

        let parquet_path = dir.path().join("export.parquet");
        fs::write(&parquet_path, b"PAR1").unwrap();
        let err = load_rows(&parquet_path).unwrap_err();
        assert!(matches!(
            err,
            ReportError::UnsupportedFormat { extension, .. } if extension == "parquet"
        ));

        let broken_xlsx = dir.path().join("export.xlsx");
        fs::write(&broken_xlsx, b"PK").unwrap();
        assert!(matches!(
            load_rows(&broken_xlsx),
            Err(ReportError::Spreadsheet(_))
        ));

        let missing = load_rows(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(missing, ReportError::Io(_)));
    }

    #[test]
    fn workbook_first_sheet_becomes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "User").unwrap();
        sheet.write_string(0, 2, "Date").unwrap();
        sheet.write_string(1, 0, "a").unwrap();
        sheet.write_string(1, 1, "x").unwrap();
        sheet.write_number(1, 2, 45_658.0).unwrap();
        sheet.write_string(2, 0, "b").unwrap();
        sheet.write_string(2, 2, "02/01/2025").unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_workbook(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].columns().collect::<Vec<_>>(),
            vec!["User", "__EMPTY", "Date"]
        );
        assert_eq!(rows[0].get("Date"), Some(&CellValue::Number(45_658.0)));
        assert_eq!(rows[1].get("Date"), Some(&CellValue::from("02/01/2025")));
        assert_eq!(rows[1].get("__EMPTY"), None);
    }

    #[test]
    fn workbook_cells_keep_serials_numeric() {
        assert_eq!(workbook_cell(&Data::Int(45_658)), CellValue::Number(45_658.0));
        assert_eq!(workbook_cell(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(workbook_cell(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(workbook_cell(&Data::Bool(true)), CellValue::from("true"));
        assert_eq!(workbook_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn retain_complete_rows_requires_date_and_creator() {
        let rows = vec![
            Row::new().with("User", "a").with("Date", "01/01/2025"),
            Row::new().with("User", "b"),
            Row::new().with("Date", 45_658.0).with("creator", "c"),
            Row::new().with("User", " ").with("Date", "01/01/2025"),
        ];
        let kept = retain_complete_rows(rows, &FieldPatterns::default());
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn distinct_labels_keep_first_seen_order() {
        let rows = sample_rows();
        let fields = FieldPatterns::default();
        assert_eq!(
            distinct_labels(&rows, &fields, LogicalField::Source),
            vec!["SP4".to_string(), "OnlineOSB".to_string()]
        );
        assert_eq!(distinct_labels(&rows, &fields, LogicalField::Creator).len(), 8);
        assert_eq!(distinct_labels(&rows, &fields, LogicalField::Location).len(), 5);
    }
}
