use appointments::{
    AppointmentReport, CellValue, FilterCriteria, InclusionSet, ReportConfig, Row, build_report,
    rows_from_grid, sample_rows,
};

/// A spreadsheet export with English headers, a blank header cell and serial dates.
fn spreadsheet_rows() -> Vec<Row> {
    let grid = vec![
        vec![
            CellValue::from("Created By"),
            CellValue::from("Source"),
            CellValue::from("Start Date"),
            CellValue::from("Store"),
            CellValue::Empty,
        ],
        vec![
            CellValue::from("callcenter_maria"),
            CellValue::from("Phone"),
            CellValue::Number(45_870.0),
            CellValue::from("ΒΟΛΟΣ ΒΟΛΟΣ- Λ.ΔΙΟΜ/ΝΙΚΗ ΖΩΝΗ"),
            CellValue::from("note"),
        ],
        vec![
            CellValue::from("k_tsipasis"),
            CellValue::from("SP4"),
            CellValue::from("2025-08-01T10:30:00"),
            CellValue::from("ΒΟΤΑΝΙΚΟΣ-ΣΤΡΥΜΟΝΟΣ 2 MOTO"),
        ],
        vec![
            CellValue::from("s_kouvari"),
            CellValue::from("SP4"),
            CellValue::from("06.08.2025"),
            CellValue::Empty,
        ],
    ];
    rows_from_grid(grid)
}

fn print_report(title: &str, report: &AppointmentReport) {
    println!("=== {title} ===");
    if !report.has_data() {
        println!("  no data for this filter");
        return;
    }
    println!("  creators:");
    for entry in &report.by_creator {
        println!("    {:<24} {}", entry.label, entry.count);
    }
    println!("  sources:");
    for slice in report.source_slices(7) {
        println!("    {:<24} {} ({:.0}%)", slice.label, slice.count, slice.share * 100.0);
    }
    println!("  days:");
    for entry in &report.by_date {
        println!("    {:<24} {}", entry.date, entry.count);
    }
    println!("  stores:");
    for entry in &report.by_location {
        println!("    {:<24} {}", entry.label, entry.count);
    }
    println!(
        "  rows in {} / filtered out {} / gated {} / unreadable dates {}",
        report.diagnostics.rows_in,
        report.diagnostics.rows_filtered_out,
        report.diagnostics.aggregate.rows_gated,
        report.diagnostics.aggregate.unparsed_date
    );
}

fn main() {
    let config = ReportConfig::default();
    let mut rows = sample_rows();
    rows.extend(spreadsheet_rows());

    print_report(
        "all appointments",
        &build_report(&rows, &FilterCriteria::new(), &config),
    );

    print_report(
        "source SP4",
        &build_report(&rows, &FilterCriteria::new().with_source("SP4"), &config),
    );

    print_report(
        "call center only",
        &build_report(
            &rows,
            &FilterCriteria::new().with_call_center_only(true),
            &config,
        ),
    );

    let inclusion = InclusionSet::new()
        .toggled("k_tsipasis")
        .toggled("s_kouvari");
    print_report(
        "k_tsipasis + s_kouvari",
        &build_report(&rows, &FilterCriteria::new().with_inclusion(inclusion), &config),
    );
}
