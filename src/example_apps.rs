use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::aggregate::LabelCount;
use crate::config::ReportConfig;
use crate::dates::CanonicalDate;
use crate::fields::LogicalField;
use crate::filter::{FilterCriteria, InclusionSet};
use crate::ingestion::{distinct_labels, load_rows, retain_complete_rows, sample_rows};
use crate::report::{AppointmentReport, build_report};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "appointment_report",
    disable_help_subcommand = true,
    about = "Aggregate an appointment export by creator, source, day and store",
    long_about = "Load a CSV, JSON or spreadsheet appointment export, apply the selected filters, and print appointment counts per creator, source channel, calendar day and store.",
    after_help = "Without --input the built-in sample dataset is used. Dates are DD/MM/YYYY and both bounds are inclusive."
)]
/// CLI for `appointment_report`.
///
/// Common usage:
/// - Whole export: `--input export.csv`
/// - One channel in August: `--input export.csv --source SP4 --from 01/08/2025 --to 31/08/2025`
/// - Only two creators: `--include k_tsipasis --include s_sarellis`
struct AppointmentReportCli {
    #[arg(long, value_name = "PATH", help = "CSV, JSON or spreadsheet export to load")]
    input: Option<PathBuf>,
    #[arg(long, value_name = "SOURCE", help = "Keep only this source channel")]
    source: Option<String>,
    #[arg(long, value_name = "CREATOR", help = "Keep only this creator")]
    creator: Option<String>,
    #[arg(
        long = "include",
        value_name = "CREATOR",
        help = "Restrict every chart to these creators, repeat as needed"
    )]
    include: Vec<String>,
    #[arg(
        long = "from",
        value_name = "DD/MM/YYYY",
        value_parser = parse_date_arg,
        help = "Inclusive start date"
    )]
    from: Option<CanonicalDate>,
    #[arg(
        long = "to",
        value_name = "DD/MM/YYYY",
        value_parser = parse_date_arg,
        help = "Inclusive end date"
    )]
    to: Option<CanonicalDate>,
    #[arg(
        long = "call-center-only",
        help = "Keep only creators that look like call-center agents"
    )]
    call_center_only: bool,
    #[arg(
        long = "require-complete",
        help = "Drop rows missing a creation date or creator before filtering"
    )]
    require_complete: bool,
    #[arg(
        long = "list-choices",
        help = "Print the distinct sources and creators in the input and exit"
    )]
    list_choices: bool,
    #[arg(long, value_name = "PATH", help = "JSON file overriding engine defaults")]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    format: OutputFormat,
}

impl AppointmentReportCli {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_call_center_only(self.call_center_only)
            .with_inclusion(self.include.iter().cloned().collect::<InclusionSet>());
        if let Some(source) = &self.source {
            criteria = criteria.with_source(source.clone());
        }
        if let Some(creator) = &self.creator {
            criteria = criteria.with_creator(creator.clone());
        }
        if let Some(start) = self.from {
            criteria = criteria.with_start(start);
        }
        if let Some(end) = self.to {
            criteria = criteria.with_end(end);
        }
        criteria
    }
}

/// Run the report command, writing to stdout.
pub fn run_appointment_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_appointment_report(args_iter, &mut out)
}

/// Run the report command, writing to `out`.
pub fn write_appointment_report<I, W>(args_iter: I, out: &mut W) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    W: Write,
{
    let Some(cli) = parse_cli::<AppointmentReportCli, _>(
        std::iter::once("appointment_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };

    let mut rows = match &cli.input {
        Some(path) => load_rows(path)?,
        None => sample_rows(),
    };
    if cli.require_complete {
        rows = retain_complete_rows(rows, &config.fields);
    }

    if cli.list_choices {
        let sources = distinct_labels(&rows, &config.fields, LogicalField::Source);
        let creators = distinct_labels(&rows, &config.fields, LogicalField::Creator);
        writeln!(out, "Sources ({}):", sources.len())?;
        for source in sources {
            writeln!(out, "  {source}")?;
        }
        writeln!(out, "Creators ({}):", creators.len())?;
        for creator in creators {
            writeln!(out, "  {creator}")?;
        }
        return Ok(());
    }

    let report = build_report(&rows, &cli.criteria(), &config);
    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => print_report(out, &report, &config)?,
    }
    Ok(())
}

fn print_report<W: Write>(
    out: &mut W,
    report: &AppointmentReport,
    config: &ReportConfig,
) -> io::Result<()> {
    let diagnostics = &report.diagnostics;
    writeln!(
        out,
        "Appointments report: {} rows in, {} filtered out, {} outside the creator selection",
        diagnostics.rows_in, diagnostics.rows_filtered_out, diagnostics.aggregate.rows_gated
    )?;
    if !report.has_data() {
        writeln!(out, "No data available for the selected filter.")?;
        return Ok(());
    }

    print_label_section(out, "By creator", &report.by_creator)?;

    writeln!(out, "By source:")?;
    for slice in report.source_slices(config.max_source_slices) {
        writeln!(
            out,
            "  {:<32} {:>6}  ({:.1}%)",
            slice.label,
            slice.count,
            slice.share * 100.0
        )?;
    }

    writeln!(out, "By date:")?;
    for entry in &report.by_date {
        writeln!(out, "  {:<32} {:>6}", entry.date, entry.count)?;
    }

    print_label_section(out, "By location", &report.by_location)?;

    if diagnostics.aggregate.unparsed_date > 0 {
        writeln!(
            out,
            "Note: {} rows had a date that could not be read and are missing from the date chart.",
            diagnostics.aggregate.unparsed_date
        )?;
    }
    Ok(())
}

fn print_label_section<W: Write>(
    out: &mut W,
    title: &str,
    series: &[LabelCount],
) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    for entry in series {
        writeln!(out, "  {:<32} {:>6}", entry.label, entry.count)?;
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_date_arg(raw: &str) -> Result<CanonicalDate, String> {
    raw.parse::<CanonicalDate>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run(args: &[&str]) -> Result<String, Box<dyn Error>> {
        let mut out = Vec::new();
        write_appointment_report(args.iter().map(|arg| arg.to_string()), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn sample_report_prints_every_section() {
        let output = run(&[]).unwrap();
        assert!(output.contains("8 rows in, 0 filtered out"));
        assert!(output.contains("By creator:"));
        assert!(output.contains("By source:"));
        assert!(output.contains("SP4"));
        assert!(output.contains("87.5%"));
        assert!(output.contains("By date:"));
        assert!(output.contains("01/08/2025"));
        assert!(output.contains("By location:"));
    }

    #[test]
    fn filters_are_built_from_flags() {
        let output = run(&["--call-center-only", "--format", "json"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["by_creator"][0]["label"], "call_center_agent1");
        assert_eq!(json["by_creator"].as_array().unwrap().len(), 1);
        assert_eq!(json["by_source"][0]["label"], "OnlineOSB");

        let output = run(&["--from", "05/08/2025", "--to", "05/08/2025", "--format", "json"])
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["by_date"][0]["date"], "05/08/2025");
        assert_eq!(json["by_date"][0]["count"], 2);
        assert_eq!(json["diagnostics"]["rows_filtered_out"], 6);
    }

    #[test]
    fn include_flag_gates_all_charts() {
        let output = run(&["--include", "s_kouvari", "--format", "json"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["by_location"].as_array().unwrap().len(), 1);
        assert_eq!(json["diagnostics"]["rows_gated"], 7);
    }

    #[test]
    fn empty_result_prints_no_data_message() {
        let output = run(&["--source", "nothing"]).unwrap();
        assert!(output.contains("No data available for the selected filter."));
    }

    #[test]
    fn list_choices_prints_pickers() {
        let output = run(&["--list-choices"]).unwrap();
        assert!(output.contains("Sources (2):"));
        assert!(output.contains("  OnlineOSB"));
        assert!(output.contains("Creators (8):"));
    }

    #[test]
    fn loads_input_and_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            "Agent,Channel,Day\ndesk_1,Phone,01/02/2025\nbob,Web,\n",
        )
        .unwrap();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"fields": {"creator": ["Agent"], "source": ["Channel"], "date": ["Day"]},
                "call_center": {"substrings": ["desk"], "prefixes": []}}"#,
        )
        .unwrap();

        let output = run(&[
            "--input",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--require-complete",
            "--call-center-only",
            "--format",
            "json",
        ])
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["diagnostics"]["rows_in"], 1);
        assert_eq!(json["by_creator"][0]["label"], "desk_1");
        assert_eq!(json["by_source"][0]["label"], "Phone");
    }

    #[test]
    fn help_exits_cleanly_and_bad_dates_fail() {
        assert!(run(&["--help"]).is_ok());
        assert!(run(&["--from", "31/04/2025"]).is_err());
        assert!(run(&["--input", "export.txt"]).is_err());
    }
}
