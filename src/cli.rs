use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::io_utils::is_dash;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize daily drilling reports into one canonical well status table",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert one or more unit reports into the canonical table
    Convert(ConvertArgs),
    /// List the built-in unit profiles or export one as YAML
    Profiles(ProfilesArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Unit profile name (see `profiles`)
    #[arg(short = 'u', long = "unit", required_unless_present = "profile_file")]
    pub unit: Option<String>,
    /// Input report files (xlsx/xls/xlsb/ods workbooks or text memos)
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Output file or directory (stdout for csv/json if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format (inferred from the output extension when omitted)
    #[arg(long = "format")]
    pub format: Option<ExportFormat>,
    /// Report date as YYYY-MM-DD; overrides labels and file names
    #[arg(long = "report-date", value_parser = parse_report_date)]
    pub report_date: Option<NaiveDate>,
    /// YAML unit profile used instead of the built-in one
    #[arg(long = "profile-file")]
    pub profile_file: Option<PathBuf>,
    /// Character encoding of text inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the rows as a tab-separated clipboard block on stdout
    #[arg(long = "clipboard")]
    pub clipboard: bool,
    /// Render the rows as an aligned table on stdout
    #[arg(long = "preview")]
    pub preview: bool,
    /// Also write the extracted fields, before mapping, to this file or directory
    #[arg(long = "raw")]
    pub raw: Option<PathBuf>,
}

impl ConvertArgs {
    /// Explicit format, else the output extension, else xlsx for files and
    /// csv for stdout.
    pub fn resolved_format(&self) -> ExportFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self.output.as_deref() {
            Some(path) => ExportFormat::from_extension(path).unwrap_or(ExportFormat::Xlsx),
            None => ExportFormat::Csv,
        }
    }

    /// Format of the `--raw` output: its extension, csv for `-`, else xlsx.
    pub fn raw_format(&self) -> Option<ExportFormat> {
        let path = self.raw.as_deref()?;
        if is_dash(path) {
            return Some(ExportFormat::Csv);
        }
        Some(ExportFormat::from_extension(path).unwrap_or(ExportFormat::Xlsx))
    }

    /// Whether a table should be written at all; clipboard or preview runs
    /// without `-o`/`--format` only print.
    pub fn writes_table(&self) -> bool {
        self.output.is_some() || self.format.is_some() || !(self.clipboard || self.preview)
    }
}

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    /// Built-in unit to dump as YAML
    #[arg(long = "export")]
    pub export: Option<String>,
    /// Destination for the exported YAML (stdout if omitted)
    #[arg(short = 'o', long = "output", requires = "export")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xlsx") {
            Some(ExportFormat::Xlsx)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(ExportFormat::Csv)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(ExportFormat::Json)
        } else {
            None
        }
    }
}

pub fn parse_report_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Report date '{value}' must be formatted as YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(args: &[&str]) -> ConvertArgs {
        let mut argv = vec!["ddr-normalize", "convert"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Convert(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn format_follows_output_extension() {
        assert_eq!(
            convert(&["-u", "zone-7", "-i", "a.txt", "-o", "out.JSON"]).resolved_format(),
            ExportFormat::Json
        );
        assert_eq!(
            convert(&["-u", "zone-7", "-i", "a.txt", "-o", "out"]).resolved_format(),
            ExportFormat::Xlsx
        );
        assert_eq!(
            convert(&["-u", "zone-7", "-i", "a.txt"]).resolved_format(),
            ExportFormat::Csv
        );
    }

    #[test]
    fn clipboard_only_run_skips_table_output() {
        let args = convert(&["-u", "zone-7", "-i", "a.txt", "--clipboard"]);
        assert!(!args.writes_table());
        let args = convert(&["-u", "zone-7", "-i", "a.txt", "--clipboard", "--format", "json"]);
        assert!(args.writes_table());
    }

    #[test]
    fn raw_format_follows_its_own_path() {
        let args = convert(&["-u", "zone-7", "-i", "a.txt"]);
        assert_eq!(args.raw_format(), None);
        let args = convert(&["-u", "zone-7", "-i", "a.txt", "--raw", "raw.json"]);
        assert_eq!(args.raw_format(), Some(ExportFormat::Json));
        let args = convert(&["-u", "zone-7", "-i", "a.txt", "--raw", "export-raw"]);
        assert_eq!(args.raw_format(), Some(ExportFormat::Xlsx));
        let args = convert(&["-u", "zone-7", "-i", "a.txt", "--raw", "-"]);
        assert_eq!(args.raw_format(), Some(ExportFormat::Csv));
    }

    #[test]
    fn several_inputs_are_collected() {
        let args = convert(&["-u", "zone-9", "-i", "a.txt", "-i", "b.txt"]);
        assert_eq!(args.inputs.len(), 2);
    }

    #[test]
    fn report_date_must_be_iso() {
        assert_eq!(
            parse_report_date("2026-01-19"),
            Ok(NaiveDate::from_ymd_opt(2026, 1, 19).unwrap())
        );
        assert!(parse_report_date("19/01/2026").is_err());
    }
}
