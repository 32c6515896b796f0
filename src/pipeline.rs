//! The `parse` entry point: report-date resolution, input dispatch and
//! structural error detection.

use std::path::Path;

use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};
use regex::Regex;

use crate::{
    assemble::assemble,
    data::{Value, canonicalize_date},
    error::{ParseError, ParseResult},
    extract::{FieldExtractor, ParsedFields, RawTable, row_fields},
    mapper::SchemaMapper,
    profile::{InputLayout, ReportDateRule, UnitProfile},
    schema::CanonicalTable,
    segment::{TextRules, header_names, segment_rows, segment_text},
    sheet::{Workbook, check_columns, select_sheet},
};

/// Lines searched for an in-document report date label.
const DATE_LABEL_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Text { origin: String, text: String },
    Workbook(Workbook),
}

impl Document {
    pub fn text(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Document::Text {
            origin: origin.into(),
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &str {
        match self {
            Document::Text { origin, .. } => origin,
            Document::Workbook(workbook) => &workbook.origin,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Document::Text { .. } => "text",
            Document::Workbook(_) => "spreadsheet",
        }
    }
}

fn invalid_profile(profile: &UnitProfile, what: &str, err: regex::Error) -> ParseError {
    ParseError::InvalidProfile {
        unit: profile.name.clone(),
        reason: format!("{what}: {err}"),
    }
}

/// Report date found in a `Label: date` line near the top of a text document.
fn date_from_label(text: &str, label: &str) -> Result<Option<NaiveDate>, regex::Error> {
    let pattern = Regex::new(&format!(r"(?i){}\s*:\s*(.+)", regex::escape(label)))?;
    Ok(text
        .lines()
        .take(DATE_LABEL_LINES)
        .find_map(|line| pattern.captures(line))
        .and_then(|caps| canonicalize_date(caps.get(1).map_or("", |m| m.as_str()))))
}

fn date_from_filename(origin: &str, pattern: &str) -> Result<Option<NaiveDate>, regex::Error> {
    let regex = Regex::new(pattern)?;
    let name = Path::new(origin)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| origin.to_string());
    Ok(regex
        .captures(&name)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
        .and_then(|m| canonicalize_date(m.as_str())))
}

/// Document-level report date: explicit argument, then an in-document
/// label, then the file-name convention.
pub fn resolve_report_date(
    document: &Document,
    profile: &UnitProfile,
    explicit: Option<NaiveDate>,
) -> ParseResult<Option<NaiveDate>> {
    if let Some(date) = explicit {
        return Ok(Some(date));
    }
    let rule: &ReportDateRule = &profile.report_date;
    if let (Some(label), Document::Text { text, .. }) = (&rule.label, document) {
        let found = date_from_label(text, label)
            .map_err(|e| invalid_profile(profile, "report date label", e))?;
        if let Some(date) = found {
            debug!("Report date {date} from '{label}' label");
            return Ok(Some(date));
        }
    }
    if let Some(pattern) = &rule.filename {
        let found = date_from_filename(document.origin(), pattern)
            .map_err(|e| invalid_profile(profile, "report date file name pattern", e))?;
        if let Some(date) = found {
            debug!("Report date {date} from file name");
            return Ok(Some(date));
        }
    }
    Ok(None)
}

fn missing_date(document: &Document, profile: &UnitProfile) -> ParseError {
    let mut sources = vec!["--report-date".to_string()];
    if let Some(label) = &profile.report_date.label {
        sources.push(format!("a '{label}:' line"));
    }
    if let Some(pattern) = &profile.report_date.filename {
        sources.push(format!("a file name matching '{pattern}'"));
    }
    if let Some(field) = &profile.report_date.field {
        sources.push(format!("the '{field}' column"));
    }
    ParseError::ReportDate {
        origin: document.origin().to_string(),
        reason: format!("provide one of: {}", sources.join(", ")),
    }
}

/// Both views of one parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// Extracted fields in document order, before mapping.
    pub raw: RawTable,
    pub table: CanonicalTable,
}

/// Parses one document with one unit profile into a canonical table.
pub fn parse(
    document: &Document,
    profile: &UnitProfile,
    report_date: Option<NaiveDate>,
) -> ParseResult<CanonicalTable> {
    parse_document(document, profile, report_date).map(|parsed| parsed.table)
}

/// Like [`parse`], but also keeps the extracted fields.
pub fn parse_document(
    document: &Document,
    profile: &UnitProfile,
    report_date: Option<NaiveDate>,
) -> ParseResult<Parsed> {
    let origin = document.origin().to_string();
    let document_date = resolve_report_date(document, profile, report_date)?;
    let per_row = profile.report_date.field.as_deref();
    if document_date.is_none() && per_row.is_none() {
        return Err(missing_date(document, profile));
    }

    let (columns, records): (Vec<String>, Vec<ParsedFields>) = match (&profile.input, document) {
        (InputLayout::Text(layout), Document::Text { text, .. }) => {
            let rules = TextRules::compile(layout)
                .map_err(|e| invalid_profile(profile, "text patterns", e))?;
            let title = text.lines().map(str::trim).find(|l| !l.is_empty());
            let extractor = FieldExtractor::new(layout, title);
            let records = segment_text(text, &rules)
                .map(|record| extractor.extract(&record))
                .collect();
            (extractor.known_fields(), records)
        }
        (InputLayout::Sheet(layout), Document::Workbook(workbook)) => {
            let (sheet, grid) = select_sheet(workbook, &layout.sheet, document_date)?;
            check_columns(&origin, grid, layout)?;
            debug!("Reading sheet '{sheet}' with header row {}", layout.header_row);
            let columns = header_names(grid, layout.header_row)
                .into_iter()
                .filter(|name| !name.is_empty())
                .unique()
                .collect();
            let records = segment_rows(grid, layout)
                .map(|record| row_fields(&record))
                .collect();
            (columns, records)
        }
        (input, _) => {
            return Err(ParseError::WrongInput {
                origin,
                unit: profile.name.clone(),
                expected: match input {
                    InputLayout::Text(_) => "text",
                    InputLayout::Sheet(_) => "spreadsheet",
                },
                found: document.kind(),
            });
        }
    };

    if records.is_empty() {
        return Err(ParseError::NoRecords { origin });
    }
    info!("Found {} well record(s) in {origin}", records.len());

    let dates = row_dates(&records, document_date, per_row)
        .ok_or_else(|| missing_date(document, profile))?;

    let mapper = SchemaMapper::new(profile)?;
    let rows = records
        .iter()
        .zip(dates)
        .filter_map(|(fields, date)| mapper.map(fields, date))
        .collect();
    let table = assemble(rows, &profile.partitions);
    info!("Normalized {} row(s) for unit {}", table.len(), profile.name);
    Ok(Parsed {
        raw: RawTable::new(columns, records),
        table,
    })
}

/// One report date per record. Per-row cells that are missing or unreadable
/// fall back to the latest date found in the other rows.
fn row_dates(
    records: &[ParsedFields],
    document_date: Option<NaiveDate>,
    field: Option<&str>,
) -> Option<Vec<NaiveDate>> {
    if let Some(date) = document_date {
        return Some(vec![date; records.len()]);
    }
    let field = field?;
    let found: Vec<Option<NaiveDate>> = records
        .iter()
        .map(|fields| {
            fields
                .get(field)
                .and_then(|v| v.as_ref())
                .and_then(Value::as_date)
        })
        .collect();
    let fallback = found.iter().flatten().max().copied()?;
    Some(
        found
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                date.unwrap_or_else(|| {
                    debug!("Row {} has no readable report date; using {fallback}", i + 1);
                    fallback
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn explicit_date_beats_every_other_source() {
        let profile = units::builtin("region-5").unwrap();
        let doc = Document::text("2026-01-18.txt", "REGION 5\nReport Date: 28 Dec 2025\n");
        let date = resolve_report_date(&doc, &profile, Some(ymd(2026, 1, 1))).unwrap();
        assert_eq!(date, Some(ymd(2026, 1, 1)));
        let date = resolve_report_date(&doc, &profile, None).unwrap();
        assert_eq!(date, Some(ymd(2025, 12, 28)));
    }

    #[test]
    fn label_beyond_first_lines_is_ignored() {
        let text = "a\nb\nc\nd\ne\nReport Date: 28 Dec 2025\n";
        assert_eq!(date_from_label(text, "Report Date").unwrap(), None);
    }

    #[test]
    fn filename_convention_resolves_date() {
        let profile = units::builtin("region-1").unwrap();
        let workbook = Workbook::new(
            "in/Laporan Harian Pemboran Regional 1 tanggal 12 Feb 2026.xlsx",
        );
        let doc = Document::Workbook(workbook);
        assert_eq!(
            resolve_report_date(&doc, &profile, None).unwrap(),
            Some(ymd(2026, 2, 12))
        );
    }

    #[test]
    fn bad_date_pattern_names_the_unit() {
        let mut profile = units::builtin("zone-8").unwrap();
        profile.report_date.filename = Some("(\\d{4}".to_string());
        let doc = Document::text("2026-01-03.txt", "1.\nNama Sumur: X\n");
        let err = resolve_report_date(&doc, &profile, None).unwrap_err();
        match err {
            ParseError::InvalidProfile { unit, reason } => {
                assert_eq!(unit, "zone-8");
                assert!(reason.starts_with("report date file name pattern"), "{reason}");
            }
            other => panic!("unexpected {other}"),
        }

        let label_err = Regex::new("(").unwrap_err();
        let err = invalid_profile(&profile, "report date label", label_err);
        assert!(err.to_string().starts_with("invalid profile 'zone-8': report date label"));
    }

    #[test]
    fn raw_view_keeps_extracted_fields_in_layout_order() {
        let profile = units::builtin("zone-8").unwrap();
        let memo =
            "1.\nNama Sumur: PHM-01\nNama Rig: Raissa\nAFE: 1.250.000\nSummary Report:\nDrilling\n";
        let doc = Document::text("2026-01-03.txt", memo);
        let parsed = parse_document(&doc, &profile, None).unwrap();
        assert_eq!(parsed.raw.columns[..3], ["Nama Sumur", "Nama Rig", "Hari ke"]);
        assert_eq!(parsed.raw.len(), 1);
        let row = &parsed.raw.rows[0];
        assert_eq!(row["AFE"], Some(Value::Number(1_250_000.0)));
        assert_eq!(row["Hari ke"], None);
        assert_eq!(parsed.table.len(), 1);
    }

    #[test]
    fn no_date_source_is_a_hard_error() {
        let profile = units::builtin("zone-7").unwrap();
        let doc = Document::text("memo.txt", "FIELD A\n1. AMJ-004\n");
        let err = parse(&doc, &profile, None).unwrap_err();
        assert!(matches!(err, ParseError::ReportDate { .. }), "{err}");
        assert!(err.to_string().contains("memo.txt"));
    }

    #[test]
    fn document_without_records_names_its_source() {
        let profile = units::builtin("zone-8").unwrap();
        let doc = Document::text("empty.txt", "Selamat pagi\n");
        let err = parse(&doc, &profile, Some(ymd(2026, 1, 3))).unwrap_err();
        assert_eq!(err.to_string(), "no well records found in empty.txt");
    }

    #[test]
    fn text_profile_rejects_workbook() {
        let profile = units::builtin("zone-8").unwrap();
        let doc = Document::Workbook(Workbook::new("book.xlsx"));
        let err = parse(&doc, &profile, Some(ymd(2026, 1, 3))).unwrap_err();
        assert!(matches!(err, ParseError::WrongInput { .. }));
    }

    #[test]
    fn per_row_dates_fall_back_to_latest() {
        let with = |d: Option<&str>| -> ParsedFields {
            [("Report Date".to_string(), d.map(Value::text))].into_iter().collect()
        };
        let records = vec![with(Some("2026-02-01")), with(None), with(Some("2026-02-03"))];
        let dates = row_dates(&records, None, Some("Report Date")).unwrap();
        assert_eq!(dates, [ymd(2026, 2, 1), ymd(2026, 2, 3), ymd(2026, 2, 3)]);
        assert!(row_dates(&[with(None)], None, Some("Report Date")).is_none());
    }
}
