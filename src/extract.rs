//! Per-record field extraction.
//!
//! Each text record is scanned by a two-state machine: `Scanning` for labels,
//! or collecting the body of one section. Lines are classified first, then
//! the classification alone drives the transition.

use std::{collections::BTreeMap, sync::LazyLock};

use itertools::Itertools;
use log::debug;
use regex::Regex;

use crate::{
    data::{Value, canonicalize_date, parse_amount, parse_number},
    normalize::{split_well_and_rig, split_well_name},
    profile::{DescriptionStyle, FieldKind, SectionCapture, TextLayout},
    segment::{RawRecord, Span},
};

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+?)\s*:\s*(.*)$").expect("key value regex"));

/// Unit-specific field name to extracted value; every known name is present.
pub type ParsedFields = BTreeMap<String, Option<Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'l> {
    Blank,
    Section { index: usize, inline: &'l str },
    Field { index: usize, value: &'l str },
    Stop,
    Other,
}

#[derive(Debug)]
enum State {
    Scanning,
    InSection { index: usize, lines: Vec<String> },
}

fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn non_empty(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| Value::text(trimmed))
}

pub struct FieldExtractor<'a> {
    layout: &'a TextLayout,
    title: Option<String>,
    stop_labels: Vec<String>,
    stop_prefixes: Vec<String>,
}

impl<'a> FieldExtractor<'a> {
    /// `title` is the document's first non-empty line, stored under the
    /// layout's title field when one is configured.
    pub fn new(layout: &'a TextLayout, title: Option<&str>) -> Self {
        Self {
            layout,
            title: title.map(|t| t.trim().to_string()),
            stop_labels: layout.stop_labels.iter().map(|l| fold(l)).collect(),
            stop_prefixes: layout.stop_prefixes.clone(),
        }
    }

    /// Every field name this layout can produce, in record order: title and
    /// group, the opening line, labeled fields, then sections.
    pub fn known_fields(&self) -> Vec<String> {
        let layout = self.layout;
        let description = &layout.description;
        layout
            .title_field
            .iter()
            .chain(layout.group_field.iter())
            .chain(description.well_field.iter())
            .chain(description.alternate_field.iter())
            .chain(description.rig_field.iter())
            .cloned()
            .chain(layout.fields.iter().map(|f| f.name.clone()))
            .chain(layout.sections.iter().map(|s| s.name.clone()))
            .unique()
            .collect()
    }

    pub fn extract(&self, record: &RawRecord) -> ParsedFields {
        let mut fields: ParsedFields = self
            .known_fields()
            .into_iter()
            .map(|name| (name, None))
            .collect();

        if let (Some(name), Some(title)) = (&self.layout.title_field, &self.title) {
            fields.insert(name.clone(), non_empty(title));
        }
        if let (Some(name), Some(group)) = (&self.layout.group_field, &record.group) {
            fields.insert(name.clone(), non_empty(group));
        }

        let Span::Lines { description, lines } = &record.span else {
            return row_fields(record);
        };
        self.apply_description(description, &mut fields);

        let mut state = State::Scanning;
        for line in lines {
            match self.classify(line) {
                Line::Blank => {}
                Line::Section { index, inline } => {
                    self.close(&mut state, &mut fields);
                    let lines = if inline.is_empty() {
                        Vec::new()
                    } else {
                        vec![inline.to_string()]
                    };
                    let complete =
                        !lines.is_empty() && self.layout.capture == SectionCapture::First;
                    state = State::InSection { index, lines };
                    if complete {
                        self.close(&mut state, &mut fields);
                    }
                }
                Line::Field { index, value } => {
                    self.close(&mut state, &mut fields);
                    self.store_field(index, value, &mut fields);
                }
                Line::Stop => self.close(&mut state, &mut fields),
                Line::Other => {
                    if let State::InSection { lines, .. } = &mut state {
                        lines.push(line.clone());
                        if self.layout.capture == SectionCapture::First {
                            self.close(&mut state, &mut fields);
                        }
                    }
                }
            }
        }
        self.close(&mut state, &mut fields);
        fields
    }

    fn classify<'l>(&self, line: &'l str) -> Line<'l> {
        if line.trim().is_empty() {
            return Line::Blank;
        }
        let folded = fold(line);
        if let Some(index) = self.layout.sections.iter().position(|s| s.matches(&folded)) {
            let inline = line.split_once(':').map_or("", |(_, rest)| rest.trim());
            return Line::Section { index, inline };
        }
        if let Some(caps) = KEY_VALUE.captures(line) {
            let label = fold(caps.get(1).map_or("", |m| m.as_str()));
            if let Some(index) = self.layout.fields.iter().position(|f| f.matches(&label)) {
                let value = caps.get(2).map_or("", |m| m.as_str()).trim();
                return Line::Field { index, value };
            }
        }
        if self.stop_labels.iter().any(|l| folded.starts_with(l.as_str()))
            || self.stop_prefixes.iter().any(|p| line.starts_with(p.as_str()))
        {
            return Line::Stop;
        }
        Line::Other
    }

    fn close(&self, state: &mut State, fields: &mut ParsedFields) {
        let State::InSection { index, lines } = std::mem::replace(state, State::Scanning) else {
            return;
        };
        let section = &self.layout.sections[index];
        let decoration: Vec<char> = self.layout.decoration.chars().collect();
        let mut body: Vec<String> = lines
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if let Some(first) = body.first_mut() {
            *first = first
                .trim_start_matches(|c: char| decoration.contains(&c) || c.is_whitespace())
                .to_string();
        }
        let mut joined = body.join(&self.layout.joiner);
        if self.layout.trim_trailing_period {
            joined = joined.trim_end_matches('.').to_string();
        }
        match non_empty(&joined) {
            Some(value) => {
                fields.insert(section.name.clone(), Some(value));
            }
            None => debug!("Section '{}' has an empty body", section.name),
        }
    }

    fn store_field(&self, index: usize, raw: &str, fields: &mut ParsedFields) {
        let spec = &self.layout.fields[index];
        let raw = if self.layout.trim_trailing_period {
            raw.trim_end_matches('.')
        } else {
            raw
        };
        let value = match spec.kind {
            FieldKind::Text => non_empty(raw),
            FieldKind::Number => parse_number(raw).map(Value::Number),
            FieldKind::Amount => parse_amount(raw).map(Value::Number),
            FieldKind::Date => canonicalize_date(raw).map(Value::Date),
        };
        match value {
            Some(value) => {
                fields.insert(spec.name.clone(), Some(value));
            }
            None if !raw.trim().is_empty() => {
                debug!("Field '{}' value {raw:?} degraded to null", spec.name);
                fields.entry(spec.name.clone()).or_insert(None);
            }
            None => {}
        }
    }

    fn apply_description(&self, raw: &str, fields: &mut ParsedFields) {
        let spec = &self.layout.description;
        let raw = if self.layout.trim_trailing_period {
            raw.trim().trim_end_matches('.')
        } else {
            raw.trim()
        };
        let mut set = |name: &Option<String>, value: &str| {
            if let Some(name) = name {
                fields.insert(name.clone(), non_empty(value));
            }
        };
        match spec.style {
            DescriptionStyle::Ignore => {}
            DescriptionStyle::Well => set(&spec.well_field, raw),
            DescriptionStyle::WellWithAlternate => {
                let names = split_well_name(raw);
                set(&spec.well_field, &names.primary);
                set(&spec.alternate_field, &names.secondary);
            }
            DescriptionStyle::WellAndRig => {
                let (well, rig) = split_well_and_rig(raw);
                set(&spec.well_field, &well);
                set(&spec.rig_field, rig.as_deref().unwrap_or_default());
            }
        }
    }
}

/// Fields of a spreadsheet row record: one entry per named header.
pub fn row_fields(record: &RawRecord) -> ParsedFields {
    match &record.span {
        Span::Row(cells) => cells.iter().cloned().collect(),
        Span::Lines { .. } => ParsedFields::new(),
    }
}

/// Extracted fields before any column mapping, one row per well record.
///
/// `columns` fixes the output order; a row missing a column renders it empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<ParsedFields>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<ParsedFields>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of every row in column order.
    pub fn cells(&self) -> Vec<Vec<Option<Value>>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column).cloned().flatten())
                    .collect()
            })
            .collect()
    }

    /// Rows of every table in input order; columns are the union, first seen first.
    pub fn concat(tables: Vec<RawTable>) -> RawTable {
        let columns = tables
            .iter()
            .flat_map(|t| t.columns.iter().cloned())
            .unique()
            .collect();
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        RawTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DescriptionSpec, FieldSpec, LabelMatch, SectionSpec};

    fn record(description: &str, lines: &[&str]) -> RawRecord {
        RawRecord {
            number: 1,
            group: Some("ALPHA".to_string()),
            span: Span::Lines {
                description: description.to_string(),
                lines: lines.iter().map(|l| l.to_string()).collect(),
            },
        }
    }

    fn memo_layout() -> TextLayout {
        TextLayout {
            group_field: Some("Field".to_string()),
            description: DescriptionSpec {
                style: DescriptionStyle::Well,
                well_field: Some("Well Name".to_string()),
                ..DescriptionSpec::default()
            },
            fields: vec![
                FieldSpec::text("Nama Rig", &["nama rig", "rig name"], LabelMatch::Exact),
                FieldSpec::new("AFE", &["afe"], LabelMatch::Contains, FieldKind::Number),
                FieldSpec::new("Realisasi", &["realisasi"], LabelMatch::Prefix, FieldKind::Amount),
            ],
            sections: vec![
                SectionSpec::new("Summary Report", &["summary report"], &[]),
                SectionSpec::new("Current Status", &["current status"], &[]),
                SectionSpec::new("Next Plan", &[], &["next plan", "plan"]),
            ],
            decoration: "-".to_string(),
            ..TextLayout::default()
        }
    }

    #[test]
    fn every_known_field_is_present() {
        let layout = memo_layout();
        let fields = FieldExtractor::new(&layout, None).extract(&record("AMJ-004", &[]));
        for name in [
            "Field",
            "Well Name",
            "Nama Rig",
            "AFE",
            "Realisasi",
            "Summary Report",
            "Current Status",
            "Next Plan",
        ] {
            assert!(fields.contains_key(name), "missing {name}");
        }
        assert_eq!(fields["Well Name"], Some(Value::text("AMJ-004")));
        assert_eq!(fields["Field"], Some(Value::text("ALPHA")));
        assert_eq!(fields["Next Plan"], None);
    }

    #[test]
    fn known_fields_follow_record_order() {
        let layout = memo_layout();
        let names = FieldExtractor::new(&layout, None).known_fields();
        assert_eq!(
            names,
            [
                "Field",
                "Well Name",
                "Nama Rig",
                "AFE",
                "Realisasi",
                "Summary Report",
                "Current Status",
                "Next Plan",
            ]
        );
    }

    #[test]
    fn raw_tables_concatenate_with_column_union() {
        let row = |pairs: &[(&str, &str)]| -> ParsedFields {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Some(Value::text(*v))))
                .collect()
        };
        let first = RawTable::new(
            vec!["Well".to_string(), "Rig".to_string()],
            vec![row(&[("Well", "A"), ("Rig", "N1")])],
        );
        let second = RawTable::new(
            vec!["Well".to_string(), "AFE".to_string()],
            vec![row(&[("Well", "B"), ("AFE", "100")])],
        );
        let merged = RawTable::concat(vec![first, second]);
        assert_eq!(merged.columns, ["Well", "Rig", "AFE"]);
        let cells = merged.cells();
        assert_eq!(cells[0], [Some(Value::text("A")), Some(Value::text("N1")), None]);
        assert_eq!(cells[1], [Some(Value::text("B")), None, Some(Value::text("100"))]);
    }

    #[test]
    fn multi_line_body_strips_first_line_only() {
        let layout = memo_layout();
        let fields = FieldExtractor::new(&layout, None).extract(&record(
            "AMJ-004",
            &["Rig Name: PDSI #40", "Summary Report:", "- Drill 8-1/2\" hole", "- Circulate", ""],
        ));
        assert_eq!(fields["Nama Rig"], Some(Value::text("PDSI #40")));
        assert_eq!(
            fields["Summary Report"],
            Some(Value::text("Drill 8-1/2\" hole\n- Circulate"))
        );
    }

    #[test]
    fn known_label_ends_section_body() {
        let layout = memo_layout();
        let fields = FieldExtractor::new(&layout, None).extract(&record(
            "X",
            &["Current Status: RIH", "AFE: USD 1.500.000", "Realisasi: 250000 (17%)", "tail"],
        ));
        assert_eq!(fields["Current Status"], Some(Value::text("RIH")));
        assert_eq!(fields["AFE"], Some(Value::Number(1_500_000.0)));
        assert_eq!(fields["Realisasi"], Some(Value::Number(250_000.0)));
    }

    #[test]
    fn section_header_beats_key_value() {
        let mut layout = memo_layout();
        layout.fields.push(FieldSpec::text("Plan", &["plan"], LabelMatch::Exact));
        let fields = FieldExtractor::new(&layout, None).extract(&record("X", &["Plan: POOH"]));
        assert_eq!(fields["Next Plan"], Some(Value::text("POOH")));
        assert_eq!(fields["Plan"], None);
    }

    #[test]
    fn first_capture_keeps_one_line() {
        let layout = TextLayout {
            capture: SectionCapture::First,
            decoration: "-=".to_string(),
            trim_trailing_period: true,
            ..memo_layout()
        };
        let fields = FieldExtractor::new(&layout, None).extract(&record(
            "X",
            &["Summary Report :", "", "=- Drilling ahead.", "second line"],
        ));
        assert_eq!(fields["Summary Report"], Some(Value::text("Drilling ahead")));
    }

    #[test]
    fn unparsable_number_degrades_to_null() {
        let layout = memo_layout();
        let fields = FieldExtractor::new(&layout, None).extract(&record("X", &["AFE: tbd"]));
        assert_eq!(fields["AFE"], None);
    }

    #[test]
    fn key_value_overrides_description() {
        let mut layout = memo_layout();
        layout
            .fields
            .push(FieldSpec::text("Well Name", &["nama sumur"], LabelMatch::Exact));
        let fields = FieldExtractor::new(&layout, None)
            .extract(&record("SBKD-001", &["Nama Sumur: SBKD-001 ST"]));
        assert_eq!(fields["Well Name"], Some(Value::text("SBKD-001 ST")));
    }

    #[test]
    fn well_and_rig_description_fills_both_fields() {
        let layout = TextLayout {
            description: DescriptionSpec {
                style: DescriptionStyle::WellAndRig,
                well_field: Some("Well Name".to_string()),
                rig_field: Some("Rig Name".to_string()),
                ..DescriptionSpec::default()
            },
            title_field: Some("Region".to_string()),
            ..TextLayout::default()
        };
        let fields = FieldExtractor::new(&layout, Some("REGION 5"))
            .extract(&record("OHD – QB-117 (Rig ENAFOR 45)", &[]));
        assert_eq!(fields["Well Name"], Some(Value::text("QB-117")));
        assert_eq!(fields["Rig Name"], Some(Value::text("ENAFOR 45")));
        assert_eq!(fields["Region"], Some(Value::text("REGION 5")));
    }
}
