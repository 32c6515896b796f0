//! Declarative unit profiles.
//!
//! A [`UnitProfile`] describes everything that differs between organizational
//! units: how records are delimited, which labels carry which fields, how raw
//! fields map onto the canonical columns and how the final table is ordered.
//! Built-in profiles live in [`crate::units`]; custom ones are loaded from YAML
//! with [`UnitProfile::load`].

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::schema::Column;

pub const DEFAULT_RECORD_PATTERN: &str = r"^(\d+)\.\s*(.*)$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input: InputLayout,
    #[serde(default)]
    pub report_date: ReportDateRule,
    #[serde(default)]
    pub columns: ColumnRules,
    #[serde(default)]
    pub aph_overrides: Vec<AphOverride>,
    #[serde(default = "default_partitions")]
    pub partitions: Vec<Partition>,
    #[serde(default = "default_merge_sort")]
    pub merge_sort: Vec<SortKey>,
}

impl UnitProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening profile file {path:?}"))?;
        let reader = BufReader::new(file);
        let profile: UnitProfile = serde_yaml::from_reader(reader)
            .with_context(|| format!("Parsing profile YAML from {path:?}"))?;
        Ok(profile)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating profile file {path:?}"))?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)
            .with_context(|| format!("Writing profile YAML to {path:?}"))?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing profile to YAML")
    }

    pub fn input_kind(&self) -> &'static str {
        match self.input {
            InputLayout::Text(_) => "text",
            InputLayout::Sheet(_) => "spreadsheet",
        }
    }
}

fn default_partitions() -> Vec<Partition> {
    vec![Partition::default()]
}

pub fn default_merge_sort() -> Vec<SortKey> {
    vec![
        SortKey::new(Column::Zone),
        SortKey::case_insensitive(Column::RigName),
        SortKey::new(Column::WellName),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputLayout {
    Text(TextLayout),
    Sheet(SheetLayout),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayout {
    /// Record boundary; capture 1 is the number, capture 2 the opening line.
    #[serde(default = "default_record_pattern")]
    pub record_pattern: String,
    /// Grouping header; capture 1 is the group label.
    #[serde(default)]
    pub group_pattern: Option<String>,
    /// Field that receives the current group label.
    #[serde(default)]
    pub group_field: Option<String>,
    #[serde(default)]
    pub require_group: bool,
    /// Drop boundaries whose opening line carries no description.
    #[serde(default)]
    pub require_description: bool,
    /// Line prefixes that end the report body (sign-offs).
    #[serde(default)]
    pub terminators: Vec<String>,
    /// Everything from this marker on is ignored.
    #[serde(default)]
    pub truncate_at: Option<String>,
    /// Characters removed from every line before classification.
    #[serde(default)]
    pub strip_chars: String,
    /// Field that receives the first non-empty line of the document.
    #[serde(default)]
    pub title_field: Option<String>,
    #[serde(default)]
    pub description: DescriptionSpec,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    /// Label prefixes that end a section body without being extracted.
    #[serde(default)]
    pub stop_labels: Vec<String>,
    /// Raw line prefixes that end a section body.
    #[serde(default)]
    pub stop_prefixes: Vec<String>,
    #[serde(default)]
    pub capture: SectionCapture,
    #[serde(default = "default_joiner")]
    pub joiner: String,
    /// Characters stripped from the left edge of a body's first line.
    #[serde(default)]
    pub decoration: String,
    #[serde(default)]
    pub trim_trailing_period: bool,
}

fn default_record_pattern() -> String {
    DEFAULT_RECORD_PATTERN.to_string()
}

fn default_joiner() -> String {
    "\n".to_string()
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            record_pattern: default_record_pattern(),
            group_pattern: None,
            group_field: None,
            require_group: false,
            require_description: false,
            terminators: Vec::new(),
            truncate_at: None,
            strip_chars: String::new(),
            title_field: None,
            description: DescriptionSpec::default(),
            fields: Vec::new(),
            sections: Vec::new(),
            stop_labels: Vec::new(),
            stop_prefixes: Vec::new(),
            capture: SectionCapture::default(),
            joiner: default_joiner(),
            decoration: String::new(),
            trim_trailing_period: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCapture {
    #[default]
    All,
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionStyle {
    #[default]
    Ignore,
    Well,
    WellWithAlternate,
    WellAndRig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptionSpec {
    #[serde(default)]
    pub style: DescriptionStyle,
    #[serde(default)]
    pub well_field: Option<String>,
    #[serde(default)]
    pub alternate_field: Option<String>,
    #[serde(default)]
    pub rig_field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMatch {
    #[default]
    Exact,
    Prefix,
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Amount,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(default)]
    pub matching: LabelMatch,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &str, aliases: &[&str], matching: LabelMatch, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            matching,
            kind,
        }
    }

    pub fn text(name: &str, aliases: &[&str], matching: LabelMatch) -> Self {
        Self::new(name, aliases, matching, FieldKind::Text)
    }

    /// Matches a lowercased label against the aliases.
    pub fn matches(&self, label: &str) -> bool {
        self.aliases.iter().any(|alias| match self.matching {
            LabelMatch::Exact => label == alias,
            LabelMatch::Prefix => label.starts_with(alias.as_str()),
            LabelMatch::Contains => label.contains(alias.as_str()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    #[default]
    Contains,
    Prefix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPattern {
    pub text: String,
    #[serde(default)]
    pub mode: PatternMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    pub patterns: Vec<SectionPattern>,
}

impl SectionSpec {
    pub fn new(name: &str, contains: &[&str], prefixes: &[&str]) -> Self {
        let patterns = contains
            .iter()
            .map(|t| SectionPattern {
                text: t.to_string(),
                mode: PatternMode::Contains,
            })
            .chain(prefixes.iter().map(|t| SectionPattern {
                text: t.to_string(),
                mode: PatternMode::Prefix,
            }))
            .collect();
        Self {
            name: name.to_string(),
            patterns,
        }
    }

    /// `line` must already be lowercased with whitespace collapsed.
    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| match p.mode {
            PatternMode::Contains => line.contains(p.text.as_str()),
            PatternMode::Prefix => line.starts_with(p.text.as_str()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub sheet: SheetSelector,
    /// Zero-based row holding the column headers.
    pub header_row: usize,
    #[serde(default)]
    pub required_columns: Vec<String>,
    #[serde(default)]
    pub zone_filter: Option<ZoneFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum SheetSelector {
    Name { name: String },
    /// chrono format patterns applied to the report date, tried in order.
    ReportDate { patterns: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneFilter {
    pub column: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportDateRule {
    /// Label searched in the first lines of a text document.
    #[serde(default)]
    pub label: Option<String>,
    /// Regex over the source file name; capture 1 is the date text.
    #[serde(default)]
    pub filename: Option<String>,
    /// Per-row field carrying the report date.
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ColumnRule {
    #[default]
    Empty,
    Const {
        value: String,
    },
    Field {
        name: String,
    },
    /// Field value converted to title case (`REGION 5` → `Region 5`).
    Titled {
        name: String,
    },
    /// Case-insensitive lookup of a field value.
    Mapped {
        field: String,
        values: BTreeMap<String, String>,
        #[serde(default)]
        passthrough: bool,
    },
    /// Lookup keyed on the row's resolved zone.
    ByZone {
        values: BTreeMap<String, String>,
    },
}

impl ColumnRule {
    pub fn constant(value: &str) -> Self {
        ColumnRule::Const {
            value: value.to_string(),
        }
    }

    pub fn field(name: &str) -> Self {
        ColumnRule::Field {
            name: name.to_string(),
        }
    }

    pub fn mapped(field: &str, pairs: &[(&str, &str)], passthrough: bool) -> Self {
        ColumnRule::Mapped {
            field: field.to_string(),
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            passthrough,
        }
    }

    pub fn by_zone(pairs: &[(&str, &str)]) -> Self {
        ColumnRule::ByZone {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Human-readable summary of the values this rule can produce.
    pub fn describe(&self) -> String {
        match self {
            ColumnRule::Empty => "-".to_string(),
            ColumnRule::Const { value } => value.clone(),
            ColumnRule::Field { name } | ColumnRule::Titled { name } => format!("<{name}>"),
            ColumnRule::Mapped { values, .. } | ColumnRule::ByZone { values } => {
                values.values().unique().join(", ")
            }
        }
    }
}

/// One rule per canonical column; Flag and the two dates are always derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRules {
    pub region: ColumnRule,
    pub zone: ColumnRule,
    pub aph: ColumnRule,
    pub rig_name: ColumnRule,
    pub well_name: ColumnRule,
    pub well_name_2: ColumnRule,
    pub well_type: ColumnRule,
    pub location: ColumnRule,
    pub spud_date: ColumnRule,
    pub release_date: ColumnRule,
    pub status: ColumnRule,
    pub status_code_1: ColumnRule,
    pub status_code_2: ColumnRule,
    pub summary_report: ColumnRule,
    pub current_status: ColumnRule,
    pub next_plan: ColumnRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AphOverride {
    pub rig_contains: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellNameRule {
    /// Well name as-is; Well Name [2] from its own rule.
    #[default]
    Verbatim,
    /// `NAME (ALT)` → (NAME, ALT); ALT defaults to NAME.
    Parenthetical,
    /// `NAME\n(ALT1)\n(ALT2)` → (ALT1, ALT2).
    Alternates,
    /// `NAME / ALT` → (NAME, ALT).
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStamp {
    #[default]
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSummary {
    #[serde(default)]
    pub summary_label: Option<String>,
    pub status_label: String,
    #[serde(default)]
    pub status_time: TimeStamp,
    pub plan_label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SummaryRule {
    #[default]
    Verbatim,
    PlanSplit,
    Labeled(LabeledSummary),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigRule {
    pub strip_rig_token: bool,
    pub aliases: BTreeMap<String, String>,
    pub pdsi_spacing: bool,
}

impl RigRule {
    pub fn with_aliases(mut self, pairs: &[(&str, &str)]) -> Self {
        self.aliases = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Partition {
    /// Canonical zone selecting the rows of this partition; `None` takes all.
    pub zone: Option<String>,
    pub well_name: WellNameRule,
    pub summary: SummaryRule,
    pub rig: RigRule,
    /// Fill an empty summary from the current status, then the next plan.
    pub summary_fallback: bool,
    pub sort: Vec<SortKey>,
}

impl Partition {
    pub fn matches(&self, zone: Option<&str>) -> bool {
        match (&self.zone, zone) {
            (None, _) => true,
            (Some(expected), Some(actual)) => expected == actual,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: Column,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl SortKey {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            case_insensitive: false,
        }
    }

    pub fn case_insensitive(column: Column) -> Self {
        Self {
            column,
            case_insensitive: true,
        }
    }
}
