//! Maps [`ParsedFields`] onto the canonical row.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use log::debug;

use crate::{
    data::Value,
    error::{ParseError, ParseResult},
    extract::ParsedFields,
    normalize::{
        SummaryParts, SummarySplitter, clean_free_text, clean_rig_name, split_plan, split_slash,
        split_well_name, strip_invisible,
    },
    profile::{ColumnRule, Partition, SummaryRule, UnitProfile, WellNameRule},
    schema::{CanonicalRow, FLAG},
};

/// Profile compiled for row mapping: summary splitters are built once.
pub struct SchemaMapper<'p> {
    profile: &'p UnitProfile,
    splitters: Vec<Option<SummarySplitter>>,
}

impl<'p> SchemaMapper<'p> {
    pub fn new(profile: &'p UnitProfile) -> ParseResult<Self> {
        let splitters = profile
            .partitions
            .iter()
            .map(|partition| match &partition.summary {
                SummaryRule::Labeled(spec) => SummarySplitter::new(spec)
                    .map(Some)
                    .map_err(|e| ParseError::InvalidProfile {
                        unit: profile.name.clone(),
                        reason: format!("summary labels: {e}"),
                    }),
                _ => Ok(None),
            })
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self { profile, splitters })
    }

    /// Maps one record. `report_date` is the row's resolved report date.
    /// Returns `None` when no partition accepts the row's zone.
    pub fn map(&self, fields: &ParsedFields, report_date: NaiveDate) -> Option<CanonicalRow> {
        let columns = &self.profile.columns;
        let zone = resolve(&columns.zone, fields, None);
        let Some(index) = self
            .profile
            .partitions
            .iter()
            .position(|p| p.matches(zone.as_deref()))
        else {
            debug!("Dropping row: no partition for zone {zone:?}");
            return None;
        };
        let partition = &self.profile.partitions[index];
        let col = |rule: &ColumnRule| resolve(rule, fields, zone.as_deref());

        let rig_name = col(&columns.rig_name).map(|raw| {
            clean_rig_name(
                &strip_invisible(&raw),
                partition.rig.strip_rig_token,
                &partition.rig.aliases,
                partition.rig.pdsi_spacing,
            )
        });
        let aph = self.aph(col(&columns.aph), rig_name.as_deref());

        let (well_name, well_name_2) = well_names(
            partition.well_name,
            col(&columns.well_name),
            col(&columns.well_name_2),
        );

        let parts = self.summary_parts(
            index,
            partition,
            col(&columns.summary_report),
            col(&columns.current_status),
            col(&columns.next_plan),
        );
        let summary_report = free_text(&parts.summary);
        let current_status = free_text(&parts.status);
        let next_plan = free_text(&parts.plan);
        let summary_report = if partition.summary_fallback {
            summary_report
                .or_else(|| current_status.clone())
                .or_else(|| next_plan.clone())
        } else {
            summary_report
        };

        let operation_date = report_date
            .checked_sub_days(Days::new(1))
            .unwrap_or(report_date);

        Some(CanonicalRow {
            flag: FLAG.to_string(),
            region: col(&columns.region),
            zone: zone.clone(),
            aph,
            rig_name: rig_name.filter(|r| !r.is_empty()),
            well_name_2: well_name_2.or_else(|| well_name.clone()),
            well_name,
            well_type: col(&columns.well_type),
            location: col(&columns.location),
            spud_date: date_of(&columns.spud_date, fields),
            release_date: date_of(&columns.release_date, fields),
            status: col(&columns.status),
            status_code_1: col(&columns.status_code_1),
            status_code_2: col(&columns.status_code_2),
            summary_report,
            current_status,
            next_plan,
            report_date,
            operation_date,
        })
    }

    fn aph(&self, base: Option<String>, rig_name: Option<&str>) -> Option<String> {
        let rig = rig_name.map(str::to_lowercase).unwrap_or_default();
        self.profile
            .aph_overrides
            .iter()
            .find(|o| !rig.is_empty() && rig.contains(&o.rig_contains.to_lowercase()))
            .map(|o| o.code.clone())
            .or(base)
    }

    fn summary_parts(
        &self,
        index: usize,
        partition: &Partition,
        summary: Option<String>,
        status: Option<String>,
        plan: Option<String>,
    ) -> SummaryParts {
        let raw = summary.unwrap_or_default();
        let mut parts = match (&partition.summary, &self.splitters[index]) {
            (SummaryRule::PlanSplit, _) => split_plan(&raw),
            (SummaryRule::Labeled(_), Some(splitter)) => splitter.split(&raw),
            _ => SummaryParts {
                summary: raw,
                ..SummaryParts::default()
            },
        };
        // Explicit columns win over values carved out of the combined cell.
        if let Some(status) = status {
            parts.status = status;
        }
        if let Some(plan) = plan {
            parts.plan = plan;
        }
        parts
    }
}

fn lookup<'m>(values: &'m BTreeMap<String, String>, key: &str) -> Option<&'m String> {
    values.get(key).or_else(|| {
        let key = key.to_lowercase();
        values
            .iter()
            .find(|(k, _)| k.to_lowercase() == key)
            .map(|(_, v)| v)
    })
}

fn field_text(fields: &ParsedFields, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(|v| v.as_ref())
        .and_then(Value::as_text)
        .map(|s| strip_invisible(&s).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Evaluates one column rule; `zone` is the already resolved Zone column.
pub fn resolve(rule: &ColumnRule, fields: &ParsedFields, zone: Option<&str>) -> Option<String> {
    match rule {
        ColumnRule::Empty => None,
        ColumnRule::Const { value } => Some(value.clone()),
        ColumnRule::Field { name } => field_text(fields, name),
        ColumnRule::Titled { name } => field_text(fields, name).map(|s| title_case(&s)),
        ColumnRule::Mapped {
            field,
            values,
            passthrough,
        } => {
            let raw = field_text(fields, field)?;
            match lookup(values, &raw) {
                Some(mapped) => Some(mapped.clone()),
                None if *passthrough => Some(raw),
                None => {
                    debug!("No mapping for {field} value {raw:?}");
                    None
                }
            }
        }
        ColumnRule::ByZone { values } => zone.and_then(|z| lookup(values, z)).cloned(),
    }
}

fn date_of(rule: &ColumnRule, fields: &ParsedFields) -> Option<NaiveDate> {
    match rule {
        ColumnRule::Field { name } => fields
            .get(name)
            .and_then(|v| v.as_ref())
            .and_then(Value::as_date),
        _ => resolve(rule, fields, None).and_then(|s| Value::Text(s).as_date()),
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn free_text(raw: &str) -> Option<String> {
    let cleaned = clean_free_text(raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn well_names(
    rule: WellNameRule,
    primary: Option<String>,
    alternate: Option<String>,
) -> (Option<String>, Option<String>) {
    let Some(raw) = primary else {
        return (None, alternate);
    };
    match rule {
        WellNameRule::Verbatim => (non_blank(raw), alternate),
        WellNameRule::Parenthetical => {
            let names = split_well_name(&raw);
            (non_blank(names.primary), non_blank(names.secondary))
        }
        WellNameRule::Alternates => {
            let names = split_well_name(&raw);
            let first = non_blank(names.secondary).or_else(|| non_blank(names.primary));
            (first, non_blank(names.tertiary))
        }
        WellNameRule::Slash => {
            let (left, right) = split_slash(&raw);
            (non_blank(left), non_blank(right))
        }
    }
}
