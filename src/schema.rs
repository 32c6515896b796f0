//! The canonical 19-column output schema shared by every unit.
//!
//! Column order is part of the contract: downstream sheets concatenate tables
//! from heterogeneous units positionally, so [`Column::ALL`] must never be
//! reordered and every row always carries every column.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::Value;

pub const FLAG: &str = "INC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Flag,
    Region,
    Zone,
    Aph,
    RigName,
    WellName,
    WellName2,
    WellType,
    Location,
    SpudDate,
    ReleaseDate,
    Status,
    StatusCode1,
    StatusCode2,
    SummaryReport,
    CurrentStatus,
    NextPlan,
    ReportDate,
    OperationDate,
}

impl Column {
    pub const ALL: [Column; 19] = [
        Column::Flag,
        Column::Region,
        Column::Zone,
        Column::Aph,
        Column::RigName,
        Column::WellName,
        Column::WellName2,
        Column::WellType,
        Column::Location,
        Column::SpudDate,
        Column::ReleaseDate,
        Column::Status,
        Column::StatusCode1,
        Column::StatusCode2,
        Column::SummaryReport,
        Column::CurrentStatus,
        Column::NextPlan,
        Column::ReportDate,
        Column::OperationDate,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Flag => "Flag",
            Column::Region => "Region",
            Column::Zone => "Zone",
            Column::Aph => "APH",
            Column::RigName => "Rig Name",
            Column::WellName => "Well Name",
            Column::WellName2 => "Well Name [2]",
            Column::WellType => "Well Type",
            Column::Location => "Location",
            Column::SpudDate => "Spud Date",
            Column::ReleaseDate => "Release Date",
            Column::Status => "Status",
            Column::StatusCode1 => "Status Code [1]",
            Column::StatusCode2 => "Status Code [2]",
            Column::SummaryReport => "Summary Report",
            Column::CurrentStatus => "Current Status",
            Column::NextPlan => "Next Plan",
            Column::ReportDate => "Report Date",
            Column::OperationDate => "Operation Date",
        }
    }

    pub fn headers() -> Vec<String> {
        Column::ALL.iter().map(|c| c.header().to_string()).collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One normalized well row.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub flag: String,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub aph: Option<String>,
    pub rig_name: Option<String>,
    pub well_name: Option<String>,
    pub well_name_2: Option<String>,
    pub well_type: Option<String>,
    pub location: Option<String>,
    pub spud_date: Option<NaiveDate>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub status_code_1: Option<String>,
    pub status_code_2: Option<String>,
    pub summary_report: Option<String>,
    pub current_status: Option<String>,
    pub next_plan: Option<String>,
    pub report_date: NaiveDate,
    pub operation_date: NaiveDate,
}

impl CanonicalRow {
    pub fn value(&self, column: Column) -> Option<Value> {
        let text = |v: &Option<String>| v.clone().map(Value::Text);
        let date = |v: &Option<NaiveDate>| v.map(Value::Date);
        match column {
            Column::Flag => Some(Value::Text(self.flag.clone())),
            Column::Region => text(&self.region),
            Column::Zone => text(&self.zone),
            Column::Aph => text(&self.aph),
            Column::RigName => text(&self.rig_name),
            Column::WellName => text(&self.well_name),
            Column::WellName2 => text(&self.well_name_2),
            Column::WellType => text(&self.well_type),
            Column::Location => text(&self.location),
            Column::SpudDate => date(&self.spud_date),
            Column::ReleaseDate => date(&self.release_date),
            Column::Status => text(&self.status),
            Column::StatusCode1 => text(&self.status_code_1),
            Column::StatusCode2 => text(&self.status_code_2),
            Column::SummaryReport => text(&self.summary_report),
            Column::CurrentStatus => text(&self.current_status),
            Column::NextPlan => text(&self.next_plan),
            Column::ReportDate => Some(Value::Date(self.report_date)),
            Column::OperationDate => Some(Value::Date(self.operation_date)),
        }
    }

    /// All 19 cells in canonical order.
    pub fn values(&self) -> Vec<Option<Value>> {
        Column::ALL.iter().map(|c| self.value(*c)).collect()
    }

    /// Cells rendered as strings, nulls as empty strings.
    pub fn display_cells(&self) -> Vec<String> {
        self.values()
            .into_iter()
            .map(|v| v.map(|v| v.as_display()).unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn new(rows: Vec<CanonicalRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Latest report date across rows; used to name exported files.
    pub fn report_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.report_date).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_in_contract_order() {
        let headers = Column::headers();
        assert_eq!(headers.len(), 19);
        assert_eq!(headers[0], "Flag");
        assert_eq!(headers[6], "Well Name [2]");
        assert_eq!(headers[18], "Operation Date");
    }

    #[test]
    fn column_serializes_as_snake_case() {
        let yaml = serde_json::to_string(&Column::WellName2).unwrap();
        assert_eq!(yaml, "\"well_name2\"");
    }
}
