//! Workbook access: loading through calamine, sheet selection and the
//! required-column check.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};

use crate::{
    data::Value,
    error::{ParseError, ParseResult},
    profile::{SheetLayout, SheetSelector},
    segment::header_names,
};

/// Rectangular cell grid; row and column 0 are the sheet's A1 corner.
pub type Grid = Vec<Vec<Option<Value>>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub origin: String,
    pub sheets: Vec<(String, Grid)>,
}

impl Workbook {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.sheets.push((name.into(), grid));
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&Grid> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, grid)| grid)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Reads every sheet of an xlsx/xls/xlsb/ods file into memory.
    pub fn open(path: &Path) -> ParseResult<Self> {
        let origin = path.display().to_string();
        let workbook_error = |reason: String| ParseError::Workbook {
            origin: origin.clone(),
            reason,
        };
        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
        let mut loaded = Workbook::new(origin.clone());
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| workbook_error(format!("sheet '{name}': {e}")))?;
            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or_default();
            let mut grid: Grid = vec![Vec::new(); row_offset];
            for row in range.rows() {
                let mut cells = vec![None; col_offset];
                cells.extend(row.iter().map(cell_value));
                grid.push(cells);
            }
            debug!("Loaded sheet '{name}' with {} row(s)", grid.len());
            loaded.sheets.push((name, grid));
        }
        info!("Opened workbook {origin} ({} sheet(s))", loaded.sheets.len());
        Ok(loaded)
    }
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::text(s.as_str()))
        }
        Data::Int(i) => Some(Value::Number(*i as f64)),
        Data::Float(f) => Some(Value::Number(*f)),
        Data::Bool(b) => Some(Value::text(b.to_string())),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell.as_date().map(Value::Date),
        Data::DurationIso(s) => Some(Value::text(s.as_str())),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Sheet names to try, in order, for a selector and report date.
pub fn candidate_sheet_names(
    selector: &SheetSelector,
    report_date: Option<NaiveDate>,
) -> Vec<String> {
    match selector {
        SheetSelector::Name { name } => vec![name.clone()],
        SheetSelector::ReportDate { patterns } => {
            let Some(date) = report_date else {
                return Vec::new();
            };
            let mut names: Vec<String> = Vec::new();
            for pattern in patterns {
                let name = date.format(pattern).to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            names
        }
    }
}

/// Picks the first candidate sheet present in the workbook.
pub fn select_sheet<'w>(
    workbook: &'w Workbook,
    selector: &SheetSelector,
    report_date: Option<NaiveDate>,
) -> ParseResult<(&'w str, &'w Grid)> {
    let candidates = candidate_sheet_names(selector, report_date);
    candidates
        .iter()
        .find_map(|name| {
            workbook
                .sheets
                .iter()
                .find(|(sheet, _)| sheet == name)
                .map(|(sheet, grid)| (sheet.as_str(), grid))
        })
        .ok_or_else(|| ParseError::SheetNotFound {
            origin: workbook.origin.clone(),
            expected: candidates.clone(),
        })
}

/// Verifies the header row carries every required column (and the zone
/// filter column); returns the trimmed headers.
pub fn check_columns(origin: &str, grid: &Grid, layout: &SheetLayout) -> ParseResult<Vec<String>> {
    let headers = header_names(grid, layout.header_row);
    let missing: Vec<String> = layout
        .required_columns
        .iter()
        .chain(layout.zone_filter.iter().map(|f| &f.column))
        .filter(|required| !headers.iter().any(|h| h == *required))
        .unique()
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(headers)
    } else {
        Err(ParseError::MissingColumns {
            origin: origin.to_string(),
            missing,
            available: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        })
    }
}
