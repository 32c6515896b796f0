//! Writers for the canonical and raw tables: xlsx, csv, json and the
//! clipboard block.

use std::{io::Write, path::Path};

use anyhow::{Context, Result, anyhow};
use chrono::Datelike;
use csv::QuoteStyle;
use log::info;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    cli::ExportFormat,
    data::Value,
    extract::RawTable,
    io_utils::{is_dash, open_writer},
    schema::{CanonicalRow, CanonicalTable, Column},
};

pub const CLIPBOARD_START: &str = "CLIPBOARD_DATA_START";
pub const CLIPBOARD_END: &str = "CLIPBOARD_DATA_END";

const SHEET_NAME: &str = "Report";

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// A header row plus typed cells in header order.
pub trait Tabular {
    fn headers(&self) -> Vec<String>;
    fn records(&self) -> Vec<Vec<Option<Value>>>;
    fn row_count(&self) -> usize;
}

impl Tabular for CanonicalTable {
    fn headers(&self) -> Vec<String> {
        Column::headers()
    }

    fn records(&self) -> Vec<Vec<Option<Value>>> {
        self.rows.iter().map(CanonicalRow::values).collect()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

impl Tabular for RawTable {
    fn headers(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn records(&self) -> Vec<Vec<Option<Value>>> {
        self.cells()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

fn display_cells(cells: &[Option<Value>]) -> Vec<String> {
    cells
        .iter()
        .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
        .collect()
}

/// One JSON object per row, keys in header order.
struct JsonRecord<'a> {
    headers: &'a [String],
    cells: &'a [Option<Value>],
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// `YYYY-MM-DD.<ext>` named after the table's report date.
pub fn default_file_name(table: &CanonicalTable, format: ExportFormat) -> Option<String> {
    table
        .report_date()
        .map(|date| format!("{}.{}", date.format("%Y-%m-%d"), format.extension()))
}

/// Writes `table` to `destination`; csv and json go to stdout when no
/// destination (or `-`) is given.
pub fn export<T: Tabular>(
    table: &T,
    format: ExportFormat,
    destination: Option<&Path>,
) -> Result<()> {
    let path = destination.filter(|p| !is_dash(p));
    match (format, path) {
        (ExportFormat::Xlsx, Some(path)) => write_xlsx(table, path)?,
        (ExportFormat::Xlsx, None) => {
            return Err(anyhow!("xlsx output requires an output path (-o)"));
        }
        (ExportFormat::Csv, _) => write_csv(table, open_writer(path)?)?,
        (ExportFormat::Json, _) => write_json(table, open_writer(path)?)?,
    }
    if let Some(path) = path {
        info!("Wrote {} row(s) to {path:?}", table.row_count());
    }
    Ok(())
}

pub fn write_xlsx<T: Tabular>(table: &T, path: &Path) -> Result<()> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    for (idx, cells) in table.records().into_iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, value) in cells.into_iter().enumerate() {
            let col = col as u16;
            match value {
                Some(Value::Text(text)) => {
                    sheet.write_string(row_num, col, text)?;
                }
                Some(Value::Number(number)) => {
                    sheet.write_number(row_num, col, number)?;
                }
                Some(Value::Date(date)) => {
                    let cell = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )?;
                    sheet.write_datetime_with_format(row_num, col, &cell, &date_format)?;
                }
                None => {}
            }
        }
    }
    sheet.autofit();
    workbook
        .save(path)
        .with_context(|| format!("Writing workbook {path:?}"))?;
    Ok(())
}

pub fn write_csv<T: Tabular, W: Write>(table: &T, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer
        .write_record(table.headers())
        .context("Writing CSV header")?;
    for cells in table.records() {
        writer
            .write_record(display_cells(&cells))
            .context("Writing CSV row")?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

pub fn write_json<T: Tabular, W: Write>(table: &T, mut writer: W) -> Result<()> {
    let headers = table.headers();
    let records = table.records();
    let rows: Vec<JsonRecord> = records
        .iter()
        .map(|cells| JsonRecord {
            headers: &headers,
            cells,
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &rows).context("Serializing rows to JSON")?;
    writeln!(writer).context("Writing JSON output")?;
    writer.flush().context("Flushing JSON output")?;
    Ok(())
}

/// Tab-separated, header-free rows in table order, framed by the sentinel
/// lines a scraping caller looks for.
pub fn clipboard_block<T: Tabular>(table: &T) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    for cells in table.records() {
        writer
            .write_record(display_cells(&cells))
            .context("Writing clipboard row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Finishing clipboard data: {e}"))?;
    let body = String::from_utf8(bytes).context("Clipboard data is not UTF-8")?;
    Ok(format!("{CLIPBOARD_START}\n{body}{CLIPBOARD_END}\n"))
}
