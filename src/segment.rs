//! Splits documents into per-well [`RawRecord`]s.
//!
//! Text memos are cut on a numbering convention with optional grouping
//! headers; spreadsheet grids yield one record per data row below the header.

use std::collections::HashSet;

use log::debug;
use regex::Regex;

use crate::{
    data::Value,
    profile::{SheetLayout, TextLayout},
    sheet::Grid,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// Opening-line remainder plus the body lines that followed it.
    Lines {
        description: String,
        lines: Vec<String>,
    },
    /// One spreadsheet row keyed by trimmed header.
    Row(Vec<(String, Option<Value>)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub number: u32,
    pub group: Option<String>,
    pub span: Span,
}

/// Compiled boundary rules of a [`TextLayout`].
#[derive(Debug, Clone)]
pub struct TextRules {
    record: Regex,
    group: Option<Regex>,
    require_group: bool,
    require_description: bool,
    terminators: Vec<String>,
    truncate_at: Option<Regex>,
    strip_chars: Vec<char>,
}

impl TextRules {
    pub fn compile(layout: &TextLayout) -> Result<Self, regex::Error> {
        let group = layout.group_pattern.as_deref().map(Regex::new).transpose()?;
        let truncate_at = layout
            .truncate_at
            .as_deref()
            .map(|marker| Regex::new(&format!("(?i){}", regex::escape(marker))))
            .transpose()?;
        Ok(Self {
            record: Regex::new(&layout.record_pattern)?,
            group,
            require_group: layout.require_group,
            require_description: layout.require_description,
            terminators: layout.terminators.clone(),
            truncate_at,
            strip_chars: layout.strip_chars.chars().collect(),
        })
    }

    /// Applies truncation and decoration stripping; every line comes back trimmed.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        let body = match self.truncate_at.as_ref().and_then(|re| re.find(text)) {
            Some(found) => &text[..found.start()],
            None => text,
        };
        body.lines()
            .map(|line| {
                let kept: String = if self.strip_chars.is_empty() {
                    line.to_string()
                } else {
                    line.chars().filter(|c| !self.strip_chars.contains(c)).collect()
                };
                kept.trim().to_string()
            })
            .collect()
    }

    fn is_terminator(&self, line: &str) -> bool {
        self.terminators.iter().any(|t| line.starts_with(t.as_str()))
    }
}

struct Pending {
    number: u32,
    group: Option<String>,
    description: String,
    lines: Vec<String>,
}

impl Pending {
    fn finish(self) -> RawRecord {
        RawRecord {
            number: self.number,
            group: self.group,
            span: Span::Lines {
                description: self.description,
                lines: self.lines,
            },
        }
    }
}

/// Lazy iterator over the records of one text document.
pub struct TextRecords<'r> {
    rules: &'r TextRules,
    lines: std::vec::IntoIter<String>,
    group: Option<String>,
    current: Option<Pending>,
    skipping: bool,
}

impl Iterator for TextRecords<'_> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        loop {
            let Some(line) = self.lines.next() else {
                return self.current.take().map(Pending::finish);
            };

            if let Some(caps) = self.rules.group.as_ref().and_then(|re| re.captures(&line)) {
                let label = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
                self.group = Some(label);
                self.skipping = false;
                if let Some(done) = self.current.take() {
                    return Some(done.finish());
                }
                continue;
            }

            if let Some((number, description)) = self.boundary(&line) {
                self.skipping = false;
                let next = if self.rules.require_group && self.group.is_none() {
                    debug!("Ignoring record {number} that precedes any group header");
                    None
                } else if self.rules.require_description && description.is_empty() {
                    debug!("Ignoring record {number} without a description");
                    None
                } else {
                    Some(Pending {
                        number,
                        group: self.group.clone(),
                        description,
                        lines: Vec::new(),
                    })
                };
                if let Some(done) = std::mem::replace(&mut self.current, next) {
                    return Some(done.finish());
                }
                continue;
            }

            if self.rules.is_terminator(&line) {
                self.skipping = true;
                if let Some(done) = self.current.take() {
                    return Some(done.finish());
                }
                continue;
            }

            if self.skipping {
                continue;
            }
            if let Some(current) = self.current.as_mut() {
                current.lines.push(line);
            }
        }
    }
}

impl TextRecords<'_> {
    fn boundary(&self, line: &str) -> Option<(u32, String)> {
        let caps = self.rules.record.captures(line)?;
        let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let description = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        Some((number, description))
    }
}

pub fn segment_text<'r>(text: &str, rules: &'r TextRules) -> TextRecords<'r> {
    TextRecords {
        rules,
        lines: rules.preprocess(text).into_iter(),
        group: None,
        current: None,
        skipping: false,
    }
}

/// Trimmed header names of the row at `header_row`; unnamed cells become "".
pub fn header_names(grid: &Grid, header_row: usize) -> Vec<String> {
    grid.get(header_row)
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_ref().and_then(Value::as_text).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

/// Yields one record per data row whose zone column is in the allow-list.
pub fn segment_rows<'g>(
    grid: &'g Grid,
    layout: &'g SheetLayout,
) -> impl Iterator<Item = RawRecord> + 'g {
    let headers = header_names(grid, layout.header_row);
    let filter = layout.zone_filter.as_ref().map(|filter| {
        let index = headers.iter().position(|h| h == &filter.column);
        let allowed: HashSet<String> = filter.values.iter().cloned().collect();
        (index, allowed)
    });

    grid.iter()
        .skip(layout.header_row + 1)
        .enumerate()
        .filter_map(move |(offset, row)| {
            if row.iter().all(Option::is_none) {
                return None;
            }
            if let Some((index, allowed)) = &filter {
                let zone = index
                    .and_then(|i| row.get(i))
                    .and_then(|cell| cell.as_ref())
                    .and_then(Value::as_text);
                match zone {
                    Some(zone) if allowed.contains(&zone) => {}
                    other => {
                        debug!("Skipping row {} outside zone filter: {other:?}", offset + 1);
                        return None;
                    }
                }
            }
            let cells = headers
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(i, name)| (name.clone(), row.get(i).cloned().flatten()))
                .collect();
            Some(RawRecord {
                number: (offset + 1) as u32,
                group: None,
                span: Span::Row(cells),
            })
        })
}
