use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single extracted or mapped cell.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Text view of the value, `None` when it renders to an empty string.
    pub fn as_text(&self) -> Option<String> {
        let rendered = self.as_display();
        let trimmed = rendered.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Date view of the value; text cells go through [`canonicalize_date`].
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => canonicalize_date(s),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Parses a noisy numeric field such as `"Rp 1.234.567,-"` or `"12.5 m"`.
///
/// Every character other than ASCII digits and `.` is dropped and a trailing
/// `.` is removed. More than one remaining `.` means thousands grouping, so the
/// dots are removed before parsing. Empty or unparsable input yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let kept = kept.trim_end_matches('.');
    if kept.is_empty() {
        return None;
    }
    let candidate = if kept.matches('.').count() > 1 {
        kept.replace('.', "")
    } else {
        kept.to_string()
    };
    candidate.parse::<f64>().ok()
}

/// Parses a cost cell, ignoring any parenthetical annotation after the amount.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let before_paren = raw.split('(').next().unwrap_or_default();
    parse_number(before_paren)
}

const DATE_FORMATS: &[&str] = &[
    "%d %b %Y", "%d %B %Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d",
    "%d-%b-%Y", "%d-%B-%Y", "%b %d, %Y", "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const INDONESIAN_MONTHS: &[(&str, &str)] = &[
    ("januari", "January"),
    ("februari", "February"),
    ("pebruari", "February"),
    ("maret", "March"),
    ("mei", "May"),
    ("juni", "June"),
    ("juli", "July"),
    ("agustus", "August"),
    ("oktober", "October"),
    ("nopember", "November"),
    ("desember", "December"),
    ("agu", "Aug"),
    ("agt", "Aug"),
    ("okt", "Oct"),
    ("nop", "Nov"),
    ("des", "Dec"),
];

fn translate_month_names(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word = String::new();
    let flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        match INDONESIAN_MONTHS.iter().find(|(id, _)| *id == lower) {
            Some((_, en)) => out.push_str(en),
            None => out.push_str(word),
        }
        word.clear();
    };
    for ch in value.chars() {
        if ch.is_alphabetic() {
            word.push(ch);
        } else {
            flush(&mut word, &mut out);
            out.push(ch);
        }
    }
    flush(&mut word, &mut out);
    out
}

/// Turns the date spellings seen across units into one calendar date.
///
/// Unparseable input yields `None`; callers store that as a null cell.
pub fn canonicalize_date(raw: &str) -> Option<NaiveDate> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches('.').trim();
    if trimmed.is_empty() {
        return None;
    }
    let translated = translate_month_names(trimmed);
    for candidate in [trimmed, translated.as_str()] {
        for fmt in DATE_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(candidate, fmt) {
                return Some(parsed);
            }
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(candidate, fmt) {
                return Some(parsed.date());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_number_strips_currency_noise() {
        assert_eq!(parse_number("Rp 1.234.567,-"), Some(1_234_567.0));
        assert_eq!(parse_number("USD 2500000."), Some(2_500_000.0));
        assert_eq!(parse_number("1234.5 m"), Some(1234.5));
    }

    #[test]
    fn parse_number_without_digits_is_null() {
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("..."), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn parse_amount_ignores_parenthetical() {
        assert_eq!(parse_amount("USD 1500000 (75% of AFE 2.000.000)"), Some(1_500_000.0));
        assert_eq!(parse_amount("(tbd)"), None);
    }

    #[test]
    fn canonicalize_date_accepts_unit_formats() {
        let expected = ymd(2025, 12, 28);
        assert_eq!(canonicalize_date("28 Dec 2025"), Some(expected));
        assert_eq!(canonicalize_date("28 December 2025"), Some(expected));
        assert_eq!(canonicalize_date("2025-12-28"), Some(expected));
        assert_eq!(canonicalize_date("28-12-2025"), Some(expected));
        assert_eq!(canonicalize_date("28/12/2025"), Some(expected));
        assert_eq!(canonicalize_date("2025-12-28 00:00:00"), Some(expected));
    }

    #[test]
    fn canonicalize_date_understands_indonesian_months() {
        assert_eq!(canonicalize_date("28 Desember 2025"), Some(ymd(2025, 12, 28)));
        assert_eq!(canonicalize_date("5 Agu 2025"), Some(ymd(2025, 8, 5)));
        assert_eq!(canonicalize_date("1 Mei 2026"), Some(ymd(2026, 5, 1)));
    }

    #[test]
    fn canonicalize_date_degrades_to_none() {
        assert_eq!(canonicalize_date("soon"), None);
        assert_eq!(canonicalize_date("31 Feb 2025"), None);
        assert_eq!(canonicalize_date("   "), None);
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(Value::Number(42.0).as_display(), "42");
        assert_eq!(Value::Number(1.5).as_display(), "1.5");
        assert_eq!(Value::Date(ymd(2026, 1, 2)).as_display(), "2026-01-02");
    }
}
