//! Structural failures reported by the parsing core.
//!
//! Field-level problems (a bad number, an unreadable date) never surface here:
//! they degrade to a null cell. Everything in [`ParseError`] is fatal for the
//! whole invocation and names the offending source so the person fixing the
//! report knows which file to open.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no well records found in {origin}")]
    NoRecords { origin: String },

    #[error(
        "could not find a valid sheet in {origin}; expected one of: {}",
        expected.join(", ")
    )]
    SheetNotFound {
        origin: String,
        expected: Vec<String>,
    },

    #[error("missing required columns in {origin}: {missing:?}; available: {available:?}")]
    MissingColumns {
        origin: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("cannot determine report date for {origin}: {reason}")]
    ReportDate { origin: String, reason: String },

    #[error("unit '{unit}' expects a {expected} document but {origin} is a {found} document")]
    WrongInput {
        origin: String,
        unit: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid profile '{unit}': {reason}")]
    InvalidProfile { unit: String, reason: String },

    #[error("failed to read workbook {origin}: {reason}")]
    Workbook { origin: String, reason: String },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
