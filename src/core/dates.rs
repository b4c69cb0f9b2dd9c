//! Date parsing for user-entered contract, payment and upload dates.
//!
//! Dates arrive as text from forms and spreadsheet imports. They are parsed once,
//! at ingestion, so the scheduler only ever sees valid calendar dates.

use crate::errors::{Error, Result};
use chrono::NaiveDate;

/// Accepted input formats, tried in order
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a calendar date in `YYYY-MM-DD` or `MM/DD/YYYY` form.
///
/// # Errors
/// Returns [`Error::InvalidDate`] when the value matches neither format.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| Error::InvalidDate {
            value: value.to_string(),
        })
}
