//! Date cell coercion

use chrono::NaiveDate;

use crate::error::FieldError;

/// First non-blank line of a (possibly multi-line) cell, trimmed.
///
/// PDF tables often stack the value date under the transaction date in one
/// cell; only the first line is a date candidate.
pub fn first_line(cell: &str) -> &str {
    cell.trim().lines().next().map(str::trim).unwrap_or("")
}

/// Parse a date cell against `formats`, tried in order.
///
/// List two-digit-year formats (`%y`) before their four-digit twins: chrono's
/// `%Y` accepts short years, so `"01/02/24"` would otherwise become year 24.
pub fn parse_date(cell: &str, formats: &[&str]) -> Result<NaiveDate, FieldError> {
    let candidate = first_line(cell);
    if candidate.is_empty() {
        return Err(FieldError::EmptyDate);
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
        .ok_or_else(|| FieldError::InvalidDate(candidate.to_string()))
}
