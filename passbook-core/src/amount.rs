//! Amount cell coercion.
//!
//! Statement cells arrive as loosely formatted text: `"1,234.56"`,
//! `"₹ 500.00 Cr"`, `"(12.00)"`, `"-"`. [`parse_amount`] turns them into a
//! signed [`Decimal`] or reports why it could not.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::FieldError;

static CURRENCY_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(₹|\$|€|£|\binr\b|\brs\.?)").expect("valid currency regex"));

/// Cells statements use to mean "nothing in this column".
const PLACEHOLDERS: &[&str] = &["-", "--", "–", "—"];

/// Parse an amount cell.
///
/// Blank cells (and lone dashes) are `Ok(None)`, never zero. Thousands
/// separators and currency markers are dropped; a trailing `Dr`, a trailing
/// minus, or surrounding parentheses make the value negative, a trailing `Cr`
/// keeps it positive.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed) {
        return Ok(None);
    }

    let invalid = || FieldError::InvalidAmount(trimmed.to_string());

    let mut s = CURRENCY_MARKERS.replace_all(trimmed, "").into_owned();
    s.retain(|c| c != ',' && !c.is_whitespace());

    let mut negative = false;
    let lower = s.to_ascii_lowercase();
    if lower.ends_with("dr") {
        negative = true;
        s.truncate(s.len() - 2);
    } else if lower.ends_with("cr") {
        s.truncate(s.len() - 2);
    }

    if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        negative = !negative;
        s = s[1..s.len() - 1].to_string();
    }

    if s.len() > 1 && s.ends_with('-') {
        negative = !negative;
        s.pop();
    }

    if s.is_empty() {
        return Err(invalid());
    }

    let value = Decimal::from_str(&s).map_err(|_| invalid())?;
    Ok(Some(if negative { -value } else { value }))
}
