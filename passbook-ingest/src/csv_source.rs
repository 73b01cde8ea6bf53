//! CSV statement exports.
//!
//! The first record is the header and must resolve through the profile's
//! alias table. The file must be rectangular: a ragged row means the file is
//! not the kind of export we understand, so the whole input is rejected
//! rather than guessed at.

use passbook_core::{ParseError, RowLocation};
use tracing::debug;

use crate::normalize::{TableOutcome, normalize_rows};
use crate::profiles::BankProfile;

/// UTF-8 text of the upload, without a leading byte-order mark.
pub fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::MalformedInput(format!("not valid UTF-8: {e}")))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Parse a CSV export with `profile`'s aliases and row rules.
pub fn parse_csv(bytes: &[u8], profile: &dyn BankProfile) -> Result<TableOutcome, ParseError> {
    let text = decode(bytes)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(result) => result.map_err(malformed)?,
        None => return Err(ParseError::MalformedInput("no header row".into())),
    };
    if header.len() < 2 {
        return Err(ParseError::MalformedInput(format!(
            "expected at least two columns, found {}",
            header.len()
        )));
    }

    let header_cells: Vec<&str> = header.iter().collect();
    let Some(map) = profile.aliases().resolve(&header_cells) else {
        return Err(ParseError::MalformedInput(format!(
            "unrecognized header row: {}",
            header_cells.join(",")
        )));
    };
    debug!(columns = header.len(), fields = map.len(), "resolved csv header");

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(malformed)?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        rows.push((line, record.iter().map(str::to_string).collect::<Vec<_>>()));
    }

    let mut outcome = TableOutcome::default();
    normalize_rows(
        profile,
        &map,
        rows.iter().map(|(line, cells)| (*line, cells)),
        RowLocation::csv_line,
        &mut outcome,
    );
    Ok(outcome)
}

fn malformed(err: csv::Error) -> ParseError {
    ParseError::MalformedInput(err.to_string())
}
