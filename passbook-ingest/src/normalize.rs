//! Table normalization with header continuity.
//!
//! Statements split one logical table across pages and usually print the
//! header only on the first. [`normalize_table`] takes the last header seen
//! (the [`HeaderCarry`]) and returns the one to use for the next table, so the
//! per-document loop is a plain fold.

use passbook_core::{Diagnostic, RowLocation, SkipReason, TransactionRecord};
use tracing::{debug, warn};

use crate::headers::{HeaderMap, MappedRow};
use crate::profiles::BankProfile;
use crate::table::{ColumnSpan, RawTable};

/// Last header that resolved in this document, with the column geometry of
/// the table it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderCarry {
    current: Option<CarriedHeader>,
}

#[derive(Debug, Clone, PartialEq)]
struct CarriedHeader {
    header: HeaderMap,
    columns: Vec<ColumnSpan>,
}

impl HeaderCarry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> Option<&HeaderMap> {
        self.current.as_ref().map(|c| &c.header)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// Records and diagnostics produced by one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOutcome {
    pub records: Vec<TransactionRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TableOutcome {
    pub fn extend(&mut self, other: TableOutcome) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Normalize one table.
///
/// * first row resolves as a header: the remaining rows are data and the
///   header becomes the new carry;
/// * otherwise, with a carried header: every row is data, after the table is
///   realigned onto the carried column layout;
/// * otherwise the table is skipped with a [`Diagnostic::TableSkipped`].
pub fn normalize_table(
    profile: &dyn BankProfile,
    table: &RawTable,
    carry: HeaderCarry,
) -> (TableOutcome, HeaderCarry) {
    let mut outcome = TableOutcome::default();
    let Some(first) = table.rows.first() else {
        return (outcome, carry);
    };
    let locate = |row| RowLocation::table_row(table.page, table.index, row);

    if let Some(header) = profile.aliases().resolve(first.as_slice()) {
        debug!(
            page = table.page,
            table = table.index,
            fields = header.len(),
            "resolved header"
        );
        let rows = table.rows[1..].iter().enumerate().map(|(i, row)| (i + 2, row));
        normalize_rows(profile, &header, rows, locate, &mut outcome);

        let carry = HeaderCarry {
            current: Some(CarriedHeader {
                header,
                columns: table.columns.clone(),
            }),
        };
        return (outcome, carry);
    }

    match &carry.current {
        Some(carried) => {
            debug!(page = table.page, table = table.index, "reusing previous header");
            outcome.diagnostics.push(Diagnostic::HeaderCarried {
                page: table.page,
                table: table.index,
            });
            let aligned = table.realign(&carried.columns);
            let rows = aligned.rows.iter().enumerate().map(|(i, row)| (i + 1, row));
            normalize_rows(profile, &carried.header, rows, locate, &mut outcome);
        }
        None => {
            warn!(
                page = table.page,
                table = table.index,
                "table has no recognizable header and none to reuse, skipping"
            );
            outcome.diagnostics.push(Diagnostic::TableSkipped {
                page: table.page,
                table: table.index,
                first_row: first.clone(),
            });
        }
    }
    (outcome, carry)
}

/// Normalize numbered data rows against `header`. Blank rows are dropped
/// silently; every other rejected row becomes a [`Diagnostic::RowSkipped`].
pub fn normalize_rows<'a, I, L>(
    profile: &dyn BankProfile,
    header: &HeaderMap,
    rows: I,
    locate: L,
    outcome: &mut TableOutcome,
) where
    I: IntoIterator<Item = (usize, &'a Vec<String>)>,
    L: Fn(usize) -> RowLocation,
{
    for (number, cells) in rows {
        match profile.normalize_row(&MappedRow::new(cells, header)) {
            Ok(record) => outcome.records.push(record),
            Err(SkipReason::BlankRow) => {}
            Err(reason) => {
                let location = locate(number);
                debug!(%location, %reason, "skipping row");
                outcome.diagnostics.push(Diagnostic::RowSkipped { location, reason });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{GenericProfile, SbiProfile};
    use passbook_core::Field;

    fn table(page: usize, rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            page,
            1,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_header_then_continuation() {
        let first = table(
            1,
            &[
                &["Date", "Description", "Debit", "Credit", "Balance"],
                &["2024-01-01", "Opening deposit", "", "1,000.00", "1,000.00"],
                &["2024-01-03", "Coffee", "120.00", "", "880.00"],
            ],
        );
        let second = table(
            2,
            &[
                &["2024-01-04", "Rent", "500.00", "", "380.00"],
                &["", "", "", "", ""],
                &["2024-01-05", "Refund", "", "20.00", "400.00"],
            ],
        );

        let (out1, carry) = normalize_table(&GenericProfile, &first, HeaderCarry::new());
        assert_eq!(out1.records.len(), 2);
        assert!(out1.diagnostics.is_empty());
        assert_eq!(carry.header().unwrap().index(Field::Credit), Some(3));

        let (out2, carry) = normalize_table(&GenericProfile, &second, carry);
        assert_eq!(out2.records.len(), 2);
        assert_eq!(out2.records[0].description(), "Rent");
        assert_eq!(
            out2.diagnostics,
            [Diagnostic::HeaderCarried { page: 2, table: 1 }]
        );
        assert!(!carry.is_empty());
    }

    #[test]
    fn test_no_header_and_no_carry_skips_table() {
        let orphan = table(1, &[&["01-Jan-24", "ATM", "100.00"]]);
        let (out, carry) = normalize_table(&GenericProfile, &orphan, HeaderCarry::new());
        assert!(out.records.is_empty());
        assert!(carry.is_empty());
        assert!(matches!(
            &out.diagnostics[..],
            [Diagnostic::TableSkipped { page: 1, table: 1, first_row }] if first_row[0] == "01-Jan-24"
        ));
    }

    #[test]
    fn test_new_header_replaces_carry() {
        let a = table(1, &[&["Date", "Narration", "Amount"], &["2024-01-01", "A", "5"]]);
        let b = table(
            2,
            &[&["Txn Date", "Description", "Withdrawal", "Deposit"], &["2024-01-02", "B", "", "7"]],
        );
        let (_, carry) = normalize_table(&GenericProfile, &a, HeaderCarry::new());
        let (out, carry) = normalize_table(&GenericProfile, &b, carry);
        assert_eq!(out.records[0].amount().to_string(), "7.00");
        assert_eq!(carry.header().unwrap().index(Field::Credit), Some(3));
        assert!(!carry.header().unwrap().contains(Field::Amount));
    }

    #[test]
    fn test_row_diagnostics_are_numbered() {
        let t = table(
            3,
            &[
                &["Txn Date", "Description", "Ref No./Cheque No.", "Debit", "Credit", "Balance"],
                &["01-Jan-24", "Salary", "", "", "50,000.00", "50,000.00"],
                &["02-Jan-24", "Balance B/F", "", "", "", ""],
            ],
        );
        let (out, _) = normalize_table(&SbiProfile, &t, HeaderCarry::new());
        assert_eq!(out.records.len(), 1);
        assert_eq!(
            out.diagnostics,
            [Diagnostic::RowSkipped {
                location: RowLocation::table_row(3, 1, 3),
                reason: SkipReason::MissingAmount,
            }]
        );
    }
}
