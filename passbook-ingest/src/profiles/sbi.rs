//! State Bank of India account statements.
//!
//! SBI tables carry all six columns (`Txn Date`, `Description`,
//! `Ref No./Cheque No.`, `Debit`, `Credit`, `Balance`) and write dates as
//! `01-Jan-24` or `1 Jan 2024`. Continuation pages repeat the table without
//! its header row.

use once_cell::sync::Lazy;
use passbook_core::{Field, SkipReason, TransactionRecord};

use super::{BankProfile, generic};
use crate::headers::{AliasTable, MappedRow, Requirement};

const SBI_DATE_FORMATS: &[&str] = &["%d-%b-%y", "%d-%b-%Y", "%d %b %y", "%d %b %Y"];

static SBI_ALIASES: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::new(Requirement::all_of(&[
        Field::Date,
        Field::Description,
        Field::RefNo,
        Field::Debit,
        Field::Credit,
        Field::Balance,
    ]))
    .with_aliases(
        Field::Date,
        &[
            "date",
            "txn date",
            "transaction date",
            "value date",
            "date(value date)",
            "date (value date)",
            "posting date",
            "date\n(value date)",
            "transaction\n date",
            "date value",
        ],
    )
    .with_aliases(
        Field::Description,
        &[
            "narration",
            "description",
            "particulars",
            "transaction details",
            "details",
            "narration/description",
            "transaction\nparticulars",
        ],
    )
    .with_aliases(
        Field::RefNo,
        &[
            "ref/chequeno.",
            "ref/cheque no.",
            "ref no./cheque no.",
            "ref no",
            "ref",
            "cheque no.",
            "cheque no",
            "instrument no",
            "transaction id",
            "utr no",
            "reference no",
            "utr/reference no",
            "ref. no",
        ],
    )
    .with_aliases(
        Field::Debit,
        &[
            "debit",
            "withdrawal",
            "withdrawn",
            "dr",
            "amount withdrawn",
            "debit amount",
            "debit\namount",
            "withdrawal amount",
        ],
    )
    .with_aliases(
        Field::Credit,
        &[
            "credit",
            "deposit",
            "cr",
            "amount deposited",
            "credit amount",
            "credit\namount",
        ],
    )
    .with_aliases(
        Field::Balance,
        &[
            "balance",
            "available balance",
            "closing balance",
            "balanceamount",
            "running balance",
            "balance\namount",
            "available\nbalance",
        ],
    )
});

#[derive(Debug, Default, Clone, Copy)]
pub struct SbiProfile;

impl SbiProfile {
    pub fn new() -> Self {
        SbiProfile
    }
}

impl BankProfile for SbiProfile {
    fn id(&self) -> &'static str {
        "sbi"
    }

    fn name(&self) -> &'static str {
        "State Bank of India"
    }

    fn keywords(&self) -> &[&'static str] {
        &["state bank of india", "sbi"]
    }

    fn aliases(&self) -> &AliasTable {
        &SBI_ALIASES
    }

    fn date_formats(&self) -> &[&'static str] {
        SBI_DATE_FORMATS
    }

    /// Every SBI row carries a running balance; a row without one is a
    /// carried-forward or summary line, not a transaction.
    fn normalize_row(&self, row: &MappedRow<'_>) -> Result<TransactionRecord, SkipReason> {
        let record = generic::normalize_row(row, self.date_formats())?;
        if record.balance().is_none() {
            return Err(SkipReason::MissingBalance);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &[&str] = &[
        "Txn Date",
        "Value\nDate",
        "Description",
        "Ref No./Cheque\nNo.",
        "Debit",
        "Credit",
        "Balance",
    ];

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_requires_all_six_columns() {
        let map = SbiProfile.aliases().resolve(HEADER).unwrap();
        assert_eq!(map.index(Field::Date), Some(0));
        assert_eq!(map.index(Field::Description), Some(2));
        assert_eq!(map.index(Field::RefNo), Some(3));
        assert_eq!(map.index(Field::Balance), Some(6));

        assert!(SbiProfile
            .aliases()
            .resolve(&["Date", "Description", "Debit", "Credit", "Balance"])
            .is_none());
    }

    #[test]
    fn test_row_rules() {
        let map = SbiProfile.aliases().resolve(HEADER).unwrap();
        let ok = cells(&[
            "03-Feb-24\n(03-Feb-24)",
            "03-Feb-24",
            "TO TRANSFER-UPI/DR/4031/ACME",
            "TRANSFER TO 4897",
            "1,200.00",
            "",
            "18,800.00",
        ]);
        let record = SbiProfile.normalize_row(&MappedRow::new(&ok, &map)).unwrap();
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(record.ref_no(), Some("TRANSFER TO 4897"));
        assert!(record.is_debit());

        let no_balance = cells(&["03-Feb-24", "", "B/F", "", "", "10.00", ""]);
        assert_eq!(
            SbiProfile
                .normalize_row(&MappedRow::new(&no_balance, &map))
                .unwrap_err(),
            SkipReason::MissingBalance
        );

        let iso = cells(&["2024-02-03", "", "X", "", "1.00", "", "2.00"]);
        assert!(matches!(
            SbiProfile.normalize_row(&MappedRow::new(&iso, &map)),
            Err(SkipReason::InvalidDate { .. })
        ));
    }
}
