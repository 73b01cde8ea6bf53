//! Generic profile: the broad alias table and row rules every other bank
//! profile starts from.

use once_cell::sync::Lazy;
use passbook_core::{
    Field, Movement, SkipReason, TransactionRecord, parse_amount, parse_date,
};
use rust_decimal::Decimal;

use super::BankProfile;
use crate::headers::{AliasTable, MappedRow, Requirement};

/// Day-first before month-first: `01/02/2024` is the 1st of February.
pub const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %b %y",
    "%d %b %Y",
    "%d.%m.%Y",
];

static GENERIC_ALIASES: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::new(
        Requirement::new()
            .field(Field::Date)
            .field(Field::Description)
            .any_of(&[Field::Debit, Field::Credit, Field::Amount]),
    )
    .with_aliases(
        Field::Date,
        &[
            "date",
            "txn date",
            "transaction date",
            "tran date",
            "value date",
            "date (value date)",
            "posting date",
            "post date",
            "transaction\n date",
            "date value",
        ],
    )
    .with_aliases(
        Field::Description,
        &[
            "description",
            "narration",
            "particulars",
            "transaction details",
            "details",
            "narration/description",
            "transaction\nparticulars",
            "remarks",
        ],
    )
    .with_aliases(
        Field::RefNo,
        &[
            "ref_no",
            "ref/chequeno.",
            "ref/cheque no.",
            "ref no./cheque no.",
            "ref no",
            "ref",
            "cheque no.",
            "cheque no",
            "chq/ref no",
            "instrument no",
            "transaction id",
            "utr no",
            "reference no",
            "utr/reference no",
            "ref. no",
            "reference",
        ],
    )
    .with_aliases(
        Field::Debit,
        &[
            "debit",
            "withdrawal",
            "withdrawals",
            "withdrawn",
            "dr",
            "amount withdrawn",
            "debit amount",
            "debit\namount",
            "withdrawal amount",
            "withdrawal amt.",
        ],
    )
    .with_aliases(
        Field::Credit,
        &[
            "credit",
            "deposit",
            "deposits",
            "cr",
            "amount deposited",
            "credit amount",
            "credit\namount",
            "deposit amount",
            "deposit amt.",
        ],
    )
    .with_aliases(
        Field::Amount,
        &["amount", "transaction amount", "amount (inr)", "amt"],
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
            "balance (inr)",
        ],
    )
});

pub fn generic_aliases() -> &'static AliasTable {
    &GENERIC_ALIASES
}

/// Fallback used when no registered bank matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericProfile;

impl BankProfile for GenericProfile {
    fn id(&self) -> &'static str {
        "generic"
    }

    fn name(&self) -> &'static str {
        "Generic statement"
    }

    fn keywords(&self) -> &[&'static str] {
        &[]
    }

    fn aliases(&self) -> &AliasTable {
        generic_aliases()
    }
}

/// Turn one mapped row into a record.
///
/// Skips (with a reason) blank rows, rows without a parseable date or a
/// description, rows with no amount at all, and rows whose amount cells hold
/// text that is not a number.
pub fn normalize_row(
    row: &MappedRow<'_>,
    date_formats: &[&str],
) -> Result<TransactionRecord, SkipReason> {
    if row.is_blank() {
        return Err(SkipReason::BlankRow);
    }

    let date = parse_date(row.cell(Field::Date), date_formats)
        .map_err(SkipReason::from_date_error)?;
    let movement = movement(row)?;
    let balance = amount_cell(row, Field::Balance)?;
    let description = join_lines(row.cell(Field::Description));
    let ref_no = join_lines(row.cell(Field::RefNo));

    Ok(TransactionRecord::new(date, description, movement)?
        .with_ref_no(Some(ref_no))
        .with_balance(balance))
}

/// Debit/credit split first; a signed `amount` column only when both are
/// empty. Zeros are dropped when both split cells are filled, so a `0.00`
/// placeholder does not make a row look conflicting.
pub fn movement(row: &MappedRow<'_>) -> Result<Movement, SkipReason> {
    let debit = amount_cell(row, Field::Debit)?.map(|d| d.abs());
    let credit = amount_cell(row, Field::Credit)?.map(|c| c.abs());

    let (debit, credit) = match (debit, credit) {
        (Some(d), Some(c)) => (non_zero(d), non_zero(c)),
        other => other,
    };

    match (debit, credit) {
        (Some(debit), Some(credit)) => Err(SkipReason::ConflictingAmounts { debit, credit }),
        (Some(d), None) => Ok(Movement::Debit(d)),
        (None, Some(c)) => Ok(Movement::Credit(c)),
        (None, None) => amount_cell(row, Field::Amount)?
            .map(Movement::from_signed)
            .ok_or(SkipReason::MissingAmount),
    }
}

pub fn amount_cell(row: &MappedRow<'_>, field: Field) -> Result<Option<Decimal>, SkipReason> {
    parse_amount(row.cell(field)).map_err(|e| SkipReason::from_amount_error(field, e))
}

fn non_zero(value: Decimal) -> Option<Decimal> {
    (!value.is_zero()).then_some(value)
}

/// Collapse a wrapped cell onto one line.
pub fn join_lines(cell: &str) -> String {
    cell.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
