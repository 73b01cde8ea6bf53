use chrono::NaiveDate;
use passbook_core::{
    Diagnostic, FieldError, Movement, RowLocation, SkipReason, TransactionRecord, parse_amount,
    parse_date,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_statement_cells_to_record() {
    let formats = ["%d-%b-%y", "%d %b %Y"];
    let date = parse_date("14-Mar-24\n(15-Mar-24)", &formats).unwrap();
    let debit = parse_amount("₹ 2,499.5 Dr").unwrap().unwrap();
    let balance = parse_amount("52,310.55 Cr").unwrap();

    let record = TransactionRecord::new(date, "  POS AMAZON  ", Movement::from_signed(debit))
        .unwrap()
        .with_ref_no(Some("  ".into()))
        .with_balance(balance);

    assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    assert_eq!(record.description(), "POS AMAZON");
    assert_eq!(record.ref_no(), None);
    assert_eq!(record.debit(), Some(dec("2499.50")));
    assert_eq!(record.debit().unwrap().to_string(), "2499.50");
    assert_eq!(record.amount(), dec("-2499.50"));
    assert_eq!(record.balance(), Some(dec("52310.55")));
}

#[test]
fn test_field_errors_become_skip_reasons() {
    let err = parse_date("Opening Balance", &["%d-%b-%y"]).unwrap_err();
    assert_eq!(err, FieldError::InvalidDate("Opening Balance".into()));

    let reason = SkipReason::from_date_error(err);
    let diagnostic = Diagnostic::RowSkipped {
        location: RowLocation::table_row(1, 2, 5),
        reason,
    };
    assert_eq!(
        diagnostic.to_string(),
        "skipped page 1, table 2, row 5: unrecognized date 'Opening Balance'"
    );

    let json = serde_json::to_value(&diagnostic).unwrap();
    assert_eq!(json["kind"], "row_skipped");
    assert_eq!(json["reason"]["reason"], "invalid_date");
    assert_eq!(json["location"]["row"], 5);
}
