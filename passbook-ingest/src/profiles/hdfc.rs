//! HDFC Bank account statements: `Date`, `Narration`, `Chq./Ref.No.`,
//! `Value Dt`, `Withdrawal Amt.`, `Deposit Amt.`, `Closing Balance`, with
//! `dd/mm/yy` dates.

use once_cell::sync::Lazy;
use passbook_core::Field;

use super::{BankProfile, generic_aliases};
use crate::headers::AliasTable;

const HDFC_DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%b-%y"];

static HDFC_ALIASES: Lazy<AliasTable> = Lazy::new(|| {
    generic_aliases()
        .clone()
        .with_aliases(Field::RefNo, &["chq./ref.no.", "chq/ref number"])
        .with_aliases(Field::Debit, &["withdrawal amt", "withdrawal amount (inr)"])
        .with_aliases(Field::Credit, &["deposit amt", "deposit amount (inr)"])
});

#[derive(Debug, Default, Clone, Copy)]
pub struct HdfcProfile;

impl HdfcProfile {
    pub fn new() -> Self {
        HdfcProfile
    }
}

impl BankProfile for HdfcProfile {
    fn id(&self) -> &'static str {
        "hdfc"
    }

    fn name(&self) -> &'static str {
        "HDFC Bank"
    }

    fn keywords(&self) -> &[&'static str] {
        &["hdfc bank"]
    }

    fn aliases(&self) -> &AliasTable {
        &HDFC_ALIASES
    }

    fn date_formats(&self) -> &[&'static str] {
        HDFC_DATE_FORMATS
    }
}
