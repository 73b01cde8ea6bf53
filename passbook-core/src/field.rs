//! Canonical statement columns

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical field a raw column header can resolve to.
///
/// `Amount` is the single signed column some exports use instead of a
/// debit/credit split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Description,
    RefNo,
    Debit,
    Credit,
    Amount,
    Balance,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Date,
        Field::Description,
        Field::RefNo,
        Field::Debit,
        Field::Credit,
        Field::Amount,
        Field::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::RefNo => "ref_no",
            Field::Debit => "debit",
            Field::Credit => "credit",
            Field::Amount => "amount",
            Field::Balance => "balance",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
