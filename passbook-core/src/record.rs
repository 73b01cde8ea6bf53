//! Normalized transaction record

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::diagnostics::SkipReason;

/// Direction and magnitude of money moving through the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Movement {
    Debit(Decimal),
    Credit(Decimal),
}

impl Movement {
    /// Negative amounts are debits, everything else a credit.
    pub fn from_signed(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Movement::Debit(amount.abs())
        } else {
            Movement::Credit(amount.abs())
        }
    }

    pub fn signed(&self) -> Decimal {
        match self {
            Movement::Debit(v) => -*v,
            Movement::Credit(v) => *v,
        }
    }
}

/// One normalized line item extracted from a statement.
///
/// Money fields are fixed at two fractional digits. `debit` and `credit` are
/// non-negative and never both set. Records only come out of
/// [`TransactionRecord::new`], so they serialize but do not deserialize:
///
/// ```compile_fail
/// let json = r#"{"date":"2024-01-01","description":"","ref_no":null,
///     "debit":"1.005","credit":"2","balance":null}"#;
/// let _: passbook_core::TransactionRecord = serde_json::from_str(json).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    date: NaiveDate,
    description: String,
    ref_no: Option<String>,
    debit: Option<Decimal>,
    credit: Option<Decimal>,
    balance: Option<Decimal>,
}

impl TransactionRecord {
    /// Build a record. Fails only when the description is blank.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        movement: Movement,
    ) -> Result<Self, SkipReason> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(SkipReason::MissingDescription);
        }

        let (debit, credit) = match movement {
            Movement::Debit(v) => (Some(to_fixed(v.abs())), None),
            Movement::Credit(v) => (None, Some(to_fixed(v.abs()))),
        };

        Ok(Self {
            date,
            description,
            ref_no: None,
            debit,
            credit,
            balance: None,
        })
    }

    /// Attach a reference/cheque number; blank values are dropped.
    pub fn with_ref_no(mut self, ref_no: Option<String>) -> Self {
        self.ref_no = ref_no
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        self
    }

    pub fn with_balance(mut self, balance: Option<Decimal>) -> Self {
        self.balance = balance.map(to_fixed);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ref_no(&self) -> Option<&str> {
        self.ref_no.as_deref()
    }

    pub fn debit(&self) -> Option<Decimal> {
        self.debit
    }

    pub fn credit(&self) -> Option<Decimal> {
        self.credit
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn movement(&self) -> Movement {
        match (self.debit, self.credit) {
            (Some(d), _) => Movement::Debit(d),
            (None, Some(c)) => Movement::Credit(c),
            (None, None) => Movement::Credit(Decimal::ZERO),
        }
    }

    /// Signed amount: `-debit` or `+credit`.
    pub fn amount(&self) -> Decimal {
        self.movement().signed()
    }

    /// Returns true if money left the account
    pub fn is_debit(&self) -> bool {
        self.debit.is_some()
    }
}

/// Round to cents and pin the scale so `100.5` displays as `100.50`.
fn to_fixed(value: Decimal) -> Decimal {
    let mut v = value.round_dp(2);
    v.rescale(2);
    v
}
