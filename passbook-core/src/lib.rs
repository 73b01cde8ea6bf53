//! passbook-core: record types, error taxonomy, and cell coercion shared by the statement parsers

pub mod amount;
pub mod date;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod record;

pub use amount::parse_amount;
pub use date::{first_line, parse_date};
pub use diagnostics::{Diagnostic, RowLocation, SkipReason};
pub use error::{ErrorKind, FieldError, ParseError};
pub use field::Field;
pub use record::{Movement, TransactionRecord};
