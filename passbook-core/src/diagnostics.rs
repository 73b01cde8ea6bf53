//! Structured reasons for skipped rows and tables

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::error::FieldError;
use crate::field::Field;

/// Why a single row did not become a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("row is blank")]
    BlankRow,

    #[error("date cell is empty")]
    MissingDate,

    #[error("unrecognized date '{value}'")]
    InvalidDate { value: String },

    #[error("description is empty")]
    MissingDescription,

    #[error("no debit, credit or amount value")]
    MissingAmount,

    #[error("invalid {field} value '{value}'")]
    InvalidAmount { field: Field, value: String },

    #[error("both debit ({debit}) and credit ({credit}) are set")]
    ConflictingAmounts { debit: Decimal, credit: Decimal },

    #[error("balance is missing")]
    MissingBalance,
}

impl SkipReason {
    pub fn from_date_error(err: FieldError) -> Self {
        match err {
            FieldError::EmptyDate => SkipReason::MissingDate,
            FieldError::InvalidDate(value) | FieldError::InvalidAmount(value) => {
                SkipReason::InvalidDate { value }
            }
        }
    }

    pub fn from_amount_error(field: Field, err: FieldError) -> Self {
        match err {
            FieldError::InvalidAmount(value) | FieldError::InvalidDate(value) => {
                SkipReason::InvalidAmount { field, value }
            }
            FieldError::EmptyDate => SkipReason::MissingAmount,
        }
    }
}

/// Where a row came from. `page`/`table` are set for PDF tables; `row` is
/// 1-based within the table (PDF) or the file (CSV, header = line 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowLocation {
    pub page: Option<usize>,
    pub table: Option<usize>,
    pub row: usize,
}

impl RowLocation {
    pub fn csv_line(line: usize) -> Self {
        Self {
            page: None,
            table: None,
            row: line,
        }
    }

    pub fn table_row(page: usize, table: usize, row: usize) -> Self {
        Self {
            page: Some(page),
            table: Some(table),
            row,
        }
    }
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.page, self.table) {
            (Some(page), Some(table)) => write!(f, "page {page}, table {table}, row {}", self.row),
            _ => write!(f, "line {}", self.row),
        }
    }
}

/// Non-fatal event recorded while parsing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    RowSkipped {
        location: RowLocation,
        reason: SkipReason,
    },
    /// A table whose first row is not a header, with no earlier header to reuse.
    TableSkipped {
        page: usize,
        table: usize,
        first_row: Vec<String>,
    },
    /// A header-less table parsed with the previous table's header.
    HeaderCarried { page: usize, table: usize },
    PageUnreadable { page: usize, message: String },
}

impl Diagnostic {
    pub fn is_row_skip(&self) -> bool {
        matches!(self, Diagnostic::RowSkipped { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RowSkipped { location, reason } => {
                write!(f, "skipped {location}: {reason}")
            }
            Diagnostic::TableSkipped {
                page,
                table,
                first_row,
            } => write!(
                f,
                "skipped page {page}, table {table}: no header and none to reuse (first row: {})",
                first_row.join(" | ")
            ),
            Diagnostic::HeaderCarried { page, table } => {
                write!(f, "page {page}, table {table}: reused previous header")
            }
            Diagnostic::PageUnreadable { page, message } => {
                write!(f, "page {page} unreadable: {message}")
            }
        }
    }
}
