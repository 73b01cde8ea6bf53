//! Error taxonomy for the parsing engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kind, for callers that map engine errors onto their own responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    DocumentUnreadable,
    MalformedInput,
    NoTransactionsFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::DocumentUnreadable => "document_unreadable",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::NoTransactionsFound => "no_transactions_found",
        }
    }
}

/// Document-level failure. Row-level problems never surface here; they are
/// recorded as [`crate::Diagnostic`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("document unreadable: {0}")]
    DocumentUnreadable(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The document was read but no row produced a transaction. `preview`
    /// holds the first lines of extracted text for display.
    #[error("no transactions found (bank: {bank})")]
    NoTransactionsFound { bank: String, preview: Vec<String> },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ParseError::DocumentUnreadable(_) => ErrorKind::DocumentUnreadable,
            ParseError::MalformedInput(_) => ErrorKind::MalformedInput,
            ParseError::NoTransactionsFound { .. } => ErrorKind::NoTransactionsFound,
        }
    }

    /// Structural failures are fatal; an empty parse is not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ParseError::NoTransactionsFound { .. })
    }

    pub fn preview(&self) -> &[String] {
        match self {
            ParseError::NoTransactionsFound { preview, .. } => preview,
            _ => &[],
        }
    }
}

/// Failure to coerce a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("date cell is empty")]
    EmptyDate,

    #[error("unrecognized date '{0}'")]
    InvalidDate(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}
