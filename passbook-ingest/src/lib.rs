//! passbook-ingest: statement ingestion (CSV and PDF tables) and bank-specific normalizers.

pub mod csv_source;
pub mod detect;
pub mod export;
pub mod extract;
pub mod headers;
pub mod normalize;
pub mod profiles;
pub mod service;
pub mod table;

pub use detect::{UNKNOWN_BANK, detect_bank};
pub use extract::PdfDocument;
pub use headers::{AliasTable, HeaderMap, MappedRow, Requirement, normalize_header};
pub use normalize::{HeaderCarry, TableOutcome, normalize_table};
pub use profiles::{BankProfile, ProfileRegistry};
pub use service::{PREVIEW_LINES, ParsedStatement, ParserService, StatementFormat, preview_lines};
pub use table::{ColumnSpan, RawTable};
