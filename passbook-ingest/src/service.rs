//! Parser service: format dispatch, detection and aggregation.
//!
//! ```no_run
//! use passbook_ingest::ParserService;
//!
//! let bytes = std::fs::read("statement.pdf").unwrap();
//! let records = ParserService::new().parse(&bytes, "statement.pdf").unwrap();
//! println!("{} transactions", records.len());
//! ```

use passbook_core::{Diagnostic, ParseError, TransactionRecord};
use serde::Serialize;
use tracing::info;

use crate::csv_source;
use crate::detect::UNKNOWN_BANK;
use crate::extract::PdfDocument;
use crate::normalize::{HeaderCarry, TableOutcome, normalize_table};
use crate::profiles::ProfileRegistry;

/// Lines of extracted text attached to [`ParseError::NoTransactionsFound`].
pub const PREVIEW_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    Csv,
    Pdf,
}

impl StatementFormat {
    /// Format from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ParseError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(StatementFormat::Csv),
            "pdf" => Ok(StatementFormat::Pdf),
            _ => Err(ParseError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFormat::Csv => "csv",
            StatementFormat::Pdf => "pdf",
        }
    }
}

/// Full result of parsing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedStatement {
    pub format: StatementFormat,
    /// Detected bank id; `"unknown"` for CSV and for PDFs no profile claims.
    pub bank: String,
    pub pages: usize,
    pub tables: usize,
    pub records: Vec<TransactionRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Entry point of the engine. Holds only the profile registry, so one
/// service can be shared across threads.
pub struct ParserService {
    registry: ProfileRegistry,
}

impl ParserService {
    pub fn new() -> Self {
        Self::with_registry(ProfileRegistry::builtin())
    }

    pub fn with_registry(registry: ProfileRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Parse `bytes` into records, in document order.
    pub fn parse(&self, bytes: &[u8], filename: &str) -> Result<Vec<TransactionRecord>, ParseError> {
        self.parse_statement(bytes, filename).map(|s| s.records)
    }

    /// Like [`ParserService::parse`], keeping the detected bank, counts and
    /// the diagnostics for skipped rows and tables.
    pub fn parse_statement(&self, bytes: &[u8], filename: &str) -> Result<ParsedStatement, ParseError> {
        let format = StatementFormat::from_filename(filename)?;
        let (statement, text) = match format {
            StatementFormat::Csv => self.parse_csv(bytes)?,
            StatementFormat::Pdf => self.parse_pdf(bytes)?,
        };

        info!(
            file = filename,
            format = format.as_str(),
            bank = %statement.bank,
            records = statement.records.len(),
            skipped = statement.diagnostics.iter().filter(|d| d.is_row_skip()).count(),
            "parsed statement"
        );

        if statement.records.is_empty() {
            return Err(ParseError::NoTransactionsFound {
                bank: statement.bank,
                preview: preview_lines(&text, PREVIEW_LINES),
            });
        }
        Ok(statement)
    }

    /// Statement plus the decoded text, kept for the empty-parse preview.
    fn parse_csv(&self, bytes: &[u8]) -> Result<(ParsedStatement, String), ParseError> {
        let outcome = csv_source::parse_csv(bytes, self.registry.generic())?;
        let statement = ParsedStatement {
            format: StatementFormat::Csv,
            bank: UNKNOWN_BANK.to_string(),
            pages: 0,
            tables: 1,
            records: outcome.records,
            diagnostics: outcome.diagnostics,
        };
        Ok((statement, csv_source::decode(bytes)?.to_string()))
    }

    fn parse_pdf(&self, bytes: &[u8]) -> Result<(ParsedStatement, String), ParseError> {
        let doc = PdfDocument::open(bytes)?;
        let text = doc.text();
        let detected = self.registry.detect(&text);
        let profile = detected.unwrap_or_else(|| self.registry.generic());
        let bank = detected.map(|p| p.id()).unwrap_or(UNKNOWN_BANK);

        let mut total = TableOutcome::default();
        let mut carry = HeaderCarry::new();
        let mut tables = 0;
        for table in doc.tables() {
            tables += 1;
            let (outcome, next) = normalize_table(profile, &table, carry);
            total.extend(outcome);
            carry = next;
        }

        let mut diagnostics = doc.unreadable_pages();
        diagnostics.extend(total.diagnostics);

        let statement = ParsedStatement {
            format: StatementFormat::Pdf,
            bank: bank.to_string(),
            pages: doc.page_count(),
            tables,
            records: total.records,
            diagnostics,
        };
        Ok((statement, text))
    }

    /// Raw text of the document: page text for PDF, decoded text for CSV.
    pub fn extract_text(&self, bytes: &[u8], filename: &str) -> Result<String, ParseError> {
        match StatementFormat::from_filename(filename)? {
            StatementFormat::Csv => csv_source::decode(bytes).map(str::to_string),
            StatementFormat::Pdf => Ok(PdfDocument::open(bytes)?.text()),
        }
    }

    /// Bank id for a document, [`UNKNOWN_BANK`] when nothing matches. CSV
    /// exports carry no bank name and always report unknown.
    pub fn detect_bank(&self, bytes: &[u8], filename: &str) -> Result<&'static str, ParseError> {
        match StatementFormat::from_filename(filename)? {
            StatementFormat::Csv => Ok(UNKNOWN_BANK),
            StatementFormat::Pdf => {
                let text = PdfDocument::open(bytes)?.text();
                Ok(self.registry.detect_id(&text))
            }
        }
    }
}

impl Default for ParserService {
    fn default() -> Self {
        Self::new()
    }
}

/// First `n` non-empty lines of `text`, right-trimmed.
pub fn preview_lines(text: &str, n: usize) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .take(n)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(StatementFormat::from_filename("a.csv").unwrap(), StatementFormat::Csv);
        assert_eq!(StatementFormat::from_filename("Stmt.2024.PDF").unwrap(), StatementFormat::Pdf);
        for name in ["file.unsupported", "statement", "statement.xlsx", ".csv.txt"] {
            assert!(matches!(
                StatementFormat::from_filename(name),
                Err(ParseError::UnsupportedFormat(n)) if n == name
            ));
        }
    }

    #[test]
    fn test_unsupported_never_reads_content() {
        // invalid bytes would be MalformedInput for CSV and unreadable for PDF
        let err = ParserService::new().parse(b"\xff\x00", "scan.tiff").unwrap_err();
        assert_eq!(err, ParseError::UnsupportedFormat("scan.tiff".into()));
    }

    #[test]
    fn test_empty_csv_reports_preview() {
        let csv = "Date,Description,Amount\n\n,,\nB/F,Opening balance,\n";
        let err = ParserService::new().parse(csv.as_bytes(), "x.csv").unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(
            err,
            ParseError::NoTransactionsFound {
                bank: "unknown".into(),
                preview: vec![
                    "Date,Description,Amount".into(),
                    ",,".into(),
                    "B/F,Opening balance,".into()
                ],
            }
        );
    }

    #[test]
    fn test_preview_lines() {
        let text = (1..=30).map(|i| format!("line {i}  ")).collect::<Vec<_>>().join("\n\n");
        let preview = preview_lines(&text, PREVIEW_LINES);
        assert_eq!(preview.len(), 20);
        assert_eq!(preview[0], "line 1");
        assert_eq!(preview[19], "line 20");
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParserService>();
    }
}
