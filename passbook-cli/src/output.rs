//! Rendering parsed records for the terminal or a file

use anyhow::{Context, Result};
use passbook_core::TransactionRecord;
use passbook_ingest::export;
use rust_decimal::Decimal;

use crate::config::OutputFormat;

const DESCRIPTION_WIDTH: usize = 40;

pub fn render(records: &[TransactionRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table(records)),
        OutputFormat::Csv => export::to_csv_string(records),
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(records).context("serialize records")?;
            s.push('\n');
            Ok(s)
        }
    }
}

fn table(records: &[TransactionRecord]) -> String {
    let mut out = format!(
        "{:<10}  {:<width$}  {:<16}  {:>12}  {:>12}  {:>12}\n",
        "Date",
        "Description",
        "Ref",
        "Debit",
        "Credit",
        "Balance",
        width = DESCRIPTION_WIDTH
    );
    for r in records {
        out.push_str(&format!(
            "{:<10}  {:<width$}  {:<16}  {:>12}  {:>12}  {:>12}\n",
            r.date().format("%Y-%m-%d").to_string(),
            truncate(r.description(), DESCRIPTION_WIDTH),
            truncate(r.ref_no().unwrap_or(""), 16),
            money(r.debit()),
            money(r.credit()),
            money(r.balance()),
            width = DESCRIPTION_WIDTH
        ));
    }
    out
}

fn money(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
