//! CSV export of normalized records.
//!
//! Columns are `date,description,ref_no,debit,credit,balance`, dates ISO
//! formatted. The output parses back through the CSV pipeline unchanged.

use anyhow::{Context, Result};
use passbook_core::TransactionRecord;
use std::io::Write;

pub const EXPORT_HEADER: [&str; 6] = ["date", "description", "ref_no", "debit", "credit", "balance"];

pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EXPORT_HEADER).context("writing csv header")?;

    for record in records {
        let money = |v: Option<rust_decimal::Decimal>| v.map(|d| d.to_string()).unwrap_or_default();
        out.write_record([
            record.date().format("%Y-%m-%d").to_string(),
            record.description().to_string(),
            record.ref_no().unwrap_or_default().to_string(),
            money(record.debit()),
            money(record.credit()),
            money(record.balance()),
        ])
        .with_context(|| format!("writing record dated {}", record.date()))?;
    }

    out.flush().context("flushing csv output")?;
    Ok(())
}

pub fn to_csv_string(records: &[TransactionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).context("csv output is not UTF-8")
}
