//! CSV report of per-address outcomes.

use crate::domain::AttestationOutcome;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    address: String,
    score: &'a str,
    tx_hash: String,
    error: String,
}

impl<'a> From<&'a AttestationOutcome> for ReportRow<'a> {
    fn from(outcome: &'a AttestationOutcome) -> Self {
        Self {
            address: outcome.address.to_string(),
            score: &outcome.score,
            tx_hash: outcome.tx_hash().unwrap_or_default(),
            error: outcome.error().unwrap_or_default(),
        }
    }
}

/// Write one row per outcome, in the given order, under an
/// `address,score,tx_hash,error` header.
pub fn write_report<W: Write>(
    writer: W,
    outcomes: &[AttestationOutcome],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if outcomes.is_empty() {
        csv_writer.write_record(["address", "score", "tx_hash", "error"])?;
    }
    for outcome in outcomes {
        csv_writer.serialize(ReportRow::from(outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_file(path: &Path, outcomes: &[AttestationOutcome]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_report(file, outcomes)
}
