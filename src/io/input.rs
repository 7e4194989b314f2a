//! Reading the newline-delimited address list.

use crate::domain::Address;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Read one address per line.
///
/// Blank lines, `#` comments and lines that are not valid addresses are
/// dropped. Order and duplicates are preserved.
pub fn read_addresses<R: BufRead>(reader: R) -> std::io::Result<Vec<Address>> {
    let mut addresses = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match Address::parse(trimmed) {
            Ok(address) => addresses.push(address),
            Err(e) => debug!(line = index + 1, error = %e, "Skipping invalid address"),
        }
    }
    Ok(addresses)
}

pub fn read_addresses_file(path: &Path) -> Result<Vec<Address>> {
    let file = File::open(path)
        .with_context(|| format!("failed opening address list: {}", path.display()))?;
    read_addresses(BufReader::new(file))
        .with_context(|| format!("failed reading address list: {}", path.display()))
}
