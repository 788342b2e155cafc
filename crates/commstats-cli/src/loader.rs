//! CSV matrix loader: one matrix row per line, no header.
//!
//! Rows may differ in length and empty fields become NaN; both are left
//! for matrix validation to reject with a row index. Only text that is not
//! a number at all is a load error.

use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read the matrix stored at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or read, or if a field is not a
/// number.
pub fn load_matrix(path: &Path, delimiter: u8) -> Result<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open matrix file: {}", path.display()))?;
    let rows = read_matrix(file, delimiter)
        .with_context(|| format!("Failed to parse matrix file: {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "matrix loaded");
    Ok(rows)
}

/// Read a matrix from any CSV source.
///
/// # Errors
///
/// Fails on malformed CSV or non-numeric fields.
pub fn read_matrix(source: impl Read, delimiter: u8) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Whitespace-only line. A line of bare delimiters is a row of NaNs.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let line = record.position().map_or(0, csv::Position::line);
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                parse_cost(field).ok_or_else(|| {
                    anyhow!("line {line}, column {}: not a number: {field:?}", col + 1)
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(rows)
}

/// Empty means "missing" and maps to NaN; anything else must parse.
fn parse_cost(field: &str) -> Option<f64> {
    if field.is_empty() {
        return Some(f64::NAN);
    }
    field.parse::<f64>().ok()
}
