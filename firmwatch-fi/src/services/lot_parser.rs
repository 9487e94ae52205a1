//! Lot measurement file parser
//!
//! Firmness-meter exports are line-oriented CSV: a header block containing
//! a `Ticket #` line that carries the lot barcode, followed by one row per
//! berry of the form `<index>,<diameter>,<unused>,<firmness>`.

use crate::models::LotSummary;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TICKET_MARKER: &str = "Ticket #";

/// Per-file parse failures
///
/// Recovered at the orchestrator loop: the file is logged, skipped, and
/// retried on the next run. Never escapes the parser boundary as a panic.
#[derive(Debug, Error)]
pub enum ParseError {
    /// File could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No header line carries the ticket number
    #[error("No ticket number (barcode) found in {path}")]
    NoTicketNumber { path: PathBuf },

    /// Header present but zero berry data rows
    #[error("No valid berry data found in {path}")]
    NoDataRows { path: PathBuf },

    /// A measurement field failed numeric parsing; the whole file is
    /// rejected rather than recovering partial rows
    #[error("Malformed {field} value {value:?} on line {line_no} of {path}")]
    BadNumber {
        path: PathBuf,
        line_no: usize,
        field: &'static str,
        value: String,
    },
}

/// Parse one measurement file into its lot summary.
pub fn parse(path: &Path) -> Result<LotSummary, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let barcode = extract_barcode(&content).ok_or_else(|| ParseError::NoTicketNumber {
        path: path.to_path_buf(),
    })?;

    let mut diameters = Vec::new();
    let mut firmnesses = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if !line.chars().next().map_or(false, |c| c.is_ascii_digit()) {
            continue;
        }

        // Row shape: index, diameter, unused, firmness
        let fields: Vec<&str> = line.split(',').collect();
        let line_no = idx + 1;

        let diameter = fields.get(1).copied().unwrap_or("");
        let firmness = fields.get(3).copied().unwrap_or("");

        diameters.push(parse_field(path, line_no, "diameter", diameter)?);
        firmnesses.push(parse_field(path, line_no, "firmness", firmness)?);
    }

    if diameters.is_empty() {
        return Err(ParseError::NoDataRows {
            path: path.to_path_buf(),
        });
    }

    if diameters.len() == 1 {
        tracing::warn!(
            "Single data row in {}; standard deviation reported as 0.0",
            path.display()
        );
    }

    Ok(LotSummary {
        barcode,
        avg_firmness: mean(&firmnesses),
        avg_diameter: mean(&diameters),
        sd_firmness: sample_std_dev(&firmnesses),
        sd_diameter: sample_std_dev(&diameters),
    })
}

/// The barcode is the second comma field of the first `Ticket #` line,
/// surrounding whitespace trimmed.
fn extract_barcode(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        if !line.starts_with(TICKET_MARKER) {
            return None;
        }
        line.split(',')
            .nth(1)
            .map(|field| field.trim().to_string())
            .filter(|barcode| !barcode.is_empty())
    })
}

fn parse_field(
    path: &Path,
    line_no: usize,
    field: &'static str,
    value: &str,
) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::BadNumber {
            path: path.to_path_buf(),
            line_no,
            field,
            value: value.to_string(),
        })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator).
///
/// A single observation has no spread to estimate; 0.0 is reported so the
/// delivered payload never carries NaN.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
