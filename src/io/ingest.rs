//! CSV ingest and validation for sieve analysis data.
//!
//! Expected schema (header row required, column order free, extra columns ignored):
//!
//! ```text
//! sieve_size,weight_retained
//! 1000,10
//! 500,20
//! ```
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no distribution math here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::SieveObservation;
use crate::error::IngestError;

const SIZE_COLUMN: &str = "sieve_size";
const WEIGHT_COLUMN: &str = "weight_retained";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: valid readings + row errors.
#[derive(Debug, Clone)]
pub struct SieveData {
    pub path: PathBuf,
    pub observations: Vec<SieveObservation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load sieve readings from a CSV file.
pub fn load_sieve_csv(path: &Path) -> Result<SieveData, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    for column in [SIZE_COLUMN, WEIGHT_COLUMN] {
        if !header_map.contains_key(column) {
            return Err(IngestError::MissingColumn(column));
        }
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        warn!(line = err.line, "skipping row: {}", err.message);
    }
    debug!(
        path = %path.display(),
        rows_read,
        rows_used = observations.len(),
        "loaded sieve CSV"
    );

    if observations.is_empty() {
        return Err(IngestError::NoValidRows {
            path: path.to_path_buf(),
            rejected: row_errors.len(),
        });
    }

    Ok(SieveData {
        path: path.to_path_buf(),
        observations,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SieveObservation, String> {
    let sieve_size = parse_f64(get_required(record, header_map, SIZE_COLUMN)?, SIZE_COLUMN)?;
    let weight_retained = parse_f64(get_required(record, header_map, WEIGHT_COLUMN)?, WEIGHT_COLUMN)?;

    if sieve_size <= 0.0 {
        return Err(format!("Invalid `{SIZE_COLUMN}` {sieve_size} (must be > 0)."));
    }
    if weight_retained < 0.0 {
        return Err(format!("Invalid `{WEIGHT_COLUMN}` {weight_retained} (must be >= 0)."));
    }

    Ok(SieveObservation {
        sieve_size,
        weight_retained,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid number '{s}' in `{name}`.")),
    }
}
