//! Exports: the derived distribution table (CSV), raw sieve readings (CSV) and
//! the analysis summary (JSON).
//!
//! The CSV outputs are meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{SieveObservation, SizeDistribution};
use crate::error::AppError;
use crate::fit::ModelFits;
use crate::models::predict_passing;
use crate::report::AnalysisSummary;

/// Write the distribution with one fitted-passing column per model.
pub fn write_distribution_csv(path: &Path, dist: &SizeDistribution, fits: &ModelFits) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec![
        "sieve_size".to_string(),
        "weight_retained".to_string(),
        "percent_retained".to_string(),
        "cumulative_passing".to_string(),
    ];
    for params in &fits.fits {
        header.push(format!("fit_{}", params.kind().short_name().to_ascii_lowercase()));
    }
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for f in &dist.fractions {
        let mut row = vec![
            format!("{}", f.sieve_size),
            format!("{}", f.weight_retained),
            format!("{:.6}", f.percent_retained),
            format!("{:.6}", f.cumulative_passing),
        ];
        for params in &fits.fits {
            row.push(format!("{:.6}", predict_passing(params, f.sieve_size)));
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write sieve readings in the ingest schema (`sieve_size,weight_retained`).
pub fn write_sieve_csv(path: &Path, observations: &[SieveObservation]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sieve CSV '{}': {e}", path.display())))?;

    for obs in observations {
        writer
            .serialize(obs)
            .map_err(|e| AppError::new(2, format!("Failed to write sieve CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sieve CSV: {e}")))?;
    Ok(())
}

/// Write the analysis summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &AnalysisSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON: {e}")))?;
    Ok(())
}
