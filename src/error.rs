//! Error types.
//!
//! - `AnalysisError`: numerical/core failures (model fitting, formulas)
//! - `IngestError`: sieve CSV loading failures
//! - `AppError`: what the binary reports (message + process exit code)
//!
//! Exit codes used by `AppError`:
//! - `2` bad input, IO, or CLI usage
//! - `3` not enough usable data
//! - `4` numerical failure

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the fitting core and the process formulas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{model} model has not been fitted yet")]
    ModelNotFitted { model: &'static str },

    #[error("{model} fit needs at least 2 valid points with distinct sizes, got {valid}")]
    InsufficientData { model: &'static str, valid: usize },

    #[error("{model} fit is degenerate (slope={slope}); parameters cannot be recovered")]
    DegenerateFit { model: &'static str, slope: f64 },

    #[error("Invalid F80/P80 (F80={f80}, P80={p80}): {reason}")]
    InvalidSize { f80: f64, p80: f64, reason: &'static str },

    #[error("Invalid separation: undersize and oversize have the same composition ({fraction})")]
    InvalidSeparation { fraction: f64 },

    #[error("Feed undersize fraction is zero; screen efficiency is undefined")]
    ZeroFeedUndersize,

    #[error("Length mismatch: {sizes} sizes vs {passing} passing values")]
    LengthMismatch { sizes: usize, passing: usize },

    #[error("Invalid sieve sample: {0}")]
    InvalidSample(String),

    #[error("Passing percentage must be strictly between 0 and 100, got {0}")]
    InvalidPassing(f64),

    #[error("Least-squares solve failed (design matrix is singular)")]
    SingularRegression,
}

/// Failures raised while loading sieve data from CSV.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to open CSV '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: `{0}`")]
    MissingColumn(&'static str),

    #[error("No valid rows in '{}' ({rejected} row(s) rejected)", path.display())]
    NoValidRows { path: PathBuf, rejected: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let code = match err {
            AnalysisError::InsufficientData { .. } => 3,
            AnalysisError::DegenerateFit { .. } | AnalysisError::SingularRegression => 4,
            _ => 2,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let code = match err {
            IngestError::NoValidRows { .. } => 3,
            _ => 2,
        };
        AppError::new(code, err.to_string())
    }
}
