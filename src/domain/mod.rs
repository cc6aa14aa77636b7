//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model selection enums (`ModelKind`, `ModelSpec`)
//! - sieve readings and derived distributions (`SieveObservation`, `SizeDistribution`)
//! - fit outputs (`FittedParams`) and run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
