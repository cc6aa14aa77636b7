//! Fitting orchestration over the distribution models.

pub mod fitter;

pub use fitter::*;
