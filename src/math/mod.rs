//! Mathematical utilities: least squares and straight-line regression.

pub mod ols;

pub use ols::*;
