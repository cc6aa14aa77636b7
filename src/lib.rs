//! `grind-curves` library crate.
//!
//! The binary (`grind`) is a thin wrapper around this library so that:
//!
//! - core fitting and formula code is testable without spawning processes
//! - the models and process formulas are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod process;
pub mod report;
