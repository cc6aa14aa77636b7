//! Input/output helpers.
//!
//! - sieve CSV ingest + validation (`ingest`)
//! - CSV/JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
