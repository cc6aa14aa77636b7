//! Sieve data sources: derivation of distributions from sieve readings, the
//! built-in demo stack, and synthetic sample generation.

pub mod sample;
pub mod sieve;

pub use sample::*;
pub use sieve::*;
