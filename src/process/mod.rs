//! Process figures derived from size data: comminution energy (Bond) and
//! screen performance.
//!
//! All functions here are closed-form and stateless.

pub mod energy;
pub mod screen;

pub use energy::*;
pub use screen::*;
