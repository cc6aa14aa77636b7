//! Size distribution plots: ASCII for the terminal, SVG for reports.

pub mod ascii;
pub mod chart;

pub use ascii::*;
pub use chart::*;
