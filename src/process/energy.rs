//! Bond comminution energy.
//!
//! Bond's third theory relates specific energy to the change in 80% passing size:
//!
//! ```text
//! W = Wi · (10/√P80 - 10/√F80)
//! ```
//!
//! with `W` and `Wi` in kWh/t and sizes in micrometres.
//!
//! `calculate_bond_work_index` requires size reduction (`F80 > P80`) while
//! `calculate_energy_required` only requires positive sizes. The asymmetry is
//! kept as-is: an inverted pair in the forward direction yields a negative
//! energy rather than an error.

use tracing::debug;

use crate::error::AnalysisError;

/// Bond size term `10/√P80 - 10/√F80`.
fn bond_term(f80: f64, p80: f64) -> f64 {
    10.0 / p80.sqrt() - 10.0 / f80.sqrt()
}

fn ensure_positive_sizes(f80: f64, p80: f64) -> Result<(), AnalysisError> {
    if !(f80 > 0.0 && p80 > 0.0) {
        return Err(AnalysisError::InvalidSize {
            f80,
            p80,
            reason: "F80 and P80 must be positive",
        });
    }
    Ok(())
}

/// Back-calculate the operating Bond Work Index (kWh/t) from measured energy.
///
/// `throughput` (t/h) does not enter the formula; it is accepted so callers can
/// pass operating data through unchanged.
pub fn calculate_bond_work_index(
    energy_consumption: f64,
    throughput: f64,
    f80: f64,
    p80: f64,
) -> Result<f64, AnalysisError> {
    ensure_positive_sizes(f80, p80)?;
    if f80 <= p80 {
        return Err(AnalysisError::InvalidSize {
            f80,
            p80,
            reason: "feed F80 must be larger than product P80 for size reduction",
        });
    }

    let wi = energy_consumption / bond_term(f80, p80);
    debug!(energy_consumption, throughput, f80, p80, wi, "bond work index");
    Ok(wi)
}

/// Specific energy (kWh/t) needed to grind from `f80` to `p80`.
pub fn calculate_energy_required(wi: f64, f80: f64, p80: f64) -> Result<f64, AnalysisError> {
    ensure_positive_sizes(f80, p80)?;
    Ok(wi * bond_term(f80, p80))
}

/// Mill power draw (kW) for a specific energy (kWh/t) at a throughput (t/h).
pub fn calculate_mill_power(specific_energy: f64, throughput: f64) -> f64 {
    specific_energy * throughput
}
