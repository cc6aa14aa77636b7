//! Reporting: the analysis summary plus its terminal and document renderings.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    FittedParams, ModelKind, OptimizationPotential, P80Source, ScreenFractions, SizeDistribution,
};
use crate::process::BlindingCheck;

pub mod document;
pub mod format;
pub mod pdf;

pub use document::*;
pub use format::*;
pub use pdf::*;

/// Efficiency below which a non-blinding screen still has room to improve.
const MODERATE_EFFICIENCY: f64 = 0.95;

/// Everything a run computed, in report order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    /// Where the sieve data came from (file path or "built-in demo").
    pub source: String,
    pub distribution: SizeDistribution,
    pub fits: Vec<FittedParams>,
    pub skipped: Vec<SkippedModel>,
    /// Size at 80% passing for each fitted model.
    pub sample_p80: Vec<ModelValue>,
    pub probe: Option<Probe>,
    pub energy: Option<EnergySummary>,
    pub screen: Option<ScreenSummary>,
    pub optimization_potential: Option<String>,
    /// Chart file referenced by the report document, if one was written.
    pub chart: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedModel {
    pub model: ModelKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelValue {
    pub model: ModelKind,
    pub value: f64,
}

/// Predicted passing at a chosen size, per model.
#[derive(Debug, Clone, Serialize)]
pub struct Probe {
    pub size: f64,
    pub passing: Vec<ModelValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergySummary {
    pub feed_p80: f64,
    pub product_p80: P80Source,
    /// Measured specific energy (kWh/t).
    pub energy_consumption: Option<f64>,
    /// Bond Work Index back-calculated from `energy_consumption` (kWh/t).
    pub calculated_work_index: Option<f64>,
    /// Work index used for the energy requirement (given or calculated).
    pub work_index: Option<f64>,
    /// Energy required for the F80 -> P80 reduction (kWh/t).
    pub energy_required: Option<f64>,
    pub throughput: Option<f64>,
    pub mill_power_kw: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenSummary {
    pub fractions: ScreenFractions,
    pub efficiency: f64,
    pub threshold: f64,
    pub blinding: BlindingCheck,
}

/// Label how much a circuit stands to gain, from the screen result.
pub fn optimization_potential(screen: &ScreenSummary) -> OptimizationPotential {
    if screen.blinding.is_blinding {
        OptimizationPotential::High
    } else if screen.efficiency < MODERATE_EFFICIENCY {
        OptimizationPotential::Moderate
    } else {
        OptimizationPotential::Low
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::detect_blinding;

    fn screen(efficiency: f64) -> ScreenSummary {
        ScreenSummary {
            fractions: ScreenFractions {
                feed_undersize: 0.8,
                oversize_undersize: 0.1,
                undersize_undersize: 0.95,
            },
            efficiency,
            threshold: 0.85,
            blinding: detect_blinding(efficiency, 0.85),
        }
    }

    #[test]
    fn potential_follows_efficiency_bands() {
        assert_eq!(optimization_potential(&screen(0.70)), OptimizationPotential::High);
        assert_eq!(optimization_potential(&screen(0.90)), OptimizationPotential::Moderate);
        assert_eq!(optimization_potential(&screen(0.98)), OptimizationPotential::Low);
    }
}
