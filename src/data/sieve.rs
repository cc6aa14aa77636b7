//! Sieve analysis: from retained masses to a cumulative passing distribution.

use crate::domain::{SieveObservation, SizeDistribution, SizeFraction};
use crate::error::AnalysisError;

/// Built-in demo sieve stack (µm, retained mass).
pub const DEMO_SIEVE: [(f64, f64); 5] = [
    (1000.0, 10.0),
    (500.0, 20.0),
    (250.0, 30.0),
    (125.0, 25.0),
    (63.0, 15.0),
];

pub fn demo_observations() -> Vec<SieveObservation> {
    DEMO_SIEVE
        .iter()
        .map(|&(sieve_size, weight_retained)| SieveObservation {
            sieve_size,
            weight_retained,
        })
        .collect()
}

impl SizeDistribution {
    /// Derive percent retained and cumulative passing for each sieve.
    ///
    /// Sieves are sorted coarsest first; cumulative passing at a sieve is the
    /// share of the total mass retained on every finer sieve, so the finest
    /// sieve always reads 0%.
    pub fn from_observations(observations: &[SieveObservation]) -> Result<Self, AnalysisError> {
        if observations.is_empty() {
            return Err(AnalysisError::InvalidSample("no sieve readings".to_string()));
        }
        for obs in observations {
            if !(obs.sieve_size.is_finite() && obs.sieve_size > 0.0) {
                return Err(AnalysisError::InvalidSample(format!(
                    "sieve size must be positive, got {}",
                    obs.sieve_size
                )));
            }
            if !(obs.weight_retained.is_finite() && obs.weight_retained >= 0.0) {
                return Err(AnalysisError::InvalidSample(format!(
                    "retained weight on {} must be non-negative, got {}",
                    obs.sieve_size, obs.weight_retained
                )));
            }
        }

        let mut sorted = observations.to_vec();
        sorted.sort_by(|a, b| b.sieve_size.total_cmp(&a.sieve_size));

        if let Some(w) = sorted.windows(2).find(|w| w[0].sieve_size == w[1].sieve_size) {
            return Err(AnalysisError::InvalidSample(format!(
                "duplicate sieve size {}",
                w[0].sieve_size
            )));
        }

        let total_weight: f64 = sorted.iter().map(|o| o.weight_retained).sum();
        if total_weight <= 0.0 {
            return Err(AnalysisError::InvalidSample("total retained weight is zero".to_string()));
        }

        // Passing is the mass on finer sieves, summed from the bottom up so the
        // finest sieve reads exactly 0 rather than a rounding residue of 100 - Σ.
        let mut finer = vec![0.0; sorted.len()];
        for i in (0..sorted.len().saturating_sub(1)).rev() {
            finer[i] = finer[i + 1] + sorted[i + 1].weight_retained;
        }

        let fractions = sorted
            .iter()
            .zip(&finer)
            .map(|(obs, &finer_weight)| SizeFraction {
                sieve_size: obs.sieve_size,
                weight_retained: obs.weight_retained,
                percent_retained: 100.0 * obs.weight_retained / total_weight,
                cumulative_passing: (100.0 * finer_weight / total_weight).clamp(0.0, 100.0),
            })
            .collect();

        Ok(Self {
            fractions,
            total_weight,
        })
    }
}
