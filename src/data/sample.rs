//! Synthetic sieve data generation from a known distribution model.
//!
//! Sieves follow a √2 series down from `top_size`. The mass retained on each
//! sieve is the model's passing drop across it; material finer than the last
//! sieve is added to that sieve (no separate pan), so the finest reading always
//! shows 0% passing.
//!
//! Noise is multiplicative and log-normal per retained mass, mean-corrected so
//! `E[mass]` is unbiased.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FittedParams, ModelKind, SampleConfig, SieveObservation};
use crate::error::AppError;
use crate::models::predict_passing;

/// Ratio between consecutive sieve apertures.
const SIEVE_RATIO: f64 = std::f64::consts::SQRT_2;

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<SieveObservation>, AppError> {
    validate(config)?;

    let params = match config.model {
        ModelKind::GaudinSchuhmann => FittedParams::GaudinSchuhmann {
            k: config.size_param,
            m: config.shape_param,
        },
        ModelKind::RosinRammler => FittedParams::RosinRammler {
            d_char: config.size_param,
            n: config.shape_param,
        },
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let mean_correction = 0.5 * config.noise * config.noise;

    let sizes = sieve_series(config.top_size, config.sieve_count);
    let mut observations = Vec::with_capacity(sizes.len());
    let mut passing_above = 100.0;

    for (i, &size) in sizes.iter().enumerate() {
        let is_last = i + 1 == sizes.len();
        let passing = if is_last {
            0.0
        } else {
            predict_passing(&params, size).clamp(0.0, passing_above)
        };

        let exact = config.total_mass * (passing_above - passing) / 100.0;
        let weight_retained = if config.noise > 0.0 {
            let z: f64 = normal.sample(&mut rng);
            exact * (config.noise * z - mean_correction).exp()
        } else {
            exact
        };

        observations.push(SieveObservation {
            sieve_size: size,
            weight_retained,
        });
        passing_above = passing;
    }

    Ok(observations)
}

/// `count` apertures from `top` down, each `√2` finer than the last.
pub fn sieve_series(top: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| top / SIEVE_RATIO.powi(i as i32)).collect()
}

fn validate(config: &SampleConfig) -> Result<(), AppError> {
    if !(config.size_param.is_finite() && config.size_param > 0.0) {
        return Err(AppError::new(2, "Size parameter must be finite and > 0."));
    }
    if !(config.shape_param.is_finite() && config.shape_param > 0.0) {
        return Err(AppError::new(2, "Shape parameter must be finite and > 0."));
    }
    if !(config.top_size.is_finite() && config.top_size > 0.0) {
        return Err(AppError::new(2, "Top sieve size must be finite and > 0."));
    }
    if config.sieve_count < 2 {
        return Err(AppError::new(2, "At least 2 sieves are required."));
    }
    if !(config.total_mass.is_finite() && config.total_mass > 0.0) {
        return Err(AppError::new(2, "Sample mass must be finite and > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }
    Ok(())
}
