//! Gaudin-Schuhmann model: `P(x) = 100 · (x/k)^m`.
//!
//! `k` is the theoretical size at which everything passes and `m` the
//! distribution modulus. Only points with a positive size and a positive
//! passing percentage can be log-transformed; the rest are dropped before the
//! regression.

use crate::domain::{FittedParams, ModelKind};
use crate::error::AnalysisError;
use crate::models::model::{DistributionModel, Linearization, fit_linearized};

#[derive(Debug, Clone, Default)]
pub struct GaudinSchuhmann {
    params: Option<(f64, f64)>,
}

impl GaudinSchuhmann {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size modulus `k`, once fitted.
    pub fn k(&self) -> Option<f64> {
        self.params.map(|(k, _)| k)
    }

    /// Distribution modulus `m`, once fitted.
    pub fn m(&self) -> Option<f64> {
        self.params.map(|(_, m)| m)
    }
}

impl Linearization for GaudinSchuhmann {
    const KIND: ModelKind = ModelKind::GaudinSchuhmann;

    fn accepts(size: f64, passing: f64) -> bool {
        size > 0.0 && passing > 0.0
    }

    fn transform_size(size: f64) -> f64 {
        size.log10()
    }

    fn transform_passing(passing: f64) -> f64 {
        (passing / 100.0).log10()
    }

    fn recover_scale(slope: f64, intercept: f64) -> f64 {
        10f64.powf(-intercept / slope)
    }
}

impl DistributionModel for GaudinSchuhmann {
    fn kind(&self) -> ModelKind {
        ModelKind::GaudinSchuhmann
    }

    fn fit(&mut self, sizes: &[f64], passing: &[f64]) -> Result<FittedParams, AnalysisError> {
        let (k, m) = fit_linearized::<Self>(sizes, passing)?;
        self.params = Some((k, m));
        Ok(FittedParams::GaudinSchuhmann { k, m })
    }

    fn params(&self) -> Option<FittedParams> {
        self.params.map(|(k, m)| FittedParams::GaudinSchuhmann { k, m })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SieveObservation, SizeDistribution};

    const SIZES: [f64; 5] = [1000.0, 500.0, 250.0, 125.0, 63.0];

    fn synthetic(k: f64, m: f64) -> Vec<f64> {
        SIZES.iter().map(|&x| 100.0 * (x / k).powf(m)).collect()
    }

    fn rel_err(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn fit_recovers_exact_parameters() {
        let passing = synthetic(1200.0, 0.8);
        let mut model = GaudinSchuhmann::new();
        model.fit(&SIZES, &passing).unwrap();

        assert!(rel_err(model.k().unwrap(), 1200.0) < 1e-6);
        assert!(rel_err(model.m().unwrap(), 0.8) < 1e-6);
    }

    #[test]
    fn predict_reproduces_training_points() {
        let passing = synthetic(850.0, 1.15);
        let mut model = GaudinSchuhmann::new();
        model.fit(&SIZES, &passing).unwrap();

        for (&x, &p) in SIZES.iter().zip(&passing) {
            let y = model.predict(x).unwrap();
            assert!((y - p).abs() < 1e-8, "x={x}: {y} vs {p}");
        }
    }

    #[test]
    fn zero_passing_points_are_ignored() {
        // Demo data: the finest sieve has nothing passing.
        let passing = [90.0, 70.0, 40.0, 15.0, 0.0];
        let mut model = GaudinSchuhmann::new();
        let params = model.fit(&SIZES, &passing).unwrap();

        let mut trimmed = GaudinSchuhmann::new();
        let expected = trimmed.fit(&SIZES[..4], &passing[..4]).unwrap();
        assert_eq!(params, expected);

        let (k, m) = params.scale_shape();
        assert!(k.is_finite() && k > 0.0, "k={k}");
        assert!(m > 0.0, "m={m}");
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = GaudinSchuhmann::new();
        assert_eq!(
            model.predict(100.0),
            Err(AnalysisError::ModelNotFitted { model: "Gaudin-Schuhmann" })
        );
    }

    #[test]
    fn single_valid_point_is_insufficient() {
        let mut model = GaudinSchuhmann::new();
        let err = model.fit(&[500.0, 250.0], &[40.0, 0.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { valid: 1, .. }));
        assert!(model.params().is_none());
    }

    #[test]
    fn flat_passing_is_degenerate() {
        let mut model = GaudinSchuhmann::new();
        let err = model.fit(&SIZES, &[50.0; 5]).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateFit { .. }), "{err:?}");
    }

    #[test]
    fn weighed_sample_fit_matches_fit_without_pan_row() {
        let observations: Vec<SieveObservation> = [
            (2000.0, 7.3),
            (1000.0, 12.1),
            (500.0, 21.7),
            (250.0, 26.9),
            (125.0, 18.4),
            (63.0, 13.6),
        ]
        .iter()
        .map(|&(sieve_size, weight_retained)| SieveObservation { sieve_size, weight_retained })
        .collect();
        let dist = SizeDistribution::from_observations(&observations).unwrap();
        let (sizes, passing) = (dist.sizes(), dist.passing());

        let mut all = GaudinSchuhmann::new();
        all.fit(&sizes, &passing).unwrap();
        let mut coarse = GaudinSchuhmann::new();
        coarse.fit(&sizes[..5], &passing[..5]).unwrap();

        assert!(rel_err(all.k().unwrap(), coarse.k().unwrap()) < 1e-12);
        assert!(rel_err(all.m().unwrap(), coarse.m().unwrap()) < 1e-12);
        let m = all.m().unwrap();
        assert!(m > 0.5 && m < 0.9, "m = {m}");
    }

    #[test]
    fn failed_refit_keeps_previous_parameters() {
        let mut model = GaudinSchuhmann::new();
        model.fit(&SIZES, &synthetic(1200.0, 0.8)).unwrap();
        let before = model.params();

        assert!(model.fit(&[1.0], &[1.0]).is_err());
        assert_eq!(model.params(), before);
    }

    #[test]
    fn refit_overwrites_parameters() {
        let mut model = GaudinSchuhmann::new();
        model.fit(&SIZES, &synthetic(1200.0, 0.8)).unwrap();
        model.fit(&SIZES, &synthetic(2000.0, 0.5)).unwrap();
        assert!(rel_err(model.k().unwrap(), 2000.0) < 1e-6);
    }
}
