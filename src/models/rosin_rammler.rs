//! Rosin-Rammler (Weibull) model: `P(x) = 100 · (1 - exp(-(x/d_char)^n))`.
//!
//! `d_char` is the characteristic size (about 63.2% passing) and `n` the
//! uniformity coefficient. The double-log transform is undefined at 0% and at
//! 100% passing, so both ends are excluded from the regression.

use crate::domain::{FittedParams, ModelKind};
use crate::error::AnalysisError;
use crate::models::model::{DistributionModel, Linearization, fit_linearized};

#[derive(Debug, Clone, Default)]
pub struct RosinRammler {
    params: Option<(f64, f64)>,
}

impl RosinRammler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characteristic size `d_char`, once fitted.
    pub fn d_char(&self) -> Option<f64> {
        self.params.map(|(d, _)| d)
    }

    /// Uniformity coefficient `n`, once fitted.
    pub fn n(&self) -> Option<f64> {
        self.params.map(|(_, n)| n)
    }
}

impl Linearization for RosinRammler {
    const KIND: ModelKind = ModelKind::RosinRammler;

    fn accepts(size: f64, passing: f64) -> bool {
        size > 0.0 && passing > 0.0 && passing < 100.0
    }

    fn transform_size(size: f64) -> f64 {
        size.ln()
    }

    fn transform_passing(passing: f64) -> f64 {
        // -ln(1 - P/100), via ln_1p for precision at small P.
        (-(-passing / 100.0).ln_1p()).ln()
    }

    fn recover_scale(slope: f64, intercept: f64) -> f64 {
        (-intercept / slope).exp()
    }
}

impl DistributionModel for RosinRammler {
    fn kind(&self) -> ModelKind {
        ModelKind::RosinRammler
    }

    fn fit(&mut self, sizes: &[f64], passing: &[f64]) -> Result<FittedParams, AnalysisError> {
        let (d_char, n) = fit_linearized::<Self>(sizes, passing)?;
        self.params = Some((d_char, n));
        Ok(FittedParams::RosinRammler { d_char, n })
    }

    fn params(&self) -> Option<FittedParams> {
        self.params.map(|(d_char, n)| FittedParams::RosinRammler { d_char, n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SieveObservation, SizeDistribution};

    const SIZES: [f64; 6] = [2000.0, 1000.0, 500.0, 250.0, 125.0, 63.0];

    fn synthetic(d_char: f64, n: f64) -> Vec<f64> {
        SIZES
            .iter()
            .map(|&x| 100.0 * (1.0 - (-(x / d_char).powf(n)).exp()))
            .collect()
    }

    fn rel_err(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn fit_recovers_exact_parameters() {
        let passing = synthetic(400.0, 1.3);
        let mut model = RosinRammler::new();
        model.fit(&SIZES, &passing).unwrap();

        assert!(rel_err(model.d_char().unwrap(), 400.0) < 1e-6);
        assert!(rel_err(model.n().unwrap(), 1.3) < 1e-6);
    }

    #[test]
    fn predict_reproduces_training_points() {
        let passing = synthetic(700.0, 0.9);
        let mut model = RosinRammler::new();
        model.fit(&SIZES, &passing).unwrap();

        for (&x, &p) in SIZES.iter().zip(&passing) {
            let y = model.predict(x).unwrap();
            assert!((y - p).abs() < 1e-8, "x={x}: {y} vs {p}");
        }
    }

    #[test]
    fn hundred_percent_passing_is_excluded() {
        let mut passing = synthetic(400.0, 1.3);
        passing[0] = 100.0;
        let mut model = RosinRammler::new();
        model.fit(&SIZES, &passing).unwrap();

        // The remaining five points are still exact.
        assert!(rel_err(model.d_char().unwrap(), 400.0) < 1e-6);
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = RosinRammler::new();
        assert_eq!(
            model.predict(100.0),
            Err(AnalysisError::ModelNotFitted { model: "Rosin-Rammler" })
        );
        assert!(matches!(model.size_at_passing(80.0), Err(AnalysisError::ModelNotFitted { .. })));
    }

    #[test]
    fn only_boundary_points_is_insufficient() {
        let mut model = RosinRammler::new();
        let err = model
            .fit(&[1000.0, 500.0, 250.0], &[100.0, 100.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { valid: 0, .. }));
    }

    #[test]
    fn flat_passing_is_degenerate() {
        let mut model = RosinRammler::new();
        let err = model.fit(&SIZES, &[50.0; 6]).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateFit { model: "Rosin-Rammler", .. }), "{err:?}");
        assert!(model.params().is_none());
    }

    #[test]
    fn fit_on_weighed_sample_ignores_the_finest_sieve() {
        let weights = [
            (2000.0, 7.3),
            (1000.0, 12.1),
            (500.0, 21.7),
            (250.0, 26.9),
            (125.0, 18.4),
            (63.0, 13.6),
        ];
        let observations: Vec<SieveObservation> = weights
            .iter()
            .map(|&(sieve_size, weight_retained)| SieveObservation { sieve_size, weight_retained })
            .collect();
        let dist = SizeDistribution::from_observations(&observations).unwrap();
        let (sizes, passing) = (dist.sizes(), dist.passing());

        let mut all = RosinRammler::new();
        all.fit(&sizes, &passing).unwrap();
        let mut coarse = RosinRammler::new();
        coarse.fit(&sizes[..5], &passing[..5]).unwrap();

        assert!(rel_err(all.n().unwrap(), coarse.n().unwrap()) < 1e-12);
        assert!(rel_err(all.d_char().unwrap(), coarse.d_char().unwrap()) < 1e-12);
        let n = all.n().unwrap();
        assert!(n > 0.8 && n < 1.3, "n = {n}");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut model = RosinRammler::new();
        let err = model.fit(&[1000.0, 500.0], &[50.0]).unwrap_err();
        assert_eq!(err, AnalysisError::LengthMismatch { sizes: 2, passing: 1 });
    }

    #[test]
    fn p80_lies_above_characteristic_size() {
        let mut model = RosinRammler::new();
        model.fit(&SIZES, &synthetic(400.0, 1.3)).unwrap();
        let p80 = model.size_at_passing(80.0).unwrap();
        assert!(p80 > 400.0);
        assert!((model.predict(p80).unwrap() - 80.0).abs() < 1e-9);
    }
}
