//! The distribution-model abstraction and the shared fitting path.
//!
//! Both models become a straight line after a change of variables:
//!
//! - Gaudin-Schuhmann: `log10(P/100) = m·log10(x) - m·log10(k)`
//! - Rosin-Rammler:    `ln(-ln(1 - P/100)) = n·ln(x) - n·ln(d_char)`
//!
//! so fitting is always: filter the points the transform is defined for,
//! transform, regress, then invert the intercept back into the scale parameter.
//! Each model supplies only its `Linearization`; the rest lives here.

use tracing::debug;

use crate::domain::{FittedParams, ModelKind};
use crate::error::AnalysisError;
use crate::math::fit_line;
use crate::models::{GaudinSchuhmann, RosinRammler};

/// Slopes smaller than this are treated as zero (horizontal fit).
const SLOPE_EPS: f64 = 1e-12;

/// A two-parameter particle-size distribution that can be fitted to sieve data.
pub trait DistributionModel {
    fn kind(&self) -> ModelKind;

    /// Fit the model to paired sizes and cumulative passing percentages.
    ///
    /// On success the previous parameters (if any) are replaced; on failure they
    /// are left untouched.
    fn fit(&mut self, sizes: &[f64], passing: &[f64]) -> Result<FittedParams, AnalysisError>;

    /// Parameters from the last successful fit.
    fn params(&self) -> Option<FittedParams>;

    /// Cumulative passing percentage at `size`.
    fn predict(&self, size: f64) -> Result<f64, AnalysisError> {
        let params = self.params().ok_or(AnalysisError::ModelNotFitted {
            model: self.kind().display_name(),
        })?;
        Ok(predict_passing(&params, size))
    }

    /// Size at which `passing` percent of the material passes (e.g. P80).
    fn size_at_passing(&self, passing: f64) -> Result<f64, AnalysisError> {
        let params = self.params().ok_or(AnalysisError::ModelNotFitted {
            model: self.kind().display_name(),
        })?;
        size_at_passing(&params, passing)
    }
}

/// Change of variables that turns a model into `Y = slope·X + intercept`.
pub(crate) trait Linearization {
    const KIND: ModelKind;

    /// Whether the transform is defined for this point.
    fn accepts(size: f64, passing: f64) -> bool;

    fn transform_size(size: f64) -> f64;

    fn transform_passing(passing: f64) -> f64;

    /// Scale parameter from the regression line (`slope` is non-zero).
    fn recover_scale(slope: f64, intercept: f64) -> f64;
}

/// Filter, transform and regress. Returns `(scale, shape)`.
pub(crate) fn fit_linearized<L: Linearization>(
    sizes: &[f64],
    passing: &[f64],
) -> Result<(f64, f64), AnalysisError> {
    if sizes.len() != passing.len() {
        return Err(AnalysisError::LengthMismatch {
            sizes: sizes.len(),
            passing: passing.len(),
        });
    }

    let label = L::KIND.display_name();
    let (xs, ys): (Vec<f64>, Vec<f64>) = sizes
        .iter()
        .zip(passing)
        .filter(|&(&x, &p)| x.is_finite() && p.is_finite() && L::accepts(x, p))
        .map(|(&x, &p)| (L::transform_size(x), L::transform_passing(p)))
        .unzip();

    debug!(
        model = label,
        total = sizes.len(),
        valid = xs.len(),
        "filtered points for linearized fit"
    );

    let line = fit_line(&xs, &ys, label)?;
    if !line.slope.is_finite() || line.slope.abs() < SLOPE_EPS {
        return Err(AnalysisError::DegenerateFit {
            model: label,
            slope: line.slope,
        });
    }

    let scale = L::recover_scale(line.slope, line.intercept);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(AnalysisError::DegenerateFit {
            model: label,
            slope: line.slope,
        });
    }

    debug!(model = label, scale, shape = line.slope, "fit complete");
    Ok((scale, line.slope))
}

/// Evaluate a fitted model at `size`. No domain restriction: extrapolation is allowed.
pub fn predict_passing(params: &FittedParams, size: f64) -> f64 {
    match *params {
        FittedParams::GaudinSchuhmann { k, m } => 100.0 * (size / k).powf(m),
        FittedParams::RosinRammler { d_char, n } => 100.0 * (1.0 - (-(size / d_char).powf(n)).exp()),
    }
}

/// Invert a fitted model: the size at which `passing` percent passes.
pub fn size_at_passing(params: &FittedParams, passing: f64) -> Result<f64, AnalysisError> {
    if !(passing > 0.0 && passing < 100.0) {
        return Err(AnalysisError::InvalidPassing(passing));
    }
    let fraction = passing / 100.0;
    let size = match *params {
        FittedParams::GaudinSchuhmann { k, m } => k * fraction.powf(1.0 / m),
        FittedParams::RosinRammler { d_char, n } => d_char * (-(-fraction).ln_1p()).powf(1.0 / n),
    };
    Ok(size)
}

/// Fresh, unfitted model of the given kind.
pub fn model_for(kind: ModelKind) -> Box<dyn DistributionModel> {
    match kind {
        ModelKind::GaudinSchuhmann => Box::new(GaudinSchuhmann::new()),
        ModelKind::RosinRammler => Box::new(RosinRammler::new()),
    }
}
