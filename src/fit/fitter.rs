//! Fit every requested model to one size distribution.
//!
//! A model that cannot be fitted (too few usable points, degenerate slope) is
//! recorded in `skipped` with its reason; the run only fails when nothing fits.

use tracing::{info, warn};

use crate::domain::{FittedParams, ModelKind, ModelSpec, SizeDistribution};
use crate::error::AppError;
use crate::models::model_for;

/// Output of fitting all requested models.
#[derive(Debug, Clone)]
pub struct ModelFits {
    pub fits: Vec<FittedParams>,
    /// Models that could not be fitted and why (for diagnostics).
    pub skipped: Vec<(ModelKind, String)>,
}

impl ModelFits {
    pub fn get(&self, kind: ModelKind) -> Option<&FittedParams> {
        self.fits.iter().find(|p| p.kind() == kind)
    }
}

pub fn fit_models(dist: &SizeDistribution, spec: ModelSpec) -> Result<ModelFits, AppError> {
    let sizes = dist.sizes();
    let passing = dist.passing();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();

    for kind in spec.kinds() {
        let mut model = model_for(kind);
        match model.fit(&sizes, &passing) {
            Ok(params) => {
                let (scale, shape) = params.scale_shape();
                info!(model = kind.display_name(), scale, shape, "model fitted");
                fits.push(params);
            }
            Err(err) => {
                warn!(model = kind.display_name(), %err, "model skipped");
                skipped.push((kind, err.to_string()));
            }
        }
    }

    if fits.is_empty() {
        let reasons: Vec<String> = skipped
            .iter()
            .map(|(kind, reason)| format!("{}: {reason}", kind.display_name()))
            .collect();
        return Err(AppError::new(
            3,
            format!("No model could be fitted. {}", reasons.join("; ")),
        ));
    }

    Ok(ModelFits { fits, skipped })
}
