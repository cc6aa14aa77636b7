//! Shared analysis pipeline used by the `demo` and `analyze` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sieve readings -> distribution -> model fits -> P80 -> energy -> screen -> outputs
//!
//! The commands then only differ in where the readings and settings come from.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    AnalysisConfig, DEFAULT_BLINDING_THRESHOLD, P80_PASSING, P80Source, SieveObservation,
    SizeDistribution,
};
use crate::error::AppError;
use crate::fit::{ModelFits, fit_models};
use crate::models::{predict_passing, size_at_passing};
use crate::process::{
    calculate_bond_work_index, calculate_energy_required, calculate_mill_power,
    calculate_screen_efficiency, detect_blinding, detect_blinding_default,
};
use crate::report::{
    AnalysisSummary, EnergySummary, ModelValue, Probe, ScreenSummary, SkippedModel,
    optimization_potential,
};

/// All computed outputs of one analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub summary: AnalysisSummary,
    pub fits: ModelFits,
}

/// Execute the full pipeline and write any requested files.
pub fn run_analysis(
    observations: &[SieveObservation],
    source: &str,
    config: &AnalysisConfig,
) -> Result<RunOutput, AppError> {
    // 1) Derive the distribution.
    let distribution = SizeDistribution::from_observations(observations)?;
    info!(sieves = distribution.len(), total = distribution.total_weight, "distribution derived");

    // 2) Fit models.
    let fits = fit_models(&distribution, config.model_spec)?;

    // 3) Model-derived sizes and predictions.
    let sample_p80: Vec<ModelValue> = fits
        .fits
        .iter()
        .filter_map(|params| match size_at_passing(params, P80_PASSING) {
            Ok(value) => Some(ModelValue { model: params.kind(), value }),
            Err(err) => {
                warn!(model = params.kind().display_name(), %err, "no P80 from model");
                None
            }
        })
        .collect();

    let probe = config.probe_size.map(|size| Probe {
        size,
        passing: fits
            .fits
            .iter()
            .map(|params| ModelValue { model: params.kind(), value: predict_passing(params, size) })
            .collect(),
    });

    // 4) Process figures.
    let energy = energy_summary(config, &sample_p80)?;
    let screen = screen_summary(config)?;
    let potential = screen.as_ref().map(|s| {
        format!(
            "{}{}",
            optimization_potential(s).label(),
            config.potential_suffix.as_deref().unwrap_or("")
        )
    });

    let mut summary = AnalysisSummary {
        title: config.title.clone(),
        generated_at: Utc::now(),
        source: source.to_string(),
        distribution,
        fits: fits.fits.clone(),
        skipped: fits
            .skipped
            .iter()
            .map(|(model, reason)| SkippedModel { model: *model, reason: reason.clone() })
            .collect(),
        sample_p80,
        probe,
        energy,
        screen,
        optimization_potential: potential,
        chart: None,
    };

    // 5) Files.
    if let Some(path) = &config.chart_path {
        crate::plot::write_svg_chart(path, &summary.distribution, &summary.fits)?;
        let report = config.report_path.as_deref().or(config.pdf_report_path.as_deref());
        summary.chart = Some(chart_link(path, report));
        info!(path = %path.display(), "chart written");
    }
    if let Some(path) = &config.pdf_report_path {
        crate::report::write_pdf_report(path, &summary)?;
        info!(path = %path.display(), "PDF report written");
    }
    if let Some(path) = &config.report_path {
        crate::report::write_report(path, &summary)?;
        info!(path = %path.display(), "Markdown report written");
    }
    if let Some(path) = &config.export_distribution {
        crate::io::export::write_distribution_csv(path, &summary.distribution, &fits)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_summary_json(path, &summary)?;
    }

    Ok(RunOutput { summary, fits })
}

/// Energy figures need a feed F80; the product P80 is given or read off the fitted sample.
fn energy_summary(
    config: &AnalysisConfig,
    sample_p80: &[ModelValue],
) -> Result<Option<EnergySummary>, AppError> {
    let Some(feed_p80) = config.feed_p80 else {
        if config.energy_consumption.is_some() || config.work_index.is_some() {
            warn!("energy inputs given without a feed F80; skipping energy figures");
        }
        return Ok(None);
    };

    let product_p80 = match config.product_p80 {
        Some(value) => P80Source::Given { value },
        None => {
            let derived = sample_p80
                .iter()
                .find(|v| v.model == config.p80_model)
                .or_else(|| sample_p80.first())
                .ok_or_else(|| AppError::new(3, "No product P80 given and none could be derived from the sample"))?;
            P80Source::Model { kind: derived.model, value: derived.value }
        }
    };
    let p80 = product_p80.value();

    let calculated_work_index = config
        .energy_consumption
        .map(|e| calculate_bond_work_index(e, config.throughput.unwrap_or(0.0), feed_p80, p80))
        .transpose()?;
    let work_index = config.work_index.or(calculated_work_index);
    let energy_required = work_index
        .map(|wi| calculate_energy_required(wi, feed_p80, p80))
        .transpose()?;

    let mill_power_kw = config.throughput.and_then(|tph| {
        energy_required
            .or(config.energy_consumption)
            .map(|e| calculate_mill_power(e, tph))
    });

    info!(feed_p80, product_p80 = p80, ?work_index, ?energy_required, "energy figures computed");

    Ok(Some(EnergySummary {
        feed_p80,
        product_p80,
        energy_consumption: config.energy_consumption,
        calculated_work_index,
        work_index,
        energy_required,
        throughput: config.throughput,
        mill_power_kw,
    }))
}

fn screen_summary(config: &AnalysisConfig) -> Result<Option<ScreenSummary>, AppError> {
    let Some(fractions) = config.screen else {
        return Ok(None);
    };

    let efficiency = calculate_screen_efficiency(
        fractions.feed_undersize,
        fractions.oversize_undersize,
        fractions.undersize_undersize,
    )?;
    let (blinding, threshold) = match config.blinding_threshold {
        Some(threshold) => (detect_blinding(efficiency, threshold), threshold),
        None => (detect_blinding_default(efficiency), DEFAULT_BLINDING_THRESHOLD),
    };
    if blinding.is_blinding {
        warn!(efficiency, threshold, "{}", blinding.message);
    } else {
        info!(efficiency, "screen efficiency computed");
    }

    Ok(Some(ScreenSummary {
        fractions,
        efficiency,
        threshold,
        blinding,
    }))
}

/// Chart reference for the report: bare file name when both share a directory.
fn chart_link(chart: &Path, report: Option<&Path>) -> String {
    let same_dir = report.is_some_and(|r| r.parent() == chart.parent());
    match chart.file_name() {
        Some(name) if same_dir => name.to_string_lossy().into_owned(),
        _ => chart.display().to_string(),
    }
}
