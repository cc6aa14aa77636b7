//! Formatted terminal output.

use crate::domain::{FittedParams, P80Source, SizeDistribution};
use crate::models::predict_passing;
use crate::report::{AnalysisSummary, EnergySummary, ScreenSummary};

/// Format the full run summary (sample table + fits + process figures).
pub fn format_run_summary(summary: &AnalysisSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", summary.title));
    out.push_str(&format!("Source: {}\n", summary.source));
    out.push_str(&format!(
        "Sieves: n={} | size=[{}, {}] um | total mass={:.3}\n",
        summary.distribution.len(),
        fmt_size(summary.distribution.fractions.last().map_or(f64::NAN, |f| f.sieve_size)),
        fmt_size(summary.distribution.fractions.first().map_or(f64::NAN, |f| f.sieve_size)),
        summary.distribution.total_weight,
    ));
    out.push('\n');
    out.push_str(&format_distribution_table(&summary.distribution, &summary.fits));

    out.push_str("\nModel fits:\n");
    for params in &summary.fits {
        out.push_str(&format!("- {}\n", fmt_params(params)));
    }
    for skipped in &summary.skipped {
        out.push_str(&format!(
            "  (skipped {}) {}\n",
            skipped.model.display_name(),
            skipped.reason
        ));
    }
    for p80 in &summary.sample_p80 {
        out.push_str(&format!(
            "- {} P80 of sample: {} um\n",
            p80.model.short_name(),
            fmt_size(p80.value)
        ));
    }

    if let Some(probe) = &summary.probe {
        out.push_str(&format!("\nPredicted passing at {} um:\n", fmt_size(probe.size)));
        for p in &probe.passing {
            out.push_str(&format!("- {:<18} {:.2}%\n", p.model.display_name(), p.value));
        }
    }

    if let Some(energy) = &summary.energy {
        out.push_str("\nComminution energy:\n");
        out.push_str(&format_energy(energy));
    }

    if let Some(screen) = &summary.screen {
        out.push_str("\nScreening:\n");
        out.push_str(&format_screen(screen));
    }

    if let Some(label) = &summary.optimization_potential {
        out.push_str(&format!("\nOptimization potential: {label}\n"));
    }

    out
}

/// Sieve table with derived percentages and one fitted column per model.
pub fn format_distribution_table(dist: &SizeDistribution, fits: &[FittedParams]) -> String {
    let mut out = String::new();

    let mut header = format!(
        "{:>10} {:>10} {:>10} {:>10}",
        "size_um", "retained", "%ret", "%pass"
    );
    let mut rule = format!("{:-<10} {:-<10} {:-<10} {:-<10}", "", "", "", "");
    for params in fits {
        header.push_str(&format!(" {:>10}", format!("fit_{}", params.kind().short_name())));
        rule.push_str(&format!(" {:-<10}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for f in &dist.fractions {
        let mut row = format!(
            "{:>10} {:>10.3} {:>10.2} {:>10.2}",
            fmt_size(f.sieve_size),
            f.weight_retained,
            f.percent_retained,
            f.cumulative_passing
        );
        for params in fits {
            row.push_str(&format!(" {:>10.2}", predict_passing(params, f.sieve_size)));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

pub(crate) fn format_energy(energy: &EnergySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("- Feed F80: {} um\n", fmt_size(energy.feed_p80)));
    out.push_str(&format!("- Product P80: {}\n", fmt_p80_source(energy.product_p80)));
    if let Some(e) = energy.energy_consumption {
        out.push_str(&format!("- Energy consumption: {e:.3} kWh/t\n"));
    }
    if let Some(wi) = energy.calculated_work_index {
        out.push_str(&format!("- Bond Work Index: {wi:.2} kWh/t\n"));
    } else if let Some(wi) = energy.work_index {
        out.push_str(&format!("- Bond Work Index (given): {wi:.2} kWh/t\n"));
    }
    if let Some(w) = energy.energy_required {
        out.push_str(&format!("- Energy required: {w:.3} kWh/t\n"));
    }
    if let Some(t) = energy.throughput {
        out.push_str(&format!("- Throughput: {t:.1} t/h\n"));
    }
    if let Some(p) = energy.mill_power_kw {
        out.push_str(&format!("- Mill power: {p:.1} kW\n"));
    }
    out
}

pub(crate) fn format_screen(screen: &ScreenSummary) -> String {
    let f = &screen.fractions;
    let mut out = String::new();
    out.push_str(&format!(
        "- Undersize fractions: feed={:.3} oversize={:.3} undersize={:.3}\n",
        f.feed_undersize, f.oversize_undersize, f.undersize_undersize
    ));
    out.push_str(&format!("- Screen efficiency: {:.2}%\n", screen.efficiency * 100.0));
    out.push_str(&format!(
        "- Blinding check (threshold {:.2}): {}\n",
        screen.threshold, screen.blinding.message
    ));
    out
}

pub(crate) fn fmt_params(params: &FittedParams) -> String {
    let (scale, shape) = params.scale_shape();
    let (scale_label, shape_label) = params.labels();
    format!(
        "{}: {scale_label}={} um, {shape_label}={shape:.4}",
        params.kind().display_name(),
        fmt_size(scale)
    )
}

pub(crate) fn fmt_p80_source(source: P80Source) -> String {
    match source {
        P80Source::Given { value } => format!("{} um (given)", fmt_size(value)),
        P80Source::Model { kind, value } => {
            format!("{} um (from {} fit)", fmt_size(value), kind.display_name())
        }
    }
}

/// Sizes: whole micrometres when large, two decimals otherwise.
pub(crate) fn fmt_size(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
