//! Report document writer (Markdown).
//!
//! The document mirrors the terminal summary but is laid out for reading and
//! archiving: a key-figures table first, then the sieve data and model detail.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::models::predict_passing;
use crate::report::format::{fmt_p80_source, fmt_params, fmt_size};
use crate::report::AnalysisSummary;

/// Render the summary as a Markdown document.
pub fn render_markdown(summary: &AnalysisSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", summary.title));
    out.push_str(&format!(
        "- generated: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("- source: {}\n\n", summary.source));

    out.push_str("## Key figures\n\n");
    out.push_str("| metric | value |\n| - | - |\n");
    if let Some(energy) = &summary.energy {
        out.push_str(&format!("| P80 feed | {} um |\n", fmt_size(energy.feed_p80)));
        out.push_str(&format!(
            "| P80 product | {} |\n",
            fmt_p80_source(energy.product_p80)
        ));
        if let Some(wi) = energy.work_index {
            out.push_str(&format!("| Bond Work Index | {wi:.2} kWh/t |\n"));
        }
        if let Some(e) = energy.energy_consumption {
            out.push_str(&format!("| Energy consumption | {e:.3} kWh/t |\n"));
        }
        if let Some(w) = energy.energy_required {
            out.push_str(&format!("| Energy required | {w:.3} kWh/t |\n"));
        }
        if let Some(p) = energy.mill_power_kw {
            out.push_str(&format!("| Mill power | {p:.1} kW |\n"));
        }
    }
    for p80 in &summary.sample_p80 {
        out.push_str(&format!(
            "| Sample P80 ({}) | {} um |\n",
            p80.model.short_name(),
            fmt_size(p80.value)
        ));
    }
    if let Some(screen) = &summary.screen {
        out.push_str(&format!(
            "| Screen efficiency | {:.2}% |\n",
            screen.efficiency * 100.0
        ));
        out.push_str(&format!("| Screen status | {} |\n", screen.blinding.message));
    }
    if let Some(label) = &summary.optimization_potential {
        out.push_str(&format!("| Optimization potential | {label} |\n"));
    }

    out.push_str("\n## Sieve analysis\n\n");
    let mut header = String::from("| size (um) | retained | % retained | % passing |");
    let mut rule = String::from("| - | - | - | - |");
    for params in &summary.fits {
        header.push_str(&format!(" {} fit |", params.kind().short_name()));
        rule.push_str(" - |");
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for f in &summary.distribution.fractions {
        out.push_str(&format!(
            "| {} | {:.3} | {:.2} | {:.2} |",
            fmt_size(f.sieve_size),
            f.weight_retained,
            f.percent_retained,
            f.cumulative_passing
        ));
        for params in &summary.fits {
            out.push_str(&format!(" {:.2} |", predict_passing(params, f.sieve_size)));
        }
        out.push('\n');
    }

    out.push_str("\n## Distribution models\n\n");
    for params in &summary.fits {
        out.push_str(&format!("- {}\n", fmt_params(params)));
    }
    for skipped in &summary.skipped {
        out.push_str(&format!(
            "- {}: not fitted ({})\n",
            skipped.model.display_name(),
            skipped.reason
        ));
    }
    if let Some(probe) = &summary.probe {
        for p in &probe.passing {
            out.push_str(&format!(
                "- {} predicts {:.2}% passing at {} um\n",
                p.model.display_name(),
                p.value,
                fmt_size(probe.size)
            ));
        }
    }

    if let Some(chart) = &summary.chart {
        out.push_str(&format!("\n![Particle size distribution]({chart})\n"));
    }

    out
}

/// Write the Markdown report to `path`.
pub fn write_report(path: &Path, summary: &AnalysisSummary) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report '{}': {e}", path.display())))?;
    file.write_all(render_markdown(summary).as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write report: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::summary;

    #[test]
    fn markdown_lists_key_figures_and_models() {
        let md = render_markdown(&summary());

        assert!(md.starts_with("# Mill 2 survey\n"));
        assert!(md.contains("- generated: 2024-03-01 08:30:00 UTC"));
        assert!(md.contains("| Bond Work Index | 90.17 kWh/t |"));
        assert!(md.contains("| Mill power | 832.5 kW |"));
        assert!(md.contains("| size (um) | retained | % retained | % passing | GS fit |"));
        assert!(md.contains("- Rosin-Rammler: not fitted (too few points)"));
        assert!(md.contains("![Particle size distribution](survey.svg)"));
        assert!(!md.contains("Screen efficiency"));
    }

    #[test]
    fn report_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&path, &summary()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_markdown(&summary()));
    }
}
