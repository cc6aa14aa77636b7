//! SVG chart of the size distribution, written next to the report.
//!
//! Log-size x axis (plotted as `log10(size)` with tick labels formatted back
//! to micrometres), cumulative passing on y. Observed sieve points are drawn as
//! circles, each fitted model as a line.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FittedParams, ModelKind, SizeDistribution};
use crate::error::AppError;
use crate::models::predict_passing;

const CHART_SIZE: (u32, u32) = (800, 500);
const CURVE_SAMPLES: usize = 200;

/// Render the chart to an SVG file.
pub fn write_svg_chart(path: &Path, dist: &SizeDistribution, fits: &[FittedParams]) -> Result<(), AppError> {
    draw_chart(path, dist, fits)
        .map_err(|e| AppError::new(2, format!("Failed to draw chart '{}': {e}", path.display())))
}

fn draw_chart(
    path: &Path,
    dist: &SizeDistribution,
    fits: &[FittedParams],
) -> Result<(), Box<dyn std::error::Error>> {
    let (x0, x1) = log_bounds(dist);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Particle size distribution", ("sans-serif", 20))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, 0.0..100.0)?;

    chart
        .configure_mesh()
        .x_desc("Sieve size (um)")
        .y_desc("Cumulative passing (%)")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{:.0}", 10f64.powf(*v)))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    for params in fits {
        let color = curve_color(params.kind());
        let curve = (0..CURVE_SAMPLES).filter_map(|i| {
            let u = i as f64 / (CURVE_SAMPLES as f64 - 1.0);
            let lx = x0 + u * (x1 - x0);
            let y = predict_passing(params, 10f64.powf(lx));
            (y.is_finite() && (0.0..=100.0).contains(&y)).then_some((lx, y))
        });
        chart
            .draw_series(LineSeries::new(curve, color.stroke_width(2)))?
            .label(params.kind().display_name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart.draw_series(
        dist.fractions
            .iter()
            .map(|f| Circle::new((f.sieve_size.log10(), f.cumulative_passing), 4, BLACK.filled())),
    )?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

fn curve_color(kind: ModelKind) -> RGBColor {
    match kind {
        ModelKind::GaudinSchuhmann => RGBColor(31, 119, 180),
        ModelKind::RosinRammler => RGBColor(214, 39, 40),
    }
}

/// Padded `log10(size)` bounds covering every sieve.
fn log_bounds(dist: &SizeDistribution) -> (f64, f64) {
    let logs = dist.fractions.iter().map(|f| f.sieve_size.log10());
    let min = logs.clone().fold(f64::INFINITY, f64::min);
    let max = logs.fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return (0.0, 4.0);
    }
    let pad = 0.05 * (max - min);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo_observations;

    #[test]
    fn chart_is_written_as_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let dist = SizeDistribution::from_observations(&demo_observations()).unwrap();
        let fits = [
            FittedParams::GaudinSchuhmann { k: 1100.0, m: 0.9 },
            FittedParams::RosinRammler { d_char: 450.0, n: 1.2 },
        ];

        write_svg_chart(&path, &dist, &fits).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Rosin-Rammler"));
    }

    #[test]
    fn bounds_are_padded_around_sieves() {
        let dist = SizeDistribution::from_observations(&demo_observations()).unwrap();
        let (lo, hi) = log_bounds(&dist);
        assert!(lo < 63f64.log10());
        assert!(hi > 3.0);
    }
}
