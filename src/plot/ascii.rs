//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x axis is `log10(size)`, the usual way sieve curves are drawn.
//!
//! Plot elements:
//! - observed cumulative passing: `o`
//! - Gaudin-Schuhmann fit: `-`
//! - Rosin-Rammler fit: `~`

use crate::domain::{FittedParams, ModelKind, SizeDistribution};
use crate::models::predict_passing;

/// Render observed passing and fitted curves.
pub fn render_ascii_plot(dist: &SizeDistribution, fits: &[FittedParams], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (lx_min, lx_max) = log_size_range(dist).unwrap_or((0.0, 1.0));

    let curves: Vec<(char, Vec<(f64, f64)>)> = fits
        .iter()
        .map(|params| (curve_char(params.kind()), sample_curve(params, lx_min, lx_max, width)))
        .collect();

    let (y_min, y_max) = y_range(dist, &curves).unwrap_or((0.0, 100.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curves first (so points can overlay).
    for (ch, curve) in &curves {
        draw_curve(&mut grid, curve, lx_min, lx_max, y_min, y_max, *ch);
    }

    for f in &dist.fractions {
        let x = map_x(f.sieve_size.log10(), lx_min, lx_max, width);
        let y = map_y(f.cumulative_passing, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: size=[{:.1}, {:.1}] um (log) | passing=[{y_min:.1}, {y_max:.1}]%\n",
        10f64.powf(lx_min),
        10f64.powf(lx_max)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn curve_char(kind: ModelKind) -> char {
    match kind {
        ModelKind::GaudinSchuhmann => '-',
        ModelKind::RosinRammler => '~',
    }
}

fn log_size_range(dist: &SizeDistribution) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for f in &dist.fractions {
        let lx = f.sieve_size.log10();
        min_x = min_x.min(lx);
        max_x = max_x.max(lx);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn sample_curve(params: &FittedParams, lx_min: f64, lx_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let lx = lx_min + u * (lx_max - lx_min);
        let y = predict_passing(params, 10f64.powf(lx));
        if y.is_finite() {
            out.push((lx, y));
        }
    }
    out
}

fn y_range(dist: &SizeDistribution, curves: &[(char, Vec<(f64, f64)>)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for f in &dist.fractions {
        min_y = min_y.min(f.cumulative_passing);
        max_y = max_y.max(f.cumulative_passing);
    }
    for (_, curve) in curves {
        for &(_, y) in curve {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let xx = map_x(x, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, xx, yy, ch);
        } else if grid[yy][xx] == ' ' {
            grid[yy][xx] = ch;
        }
        prev = Some((xx, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SieveObservation;

    #[test]
    fn plot_golden_snapshot_small() {
        // m=0 draws a flat 100% line across the top row.
        let dist = SizeDistribution::from_observations(&[
            SieveObservation { sieve_size: 1000.0, weight_retained: 50.0 },
            SieveObservation { sieve_size: 10.0, weight_retained: 50.0 },
        ])
        .unwrap();
        let fits = [FittedParams::GaudinSchuhmann { k: 1000.0, m: 0.0 }];

        let txt = render_ascii_plot(&dist, &fits, 10, 5);
        let expected = concat!(
            "Plot: size=[10.0, 1000.0] um (log) | passing=[-5.0, 105.0]%\n",
            "----------\n",
            "          \n",
            "         o\n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }
}
