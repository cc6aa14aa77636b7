//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - rendered into reports

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cumulative passing percentage used for F80/P80.
pub const P80_PASSING: f64 = 80.0;

/// Efficiency below which a screen is flagged as blinding.
pub const DEFAULT_BLINDING_THRESHOLD: f64 = 0.85;

/// Concrete distribution model kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ModelKind {
    #[serde(rename = "gaudin-schuhmann")]
    #[value(name = "gs")]
    GaudinSchuhmann,
    #[serde(rename = "rosin-rammler")]
    #[value(name = "rr")]
    RosinRammler,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::GaudinSchuhmann, ModelKind::RosinRammler];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::GaudinSchuhmann => "Gaudin-Schuhmann",
            ModelKind::RosinRammler => "Rosin-Rammler",
        }
    }

    /// Short label for table columns.
    pub fn short_name(self) -> &'static str {
        match self {
            ModelKind::GaudinSchuhmann => "GS",
            ModelKind::RosinRammler => "RR",
        }
    }
}

/// Which model(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Gs,
    Rr,
    Both,
}

impl ModelSpec {
    pub fn kinds(self) -> Vec<ModelKind> {
        match self {
            ModelSpec::Gs => vec![ModelKind::GaudinSchuhmann],
            ModelSpec::Rr => vec![ModelKind::RosinRammler],
            ModelSpec::Both => ModelKind::ALL.to_vec(),
        }
    }
}

/// One raw sieve reading: the aperture and the mass retained on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieveObservation {
    /// Aperture size (µm).
    pub sieve_size: f64,
    /// Mass retained on this sieve (any consistent unit).
    pub weight_retained: f64,
}

/// A sieve reading with its derived percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeFraction {
    pub sieve_size: f64,
    pub weight_retained: f64,
    pub percent_retained: f64,
    pub cumulative_passing: f64,
}

/// A particle-size distribution derived from sieve readings.
///
/// Fractions are ordered by sieve size, largest first, so cumulative passing is
/// non-increasing down the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub fractions: Vec<SizeFraction>,
    pub total_weight: f64,
}

impl SizeDistribution {
    pub fn sizes(&self) -> Vec<f64> {
        self.fractions.iter().map(|f| f.sieve_size).collect()
    }

    pub fn passing(&self) -> Vec<f64> {
        self.fractions.iter().map(|f| f.cumulative_passing).collect()
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

/// Fitted model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum FittedParams {
    /// `k`: size modulus (100% passing size), `m`: distribution modulus.
    GaudinSchuhmann { k: f64, m: f64 },
    /// `d_char`: characteristic size (~63.2% passing), `n`: uniformity coefficient.
    RosinRammler { d_char: f64, n: f64 },
}

impl FittedParams {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedParams::GaudinSchuhmann { .. } => ModelKind::GaudinSchuhmann,
            FittedParams::RosinRammler { .. } => ModelKind::RosinRammler,
        }
    }

    /// `(scale, shape)`: (k, m) or (d_char, n).
    pub fn scale_shape(&self) -> (f64, f64) {
        match *self {
            FittedParams::GaudinSchuhmann { k, m } => (k, m),
            FittedParams::RosinRammler { d_char, n } => (d_char, n),
        }
    }

    /// Parameter names matching `scale_shape`.
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self {
            FittedParams::GaudinSchuhmann { .. } => ("k", "m"),
            FittedParams::RosinRammler { .. } => ("d_char", "n"),
        }
    }
}

/// Undersize fractions (0–1) of the three screen streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenFractions {
    /// Fraction of feed finer than the aperture.
    pub feed_undersize: f64,
    /// Fraction of the oversize stream finer than the aperture (misplaced fines).
    pub oversize_undersize: f64,
    /// Fraction of the undersize stream finer than the aperture.
    pub undersize_undersize: f64,
}

/// Qualitative label for how much a circuit could gain from attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationPotential {
    High,
    Moderate,
    Low,
}

impl OptimizationPotential {
    pub fn label(self) -> &'static str {
        match self {
            OptimizationPotential::High => "High",
            OptimizationPotential::Moderate => "Moderate",
            OptimizationPotential::Low => "Low",
        }
    }
}

/// Where the product P80 used for energy figures comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum P80Source {
    /// Supplied by the user (or the demo assumptions).
    Given { value: f64 },
    /// Read off a fitted model at 80% passing.
    Model { kind: ModelKind, value: f64 },
}

impl P80Source {
    pub fn value(self) -> f64 {
        match self {
            P80Source::Given { value } | P80Source::Model { value, .. } => value,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults), or from the demo preset.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Label printed in report headers.
    pub title: String,
    pub model_spec: ModelSpec,
    /// Model used to derive product P80 from the sample when none is given.
    pub p80_model: ModelKind,

    /// Feed F80 (µm).
    pub feed_p80: Option<f64>,
    /// Product P80 override (µm); derived from the fitted sample otherwise.
    pub product_p80: Option<f64>,
    /// Size (µm) at which to report the predicted passing percentage.
    pub probe_size: Option<f64>,

    /// Measured specific energy (kWh/t), used to back-calculate Wi.
    pub energy_consumption: Option<f64>,
    /// Known Bond Work Index (kWh/t), used to compute energy required.
    pub work_index: Option<f64>,
    /// Circuit throughput (t/h).
    pub throughput: Option<f64>,

    pub screen: Option<ScreenFractions>,
    /// Blinding threshold; the 0.85 default applies when unset.
    pub blinding_threshold: Option<f64>,
    /// Appended to the optimization label (e.g. " (Demo)").
    pub potential_suffix: Option<String>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// PDF report.
    pub pdf_report_path: Option<PathBuf>,
    /// Markdown report.
    pub report_path: Option<PathBuf>,
    pub chart_path: Option<PathBuf>,
    pub export_distribution: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Parameters for synthetic sieve data generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub model: ModelKind,
    /// `k` (GS) or `d_char` (RR), µm.
    pub size_param: f64,
    /// `m` (GS) or `n` (RR).
    pub shape_param: f64,
    /// Largest sieve aperture (µm).
    pub top_size: f64,
    /// Number of sieves in the √2 series.
    pub sieve_count: usize,
    /// Total sample mass.
    pub total_mass: f64,
    /// Log-normal noise sigma on each retained mass (0 = exact).
    pub noise: f64,
    pub seed: u64,
}
