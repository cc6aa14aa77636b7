//! Command-line parsing for the `grind` comminution and screening analyser.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and formula code. Options with an operational default can also be
//! set through `GRIND_*` environment variables (or a `.env` file).

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ModelKind, ModelSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "grind",
    version,
    about = "Particle size distribution fitting, Bond energy and screen efficiency analysis"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all log output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "PATH", env = "GRIND_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in sample through the full pipeline and write `demo_report.pdf`.
    Demo(DemoArgs),
    /// Fit a sieve CSV and compute energy and screen figures from it.
    Analyze(AnalyzeArgs),
    /// Generate a synthetic sieve CSV from a chosen model.
    Synth(SynthArgs),
}

/// Terminal plot options shared by `demo` and `analyze`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72, env = "GRIND_PLOT_WIDTH")]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20, env = "GRIND_PLOT_HEIGHT")]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// PDF report path.
    #[arg(long, default_value = "demo_report.pdf")]
    pub report: PathBuf,

    /// Also write the report as Markdown.
    #[arg(long, value_name = "MD")]
    pub markdown: Option<PathBuf>,

    /// SVG chart path (defaults to the report path with an `.svg` extension).
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Skip the SVG chart.
    #[arg(long)]
    pub no_chart: bool,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for analysing a sieve CSV.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Sieve CSV with `sieve_size` and `weight_retained` columns.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Only print the loaded rows and derived distribution.
    #[arg(long)]
    pub preview: bool,

    /// Which model(s) to fit.
    #[arg(long, value_enum, default_value_t = ModelSpec::Both, env = "GRIND_MODEL")]
    pub model: ModelSpec,

    /// Model used to read the product P80 off the sample.
    #[arg(long, value_enum, default_value_t = ModelKind::GaudinSchuhmann, env = "GRIND_P80_MODEL")]
    pub p80_model: ModelKind,

    /// Feed F80 (um). Enables the energy section.
    #[arg(long, value_name = "UM")]
    pub feed_p80: Option<f64>,

    /// Product P80 (um). Defaults to the P80 of the fitted sample.
    #[arg(long, value_name = "UM")]
    pub product_p80: Option<f64>,

    /// Report predicted passing at this size (um).
    #[arg(long, value_name = "UM")]
    pub probe: Option<f64>,

    /// Measured specific energy (kWh/t); back-calculates the Bond Work Index.
    #[arg(long, value_name = "KWH_PER_T")]
    pub energy: Option<f64>,

    /// Known Bond Work Index (kWh/t); computes the energy required.
    #[arg(long, value_name = "KWH_PER_T")]
    pub work_index: Option<f64>,

    /// Circuit throughput (t/h); enables mill power.
    #[arg(long, value_name = "TPH")]
    pub throughput: Option<f64>,

    /// Fraction of feed finer than the screen aperture (0-1).
    #[arg(long, requires_all = ["oversize_undersize", "undersize_undersize"])]
    pub feed_undersize: Option<f64>,

    /// Fraction of the oversize stream finer than the aperture (0-1).
    #[arg(long, requires_all = ["feed_undersize", "undersize_undersize"])]
    pub oversize_undersize: Option<f64>,

    /// Fraction of the undersize stream finer than the aperture (0-1).
    #[arg(long, requires_all = ["feed_undersize", "oversize_undersize"])]
    pub undersize_undersize: Option<f64>,

    /// Screen efficiency below which blinding is reported [default: 0.85].
    #[arg(long, env = "GRIND_BLINDING_THRESHOLD")]
    pub blinding_threshold: Option<f64>,

    /// Write a PDF report.
    #[arg(long, value_name = "PDF")]
    pub pdf: Option<PathBuf>,

    /// Write a Markdown report.
    #[arg(long, value_name = "MD")]
    pub report: Option<PathBuf>,

    /// Write an SVG chart of the distribution.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    /// Export the distribution table with fitted values to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full analysis summary to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for synthetic sieve data.
#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Model the sample is drawn from.
    #[arg(long, value_enum, default_value_t = ModelKind::RosinRammler)]
    pub model: ModelKind,

    /// `k` (GS) or `d_char` (RR), um.
    #[arg(long, default_value_t = 600.0)]
    pub size_param: f64,

    /// `m` (GS) or `n` (RR).
    #[arg(long, default_value_t = 1.1)]
    pub shape: f64,

    /// Largest sieve aperture (um).
    #[arg(long, default_value_t = 2000.0)]
    pub top_size: f64,

    /// Number of sieves in the root-2 series.
    #[arg(long, default_value_t = 10)]
    pub sieves: usize,

    /// Total sample mass.
    #[arg(long, default_value_t = 1000.0)]
    pub mass: f64,

    /// Log-normal noise sigma on each retained mass.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42, env = "GRIND_SEED")]
    pub seed: u64,

    /// Output CSV.
    #[arg(short, long, value_name = "CSV", default_value = "synthetic_sieve.csv")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_screen_fractions() {
        let cli = Cli::try_parse_from([
            "grind",
            "-vv",
            "analyze",
            "--input",
            "sieve.csv",
            "--feed-undersize",
            "0.8",
            "--oversize-undersize",
            "0.1",
            "--undersize-undersize",
            "0.95",
            "--no-plot",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.feed_undersize, Some(0.8));
        assert_eq!(args.model, ModelSpec::Both);
        assert!(args.plot.no_plot);
    }

    #[test]
    fn partial_screen_fractions_are_rejected() {
        let res = Cli::try_parse_from(["grind", "analyze", "--input", "a.csv", "--feed-undersize", "0.8"]);
        assert!(res.is_err());
    }
}
