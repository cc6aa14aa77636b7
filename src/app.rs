//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults and parses CLI arguments
//! - installs logging
//! - turns arguments into an `AnalysisConfig` and runs the pipeline
//! - prints summaries and plots

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, Cli, Command, DemoArgs, SynthArgs};
use crate::domain::{
    AnalysisConfig, ModelKind, ModelSpec, SampleConfig, ScreenFractions,
    SizeDistribution,
};
use crate::error::AppError;

pub mod pipeline;

/// Demo assumptions: feed F80, product P80 (um), specific energy (kWh/t), throughput (t/h).
const DEMO_FEED_P80: f64 = 12_000.0;
const DEMO_PRODUCT_P80: f64 = 8_000.0;
const DEMO_ENERGY: f64 = 1.85;
const DEMO_THROUGHPUT: f64 = 450.0;
const DEMO_PROBE_SIZE: f64 = 800.0;
const DEMO_SCREEN: ScreenFractions = ScreenFractions {
    feed_undersize: 0.8,
    oversize_undersize: 0.1,
    undersize_undersize: 0.95,
};

/// Entry point for the `grind` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `grind --demo` and `grind --input X` predate the subcommands; clap needs a
    // subcommand name, so rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    if argv.len() < 2 {
        Cli::command()
            .print_help()
            .map_err(|e| AppError::new(2, format!("Failed to print help: {e}")))?;
        println!();
        return Ok(());
    }
    let cli = Cli::parse_from(argv);

    crate::logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    match cli.command {
        Command::Demo(args) => handle_demo(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = demo_config(&args);
    let observations = crate::data::demo_observations();
    let run = pipeline::run_analysis(&observations, "built-in demo sample", &config)?;

    print_run(&run, &config);
    for path in [&config.pdf_report_path, &config.report_path].into_iter().flatten() {
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let data = crate::io::load_sieve_csv(&args.input)?;
    info!(
        path = %data.path.display(),
        rows = data.rows_read,
        valid = data.observations.len(),
        "sieve data loaded"
    );

    if args.preview {
        return preview(&data);
    }

    let config = fit_config_from_args(&args);
    let source = args.input.display().to_string();
    let run = pipeline::run_analysis(&data.observations, &source, &config)?;

    if !data.row_errors.is_empty() {
        println!("Skipped {} invalid row(s) in {}", data.row_errors.len(), source);
    }
    print_run(&run, &config);
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        model: args.model,
        size_param: args.size_param,
        shape_param: args.shape,
        top_size: args.top_size,
        sieve_count: args.sieves,
        total_mass: args.mass,
        noise: args.noise,
        seed: args.seed,
    };
    let observations = crate::data::generate_sample(&config)?;
    crate::io::write_sieve_csv(&args.output, &observations)?;
    println!(
        "Wrote {} sieves ({} {}={}, shape={}) to {}",
        observations.len(),
        config.model.display_name(),
        match config.model {
            ModelKind::GaudinSchuhmann => "k",
            ModelKind::RosinRammler => "d_char",
        },
        config.size_param,
        config.shape_param,
        args.output.display()
    );
    Ok(())
}

fn print_run(run: &pipeline::RunOutput, config: &AnalysisConfig) {
    println!("{}", crate::report::format_run_summary(&run.summary));
    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.summary.distribution,
            &run.summary.fits,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }
}

fn preview(data: &crate::io::SieveData) -> Result<(), AppError> {
    println!("Loaded {} sieve rows from {}", data.observations.len(), data.path.display());
    for row in &data.row_errors {
        println!("  line {}: {}", row.line, row.message);
    }
    let dist = SizeDistribution::from_observations(&data.observations)?;
    println!("{}", crate::report::format_distribution_table(&dist, &[]));
    Ok(())
}

pub fn fit_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    let screen = match (args.feed_undersize, args.oversize_undersize, args.undersize_undersize) {
        (Some(f), Some(o), Some(u)) => Some(ScreenFractions {
            feed_undersize: f,
            oversize_undersize: o,
            undersize_undersize: u,
        }),
        _ => None,
    };

    AnalysisConfig {
        title: "Comminution & Screening Analysis".to_string(),
        model_spec: args.model,
        p80_model: args.p80_model,
        feed_p80: args.feed_p80,
        product_p80: args.product_p80,
        probe_size: args.probe,
        energy_consumption: args.energy,
        work_index: args.work_index,
        throughput: args.throughput,
        screen,
        blinding_threshold: args.blinding_threshold,
        potential_suffix: None,
        plot: args.plot.plot && !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        pdf_report_path: args.pdf.clone(),
        report_path: args.report.clone(),
        chart_path: args.chart.clone(),
        export_distribution: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

/// The fixed demo run: built-in sample plus the demo plant assumptions.
pub fn demo_config(args: &DemoArgs) -> AnalysisConfig {
    let chart_path = if args.no_chart {
        None
    } else {
        Some(args.chart.clone().unwrap_or_else(|| chart_beside(&args.report)))
    };

    AnalysisConfig {
        title: "Comminution & Screening Analysis (Demo)".to_string(),
        model_spec: ModelSpec::Both,
        p80_model: ModelKind::GaudinSchuhmann,
        feed_p80: Some(DEMO_FEED_P80),
        product_p80: Some(DEMO_PRODUCT_P80),
        probe_size: Some(DEMO_PROBE_SIZE),
        energy_consumption: Some(DEMO_ENERGY),
        work_index: None,
        throughput: Some(DEMO_THROUGHPUT),
        screen: Some(DEMO_SCREEN),
        blinding_threshold: None,
        potential_suffix: Some(" (Demo)".to_string()),
        plot: args.plot.plot && !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        pdf_report_path: Some(args.report.clone()),
        report_path: args.markdown.clone(),
        chart_path,
        export_distribution: None,
        export_json: None,
    }
}

fn chart_beside(report: &Path) -> PathBuf {
    if report.extension().is_some_and(|ext| ext == "svg") {
        warn!(path = %report.display(), "report path has an .svg extension; chart gets a suffix");
        return report.with_extension("chart.svg");
    }
    report.with_extension("svg")
}

/// Rewrite argv for the flag-style entry points.
///
/// Rules:
/// - `grind --demo ...`          -> `grind demo ...`
/// - `grind --input X ...`       -> `grind analyze --input X ...`
/// - global flags before either are kept in place
/// - anything else               -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let mut pos = 1;
    while let Some(arg) = argv.get(pos) {
        if arg == "--log-file" {
            pos += 2;
        } else if is_global_flag(arg) {
            pos += 1;
        } else {
            break;
        }
    }
    let Some(arg) = argv.get(pos).cloned() else {
        return argv;
    };

    if arg == "--demo" {
        argv[pos] = "demo".to_string();
    } else if arg == "--input" || arg == "-i" || arg.starts_with("--input=") {
        argv.insert(pos, "analyze".to_string());
    }
    argv
}

fn is_global_flag(arg: &str) -> bool {
    match arg {
        "-q" | "--quiet" | "--verbose" => true,
        _ if arg.starts_with("--log-file=") => true,
        _ => arg.len() > 1 && arg.starts_with("-v") && arg[1..].chars().all(|c| c == 'v'),
    }
}
