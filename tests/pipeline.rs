//! End-to-end runs through the library: CSV in, report and exports out.

use std::fs;
use std::path::Path;

use grind_curves::app::pipeline::run_analysis;
use grind_curves::data::{demo_observations, generate_sample};
use grind_curves::domain::{
    AnalysisConfig, FittedParams, ModelKind, ModelSpec, P80Source,
    SampleConfig, ScreenFractions,
};
use grind_curves::io::{load_sieve_csv, write_sieve_csv};

fn config(dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        title: "Plant survey".to_string(),
        model_spec: ModelSpec::Both,
        p80_model: ModelKind::GaudinSchuhmann,
        feed_p80: Some(12_000.0),
        product_p80: Some(8_000.0),
        probe_size: Some(800.0),
        energy_consumption: Some(1.85),
        work_index: None,
        throughput: Some(450.0),
        screen: Some(ScreenFractions {
            feed_undersize: 0.8,
            oversize_undersize: 0.1,
            undersize_undersize: 0.95,
        }),
        blinding_threshold: None,
        potential_suffix: Some(" (Demo)".to_string()),
        plot: false,
        plot_width: 60,
        plot_height: 15,
        pdf_report_path: Some(dir.join("report.pdf")),
        report_path: Some(dir.join("report.md")),
        chart_path: Some(dir.join("report.svg")),
        export_distribution: Some(dir.join("distribution.csv")),
        export_json: Some(dir.join("summary.json")),
    }
}

#[test]
fn demo_sample_produces_report_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    let run = run_analysis(&demo_observations(), "built-in demo sample", &cfg).unwrap();

    let expected_wi = 1.85 / (10.0 / 8_000f64.sqrt() - 10.0 / 12_000f64.sqrt());
    let energy = run.summary.energy.as_ref().unwrap();
    assert!((energy.calculated_work_index.unwrap() - expected_wi).abs() < 1e-9);
    assert_eq!(energy.product_p80, P80Source::Given { value: 8_000.0 });
    // Wi back-calculated from E reproduces E for the same sizes.
    assert!((energy.energy_required.unwrap() - 1.85).abs() < 1e-9);
    assert!((energy.mill_power_kw.unwrap() - 1.85 * 450.0).abs() < 1e-6);

    let screen = run.summary.screen.as_ref().unwrap();
    assert!((screen.efficiency - (0.7 / 0.85) * (0.95 / 0.8)).abs() < 1e-12);
    assert!(!screen.blinding.is_blinding);
    assert_eq!(run.summary.optimization_potential.as_deref(), Some("Low (Demo)"));

    let report = fs::read_to_string(dir.path().join("report.md")).unwrap();
    assert!(report.contains("# Plant survey"));
    assert!(report.contains("Bond Work Index"));
    assert!(report.contains("Screen operating normally."));
    assert!(report.contains("](report.svg)"));

    assert!(fs::read_to_string(dir.path().join("report.svg")).unwrap().contains("<svg"));
    assert!(fs::read(dir.path().join("report.pdf")).unwrap().starts_with(b"%PDF-"));

    let csv = fs::read_to_string(dir.path().join("distribution.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + 5);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["fits"].as_array().unwrap().len(), 2);
    assert_eq!(json["probe"]["size"], 800.0);
}

#[test]
fn csv_input_runs_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("sieve.csv");
    fs::write(
        &csv_path,
        "sieve_size,weight_retained,comment\n1000,10,top\n500,20,\n250,oops,bad row\n250,30,\n125,25,\n63,15,pan\n",
    )
    .unwrap();

    let data = load_sieve_csv(&csv_path).unwrap();
    assert_eq!(data.observations.len(), 5);
    assert_eq!(data.row_errors.len(), 1);
    assert_eq!(data.row_errors[0].line, 4);

    let cfg = AnalysisConfig {
        product_p80: None,
        pdf_report_path: None,
        report_path: None,
        chart_path: None,
        export_distribution: None,
        export_json: None,
        ..config(dir.path())
    };
    let run = run_analysis(&data.observations, "sieve.csv", &cfg).unwrap();

    let energy = run.summary.energy.unwrap();
    assert!(matches!(
        energy.product_p80,
        P80Source::Model { kind: ModelKind::GaudinSchuhmann, .. }
    ));
    assert_eq!(run.summary.sample_p80.len(), 2);
}

#[test]
fn synthetic_csv_round_trips_through_fit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    let sample = SampleConfig {
        model: ModelKind::RosinRammler,
        size_param: 600.0,
        shape_param: 1.1,
        top_size: 2000.0,
        sieve_count: 10,
        total_mass: 1000.0,
        noise: 0.0,
        seed: 7,
    };
    write_sieve_csv(&path, &generate_sample(&sample).unwrap()).unwrap();

    let data = load_sieve_csv(&path).unwrap();
    let cfg = AnalysisConfig {
        model_spec: ModelSpec::Rr,
        feed_p80: None,
        energy_consumption: None,
        throughput: None,
        screen: None,
        pdf_report_path: None,
        report_path: None,
        chart_path: None,
        export_distribution: None,
        export_json: None,
        ..config(dir.path())
    };
    let run = run_analysis(&data.observations, "synthetic.csv", &cfg).unwrap();

    let FittedParams::RosinRammler { d_char, n } = run.summary.fits[0] else {
        panic!("expected a Rosin-Rammler fit");
    };
    assert!((d_char - 600.0).abs() / 600.0 < 1e-6, "d_char = {d_char}");
    assert!((n - 1.1).abs() < 1e-6, "n = {n}");
    assert!(run.summary.energy.is_none());
    assert!(run.summary.optimization_potential.is_none());
}

#[test]
fn unusable_sample_fails_with_data_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let observations = vec![
        grind_curves::domain::SieveObservation { sieve_size: 500.0, weight_retained: 0.0 },
        grind_curves::domain::SieveObservation { sieve_size: 250.0, weight_retained: 10.0 },
    ];
    let cfg = AnalysisConfig {
        pdf_report_path: None,
        report_path: None,
        chart_path: None,
        export_distribution: None,
        export_json: None,
        ..config(dir.path())
    };

    let err = run_analysis(&observations, "tiny", &cfg).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}
