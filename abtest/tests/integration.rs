//! Integration tests for abtest.
//!
//! These tests drive the full pipeline: configuration, sample generation or
//! CSV loading, statistics, the t-test and report rendering.

use abtest::data::{load_converted_csv_path, write_samples_csv_path};
use abtest::{
    generate_samples, run_test, summarize, AbTestError, Alternative, Analysis, Config,
    OutputFormat, Reporter, Uplift, Verdict,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn converted_csv(outcomes: &[u8]) -> NamedTempFile {
    let mut content = String::from("user_id,converted\n");
    for (i, outcome) in outcomes.iter().enumerate() {
        content.push_str(&format!("{},{}\n", i, outcome));
    }
    csv_file(&content)
}

/// Baseline 10%, absolute uplift 5%, 1000 subjects per group, seed 42.
#[test]
fn test_reference_scenario() {
    let first = generate_samples(0.10, Uplift::Absolute(0.05), 1000, 1000, Some(42)).unwrap();
    let second = generate_samples(0.10, Uplift::Absolute(0.05), 1000, 1000, Some(42)).unwrap();
    assert_eq!(first, second);

    let (control, treatment) = first;
    for sample in [&control, &treatment] {
        let stats = summarize(sample, 0.95).unwrap();
        assert!((0.05..=0.20).contains(&stats.rate));
        assert!(stats.ci_lower <= stats.rate && stats.rate <= stats.ci_upper);
    }
}

/// Baseline 10%, absolute uplift 10%, 5000 subjects per group.
#[test]
fn test_separated_scenario_is_significant() {
    let (control, treatment) =
        generate_samples(0.10, Uplift::Absolute(0.10), 5000, 5000, Some(42)).unwrap();
    let result = run_test(&control, &treatment, Alternative::TwoSided, 0.05).unwrap();

    assert!(result.p_value < 0.01);
    assert!(result.is_significant);
}

#[test]
fn test_single_observation_is_insufficient() {
    let (control, treatment) =
        generate_samples(0.5, Uplift::Absolute(0.0), 1, 100, Some(1)).unwrap();
    let result = run_test(&control, &treatment, Alternative::TwoSided, 0.05);
    assert!(matches!(result, Err(AbTestError::InsufficientData { .. })));
}

#[test]
fn test_analyze_uploaded_files() {
    let control = converted_csv(&[0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
    let treatment = converted_csv(&[1, 0, 1, 1, 0, 1, 1, 0, 1, 1]);

    let analysis = Analysis::from_config(&Config::default()).unwrap();
    let report = analysis
        .analyze_files(control.path(), treatment.path())
        .unwrap();

    assert_eq!(report.control.stats.count, 10);
    assert_eq!(report.control.stats.successes, 2);
    assert_eq!(report.treatment.stats.successes, 7);
    assert_eq!(report.control.config.baseline_rate, None);
    assert!(report.test.t_statistic > 0.0);
    assert!(report.narrative.contains("Welch's t-test"));
}

#[test]
fn test_uploaded_value_two_is_rejected() {
    let control = converted_csv(&[0, 1, 2, 0]);
    let treatment = converted_csv(&[0, 1, 1, 0]);

    let analysis = Analysis::from_config(&Config::default()).unwrap();
    let err = analysis
        .analyze_files(control.path(), treatment.path())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AbTestError>(),
        Some(AbTestError::Validation { row: 3, .. })
    ));
    assert!(format!("{:#}", err).contains("Failed to load control data"));
}

#[test]
fn test_uploaded_file_without_converted_column() {
    let control = csv_file("user_id,clicked\n0,1\n1,0\n");
    let treatment = converted_csv(&[0, 1, 1, 0]);

    let analysis = Analysis::from_config(&Config::default()).unwrap();
    let err = analysis
        .analyze_files(control.path(), treatment.path())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AbTestError>(),
        Some(AbTestError::Validation { row: 0, .. })
    ));
}

#[test]
fn test_exported_samples_reload() {
    let mut config = Config::default();
    config.simulation.n_control = 300;
    config.simulation.n_treatment = 200;
    config.simulation.seed = Some(5);

    let analysis = Analysis::from_config(&config).unwrap();
    let simulation = analysis.run_simulation().unwrap();

    let file = NamedTempFile::new().unwrap();
    write_samples_csv_path(file.path(), &simulation.control, &simulation.treatment).unwrap();

    let combined = load_converted_csv_path(file.path()).unwrap();
    assert_eq!(combined.len(), 500);
    assert_eq!(
        combined.successes(),
        simulation.control.successes() + simulation.treatment.successes()
    );
}

#[test]
fn test_one_sided_simulation() {
    let mut config = Config::default();
    config.simulation.baseline_rate = 0.30;
    config.simulation.uplift = -0.10;
    config.simulation.n_control = 4000;
    config.simulation.n_treatment = 4000;
    config.simulation.seed = Some(17);
    config.hypothesis.alternative = Alternative::Less;

    let analysis = Analysis::from_config(&config).unwrap();
    let report = analysis.run_simulation().unwrap().report;

    assert!(report.test.is_significant);
    assert_eq!(report.verdict(), Verdict::Decrease);
    assert!(report.narrative.contains("**decrease**"));
}

#[test]
fn test_rendered_outputs() {
    let mut config = Config::default();
    config.simulation.seed = Some(42);
    config.simulation.uplift = 0.05;

    let analysis = Analysis::from_config(&config).unwrap();
    let report = analysis.run_simulation().unwrap().report;

    config.output.color = false;
    for format in [OutputFormat::Terminal, OutputFormat::Markdown, OutputFormat::Json] {
        config.output.format = format;

        let mut buffer = Vec::new();
        config
            .output
            .reporter()
            .write_report(&mut buffer, &report)
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();

        match format {
            OutputFormat::Terminal => assert!(output.contains("Result:")),
            OutputFormat::Markdown => assert!(output.contains("### Conclusion:")),
            OutputFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&output).unwrap();
                assert_eq!(value["control"]["stats"]["count"], 1000);
            }
        }
    }
}
