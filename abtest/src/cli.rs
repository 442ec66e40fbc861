//! Command-line interface for abtest.

use crate::config::{Config, OutputFormat, UpliftKind};
use abtest_core::Alternative;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "abtest")]
#[command(about = "Simulate and analyze conversion A/B tests with Welch's t-test")]
#[command(version)]
pub struct Cli {
    /// CSV file with the control group's `converted` column (analysis mode)
    #[arg(long, requires = "treatment_csv")]
    pub control_csv: Option<PathBuf>,

    /// CSV file with the treatment group's `converted` column (analysis mode)
    #[arg(long, requires = "control_csv")]
    pub treatment_csv: Option<PathBuf>,

    /// Number of subjects in the control group
    #[arg(long)]
    pub n_control: Option<usize>,

    /// Number of subjects in the treatment group
    #[arg(long)]
    pub n_treatment: Option<usize>,

    /// Conversion rate of the control group (0.0-1.0)
    #[arg(long)]
    pub baseline_rate: Option<f64>,

    /// Uplift applied to the baseline for the treatment group
    #[arg(long, allow_negative_numbers = true)]
    pub uplift: Option<f64>,

    /// Treat --uplift as relative to the baseline instead of absolute
    #[arg(long)]
    pub relative_uplift: bool,

    /// Seed for reproducible sample generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Significance level for the hypothesis test (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Confidence level for per-group intervals (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Alternative hypothesis: two-sided, greater or less
    #[arg(long)]
    pub alternative: Option<Alternative>,

    /// Report output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Write the generated samples to this CSV file
    #[arg(long, conflicts_with = "control_csv")]
    pub export_data: Option<PathBuf>,

    /// Path to config file (defaults to .abtest.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The control and treatment files to analyze, or `None` to simulate.
    pub fn analysis_files(&self) -> Option<(&Path, &Path)> {
        match (&self.control_csv, &self.treatment_csv) {
            (Some(control), Some(treatment)) => Some((control.as_path(), treatment.as_path())),
            _ => None,
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(n_control) = self.n_control {
            config.simulation.n_control = n_control;
        }
        if let Some(n_treatment) = self.n_treatment {
            config.simulation.n_treatment = n_treatment;
        }
        if let Some(baseline_rate) = self.baseline_rate {
            config.simulation.baseline_rate = baseline_rate;
        }
        if let Some(uplift) = self.uplift {
            config.simulation.uplift = uplift;
        }
        if self.relative_uplift {
            config.simulation.uplift_kind = UpliftKind::Relative;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }

        if let Some(alpha) = self.alpha {
            config.hypothesis.alpha = alpha;
        }
        if let Some(confidence_level) = self.confidence_level {
            config.hypothesis.confidence_level = confidence_level;
        }
        if let Some(alternative) = self.alternative {
            config.hypothesis.alternative = alternative;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.no_color {
            config.output.color = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_config_with_overrides() {
        let cli = Cli::parse_from([
            "abtest",
            "--n-control",
            "5000",
            "--n-treatment",
            "4000",
            "--baseline-rate",
            "0.2",
            "--uplift",
            "0.1",
            "--relative-uplift",
            "--seed",
            "42",
            "--alpha",
            "0.01",
            "--confidence-level",
            "0.99",
            "--alternative",
            "greater",
            "--format",
            "markdown",
            "--no-color",
        ]);

        let mut config = Config::default();
        cli.apply_to_config(&mut config);

        assert_eq!(config.simulation.n_control, 5000);
        assert_eq!(config.simulation.n_treatment, 4000);
        assert_eq!(config.simulation.baseline_rate, 0.2);
        assert_eq!(config.simulation.uplift, 0.1);
        assert_eq!(config.simulation.uplift_kind, UpliftKind::Relative);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.hypothesis.alpha, 0.01);
        assert_eq!(config.hypothesis.confidence_level, 0.99);
        assert_eq!(config.hypothesis.alternative, Alternative::Greater);
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert!(!config.output.color);
    }

    #[test]
    fn test_apply_to_config_without_overrides() {
        let cli = Cli::parse_from(["abtest"]);

        let mut config = Config::default();
        config.simulation.seed = Some(9);
        cli.apply_to_config(&mut config);

        // Values should remain unchanged
        assert_eq!(config.simulation.n_control, 1000);
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(config.hypothesis.alpha, 0.05);
        assert_eq!(config.hypothesis.alternative, Alternative::TwoSided);
        assert!(config.output.color);
    }

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::parse_from(["abtest"]);

        assert!(cli.analysis_files().is_none());
        assert_eq!(cli.seed, None);
        assert_eq!(cli.alternative, None);
        assert_eq!(cli.config, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_negative_uplift() {
        let cli = Cli::parse_from(["abtest", "--uplift", "-0.02"]);
        assert_eq!(cli.uplift, Some(-0.02));
    }

    #[test]
    fn test_cli_parse_analysis_mode() {
        let cli = Cli::parse_from([
            "abtest",
            "--control-csv",
            "control.csv",
            "--treatment-csv",
            "treatment.csv",
            "--verbose",
        ]);

        assert_eq!(
            cli.analysis_files(),
            Some((Path::new("control.csv"), Path::new("treatment.csv")))
        );
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_both_csv_files() {
        let result = Cli::try_parse_from(["abtest", "--control-csv", "control.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_alternative() {
        let result = Cli::try_parse_from(["abtest", "--alternative", "bigger"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_export_conflicts_with_analysis() {
        let result = Cli::try_parse_from([
            "abtest",
            "--control-csv",
            "control.csv",
            "--treatment-csv",
            "treatment.csv",
            "--export-data",
            "out.csv",
        ]);
        assert!(result.is_err());
    }
}
