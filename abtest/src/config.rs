//! Configuration loading for abtest.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use abtest_core::{
    Alternative, JsonReporter, MarkdownReporter, Reporter, SimulationParams, TerminalReporter,
    Uplift, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_THRESHOLD,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for abtest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parameters of the synthetic experiment.
    pub simulation: SimulationConfig,
    /// Settings for interval estimation and hypothesis testing.
    pub hypothesis: HypothesisConfig,
    /// How the report is rendered.
    pub output: OutputConfig,
}

/// How the `uplift` value is applied to the baseline rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpliftKind {
    /// `baseline + uplift`
    #[default]
    Absolute,
    /// `baseline * (1 + uplift)`
    Relative,
}

/// Configuration of the synthetic experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of subjects in the control group.
    pub n_control: usize,
    /// Number of subjects in the treatment group.
    pub n_treatment: usize,
    /// Conversion rate of the control group.
    pub baseline_rate: f64,
    /// Difference applied to the baseline for the treatment group.
    pub uplift: f64,
    pub uplift_kind: UpliftKind,
    /// Seed for reproducible generation; unseeded runs draw from entropy.
    pub seed: Option<u64>,
}

/// Configuration for statistical hypothesis testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisConfig {
    /// Significance level the p-value is compared against.
    pub alpha: f64,
    /// Confidence level of the per-group intervals.
    pub confidence_level: f64,
    pub alternative: Alternative,
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Markdown,
    Json,
}

/// Configuration of report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Whether terminal output uses colors.
    pub color: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_control: 1000,
            n_treatment: 1000,
            baseline_rate: 0.10,
            uplift: 0.0,
            uplift_kind: UpliftKind::Absolute,
            seed: None,
        }
    }
}

impl Default for HypothesisConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_THRESHOLD,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            alternative: Alternative::TwoSided,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Terminal,
            color: true,
        }
    }
}

impl SimulationConfig {
    pub fn uplift(&self) -> Uplift {
        match self.uplift_kind {
            UpliftKind::Absolute => Uplift::Absolute(self.uplift),
            UpliftKind::Relative => Uplift::Relative(self.uplift),
        }
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            baseline_rate: self.baseline_rate,
            uplift: self.uplift(),
            n_control: self.n_control,
            n_treatment: self.n_treatment,
            seed: self.seed,
        }
    }
}

impl OutputConfig {
    /// The reporter for the configured format.
    pub fn reporter(&self) -> Box<dyn Reporter> {
        match self.format {
            OutputFormat::Terminal if self.color => Box::new(TerminalReporter::new()),
            OutputFormat::Terminal => Box::new(TerminalReporter::without_colors()),
            OutputFormat::Markdown => Box::new(MarkdownReporter::new()),
            OutputFormat::Json => Box::new(JsonReporter::new()),
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".abtest.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `.abtest.toml` in the current directory, or
    /// use defaults if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or fall back to
    /// [`Config::load_or_default`].
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }
}
