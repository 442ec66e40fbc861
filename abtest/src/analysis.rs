//! The end-to-end analysis pipeline.
//!
//! Samples are generated or loaded, summarized, tested and composed into a
//! [`Report`]. Each call builds its own samples and generator; nothing is
//! shared between runs.

use std::path::Path;

use abtest_core::data::load_converted_csv_path;
use abtest_core::{
    compose_report, summarize, GroupConfig, Report, Sample, SimulationParams, StatisticalTest,
    WelchTTest,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;

/// Generated samples together with the report computed from them.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub control: Sample,
    pub treatment: Sample,
    pub report: Report,
}

/// Analysis settings resolved from a [`Config`].
#[derive(Debug, Clone)]
pub struct Analysis {
    params: SimulationParams,
    confidence_level: f64,
    test: WelchTTest,
}

impl Analysis {
    /// Build the pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if alpha is not in (0, 1).
    pub fn from_config(config: &Config) -> Result<Self> {
        let test = WelchTTest::new(config.hypothesis.alternative, config.hypothesis.alpha)?;
        Ok(Self {
            params: config.simulation.params(),
            confidence_level: config.hypothesis.confidence_level,
            test,
        })
    }

    /// Summarize and test two samples and compose the report.
    pub fn evaluate(
        &self,
        config_control: &GroupConfig,
        config_treatment: &GroupConfig,
        control: &Sample,
        treatment: &Sample,
    ) -> Result<Report> {
        let stats_control = summarize(control, self.confidence_level)
            .with_context(|| format!("Failed to summarize {} group", config_control.label))?;
        let stats_treatment = summarize(treatment, self.confidence_level)
            .with_context(|| format!("Failed to summarize {} group", config_treatment.label))?;

        let result = self.test.analyze(control, treatment)?;
        debug!(
            t_statistic = result.t_statistic,
            df = result.degrees_of_freedom,
            p_value = result.p_value,
            "Welch's t-test complete"
        );

        Ok(compose_report(
            config_control,
            config_treatment,
            &stats_control,
            &stats_treatment,
            &result,
        ))
    }

    /// Generate a synthetic experiment and analyze it.
    pub fn run_simulation(&self) -> Result<Simulation> {
        let (control, treatment) = self
            .params
            .generate()
            .context("Failed to generate samples")?;
        info!(
            n_control = control.len(),
            n_treatment = treatment.len(),
            seed = ?self.params.seed,
            "generated synthetic samples"
        );

        let (config_control, config_treatment) = self.params.group_configs();
        let report = self.evaluate(&config_control, &config_treatment, &control, &treatment)?;
        info!("analysis complete");

        Ok(Simulation {
            control,
            treatment,
            report,
        })
    }

    /// Analyze already-collected samples.
    pub fn analyze(&self, control: &Sample, treatment: &Sample) -> Result<Report> {
        let config_control = GroupConfig::observed("Control", control.len());
        let config_treatment = GroupConfig::observed("Treatment", treatment.len());
        let report = self.evaluate(&config_control, &config_treatment, control, treatment)?;
        info!("analysis complete");
        Ok(report)
    }

    /// Load both groups from CSV files and analyze them.
    pub fn analyze_files(&self, control_path: &Path, treatment_path: &Path) -> Result<Report> {
        let control = load_converted_csv_path(control_path)
            .with_context(|| format!("Failed to load control data: {}", control_path.display()))?;
        let treatment = load_converted_csv_path(treatment_path).with_context(|| {
            format!(
                "Failed to load treatment data: {}",
                treatment_path.display()
            )
        })?;
        info!(
            n_control = control.len(),
            n_treatment = treatment.len(),
            "loaded uploaded samples"
        );

        self.analyze(&control, &treatment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abtest_core::{AbTestError, Alternative, Verdict};

    fn config_with(uplift: f64, n: usize, seed: u64) -> Config {
        let mut config = Config::default();
        config.simulation.uplift = uplift;
        config.simulation.n_control = n;
        config.simulation.n_treatment = n;
        config.simulation.seed = Some(seed);
        config
    }

    #[test]
    fn test_from_config_rejects_bad_alpha() {
        let mut config = Config::default();
        config.hypothesis.alpha = 1.5;
        assert!(Analysis::from_config(&config).is_err());
    }

    #[test]
    fn test_run_simulation_is_reproducible() {
        let analysis = Analysis::from_config(&config_with(0.05, 1000, 42)).unwrap();

        let first = analysis.run_simulation().unwrap();
        let second = analysis.run_simulation().unwrap();

        assert_eq!(first.control, second.control);
        assert_eq!(first.treatment, second.treatment);
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_run_simulation_detects_large_uplift() {
        let analysis = Analysis::from_config(&config_with(0.10, 5000, 42)).unwrap();
        let simulation = analysis.run_simulation().unwrap();

        assert!(simulation.report.test.p_value < 0.01);
        assert!(simulation.report.test.is_significant);
        assert_eq!(simulation.report.verdict(), Verdict::Increase);
        assert_eq!(simulation.report.control.config.baseline_rate, Some(0.10));
    }

    #[test]
    fn test_run_simulation_invalid_rate() {
        let mut config = config_with(0.0, 100, 1);
        config.simulation.baseline_rate = 1.2;
        let analysis = Analysis::from_config(&config).unwrap();

        let err = analysis.run_simulation().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AbTestError>(),
            Some(AbTestError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_analyze_observed_samples() {
        let mut config = Config::default();
        config.hypothesis.alternative = Alternative::Less;
        let analysis = Analysis::from_config(&config).unwrap();

        let control = Sample::from_outcomes([1, 1, 0, 1, 0, 1, 1, 0]).unwrap();
        let treatment = Sample::from_outcomes([0, 0, 1, 0, 0, 0, 1, 0]).unwrap();
        let report = analysis.analyze(&control, &treatment).unwrap();

        assert_eq!(report.control.config.baseline_rate, None);
        assert_eq!(report.control.stats.count, 8);
        assert_eq!(report.test.alternative, Alternative::Less);
        assert!(report.test.t_statistic < 0.0);
    }

    #[test]
    fn test_analyze_single_observation() {
        let analysis = Analysis::from_config(&Config::default()).unwrap();
        let control = Sample::from_outcomes([1]).unwrap();
        let treatment = Sample::from_outcomes([0, 1, 1]).unwrap();

        let err = analysis.analyze(&control, &treatment).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AbTestError>(),
            Some(AbTestError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_analyze_empty_sample() {
        let analysis = Analysis::from_config(&Config::default()).unwrap();
        let control = Sample::new(Vec::new());
        let treatment = Sample::from_outcomes([0, 1, 1]).unwrap();

        let err = analysis.analyze(&control, &treatment).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AbTestError>(),
            Some(AbTestError::EmptySample)
        ));
    }
}
