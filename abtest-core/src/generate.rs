//! Synthetic sample generation.
//!
//! Each call owns its random generator: seeded runs are bit-for-bit
//! reproducible and concurrent calls never share state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{AbTestError, Result};
use crate::sample::Sample;

/// Slack allowed when the treatment rate overshoots [0, 1] through float
/// arithmetic. Rates within this distance of the range are clamped.
const RATE_TOLERANCE: f64 = 1e-4;

/// The difference applied to the baseline rate for the treatment group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uplift {
    /// Added to the baseline: `baseline + delta`.
    Absolute(f64),
    /// Scales the baseline: `baseline * (1 + ratio)`.
    Relative(f64),
}

impl Default for Uplift {
    fn default() -> Self {
        Uplift::Absolute(0.0)
    }
}

impl Uplift {
    /// Rate obtained by applying this uplift to `baseline`, unclamped.
    pub fn apply(&self, baseline: f64) -> f64 {
        match *self {
            Uplift::Absolute(delta) => baseline + delta,
            Uplift::Relative(ratio) => baseline * (1.0 + ratio),
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Uplift::Absolute(v) | Uplift::Relative(v) => v,
        }
    }
}

/// Design parameters of one experiment arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub label: String,
    /// Baseline conversion rate, `None` when the sample was loaded rather
    /// than generated.
    pub baseline_rate: Option<f64>,
    /// Uplift applied to this arm; zero for the control group.
    pub uplift: Uplift,
    pub sample_size: usize,
    pub seed: Option<u64>,
}

impl GroupConfig {
    /// Configuration of an observed (uploaded) group of `sample_size` subjects.
    pub fn observed(label: impl Into<String>, sample_size: usize) -> Self {
        Self {
            label: label.into(),
            baseline_rate: None,
            uplift: Uplift::default(),
            sample_size,
            seed: None,
        }
    }

    /// The conversion rate this arm was generated with, if known.
    pub fn expected_rate(&self) -> Option<f64> {
        self.baseline_rate
            .map(|p| self.uplift.apply(p).clamp(0.0, 1.0))
    }
}

/// Parameters of one synthetic experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub baseline_rate: f64,
    pub uplift: Uplift,
    pub n_control: usize,
    pub n_treatment: usize,
    pub seed: Option<u64>,
}

impl SimulationParams {
    /// Validated conversion rate of the treatment arm.
    pub fn treatment_rate(&self) -> Result<f64> {
        treatment_rate(self.baseline_rate, self.uplift)
    }

    /// Per-arm configurations, labelled `Control` and `Treatment`.
    pub fn group_configs(&self) -> (GroupConfig, GroupConfig) {
        let control = GroupConfig {
            label: "Control".to_string(),
            baseline_rate: Some(self.baseline_rate),
            uplift: Uplift::default(),
            sample_size: self.n_control,
            seed: self.seed,
        };
        let treatment = GroupConfig {
            label: "Treatment".to_string(),
            baseline_rate: Some(self.baseline_rate),
            uplift: self.uplift,
            sample_size: self.n_treatment,
            seed: self.seed,
        };
        (control, treatment)
    }

    pub fn generate(&self) -> Result<(Sample, Sample)> {
        generate_samples(
            self.baseline_rate,
            self.uplift,
            self.n_control,
            self.n_treatment,
            self.seed,
        )
    }
}

fn check_rate(name: &'static str, rate: f64) -> Result<()> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(AbTestError::invalid(name, rate, "must be within [0, 1]"));
    }
    Ok(())
}

fn check_size(name: &'static str, n: usize) -> Result<()> {
    if n < 1 {
        return Err(AbTestError::invalid(name, n, "must be at least 1"));
    }
    Ok(())
}

fn treatment_rate(baseline_rate: f64, uplift: Uplift) -> Result<f64> {
    check_rate("baseline_rate", baseline_rate)?;
    let rate = uplift.apply(baseline_rate);
    if !rate.is_finite() || rate < -RATE_TOLERANCE || rate > 1.0 + RATE_TOLERANCE {
        return Err(AbTestError::invalid(
            "uplift",
            uplift.value(),
            format!("treatment rate {:.4} falls outside [0, 1]", rate),
        ));
    }
    Ok(rate.clamp(0.0, 1.0))
}

fn draw<R: Rng>(rng: &mut R, rate: f64, n: usize) -> Sample {
    Sample::new((0..n).map(|_| rng.gen_bool(rate)).collect())
}

/// Generate independent control and treatment samples.
///
/// Control outcomes are Bernoulli(`baseline_rate`), treatment outcomes are
/// Bernoulli of the baseline with `uplift` applied. Both are drawn from one
/// generator created for this call, control first. Without a seed the
/// generator is seeded from system entropy.
pub fn generate_samples(
    baseline_rate: f64,
    uplift: Uplift,
    n_control: usize,
    n_treatment: usize,
    seed: Option<u64>,
) -> Result<(Sample, Sample)> {
    let treatment_rate = treatment_rate(baseline_rate, uplift)?;
    check_size("n_control", n_control)?;
    check_size("n_treatment", n_treatment)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let control = draw(&mut rng, baseline_rate, n_control);
    let treatment = draw(&mut rng, treatment_rate, n_treatment);
    Ok((control, treatment))
}
