use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AbTestError, Result};
use crate::sample::Sample;

/// Default p-value cutoff below which the null hypothesis is rejected.
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Default confidence level for per-group intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// The alternative hypothesis, stated for treatment relative to control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// Treatment and control rates differ.
    #[default]
    TwoSided,
    /// Treatment rate is greater than control.
    Greater,
    /// Treatment rate is less than control.
    Less,
}

impl Alternative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Greater => "greater",
            Alternative::Less => "less",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = AbTestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "two-sided" => Ok(Alternative::TwoSided),
            "greater" => Ok(Alternative::Greater),
            "less" => Ok(Alternative::Less),
            other => Err(AbTestError::invalid(
                "alternative",
                other,
                "expected one of: two-sided, greater, less",
            )),
        }
    }
}

/// The result of comparing a control and a treatment sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub alternative: Alternative,
    /// Welch's t-statistic, positive when treatment converts better.
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    /// Significance threshold (alpha) the p-value is compared against.
    pub threshold: f64,
    /// `p_value < threshold`.
    pub is_significant: bool,
    pub control_mean: f64,
    pub treatment_mean: f64,
}

impl TestResult {
    /// Treatment mean minus control mean.
    pub fn difference(&self) -> f64 {
        self.treatment_mean - self.control_mean
    }
}

/// A two-sample test over binary outcomes.
pub trait StatisticalTest: Send + Sync {
    fn analyze(&self, control: &Sample, treatment: &Sample) -> Result<TestResult>;
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(AbTestError::invalid(
            name,
            value,
            "must be between 0 and 1 (exclusive)",
        ));
    }
    Ok(())
}

/// Run Welch's t-test of `treatment` against `control`.
pub fn run_test(
    control: &Sample,
    treatment: &Sample,
    alternative: Alternative,
    threshold: f64,
) -> Result<TestResult> {
    WelchTTest::new(alternative, threshold)?.analyze(control, treatment)
}

mod summary;
mod ttest;
pub use summary::{summarize, SummaryStats};
pub use ttest::WelchTTest;
