use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::check_probability;
use crate::error::{AbTestError, Result};
use crate::sample::Sample;

/// Descriptive statistics of one binary-outcome sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub successes: usize,
    /// Conversion rate, `successes / count`.
    pub rate: f64,
    /// Normal-approximation standard error, `sqrt(rate * (1 - rate) / count)`.
    pub std_error: f64,
    pub confidence_level: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl SummaryStats {
    /// Distance from the rate down to the lower bound.
    pub fn lower_extent(&self) -> f64 {
        self.rate - self.ci_lower
    }

    /// Distance from the rate up to the upper bound.
    pub fn upper_extent(&self) -> f64 {
        self.ci_upper - self.rate
    }

    pub fn ci_width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }
}

/// Two-tailed standard normal critical value for `confidence_level`.
fn z_critical(confidence_level: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AbTestError::invalid("confidence_level", confidence_level, e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Summarize a sample with a Wald (normal approximation) interval.
///
/// The interval is `rate ± z * std_error` clamped to [0, 1]. A rate of
/// exactly 0 or 1 yields the degenerate interval `(rate, rate)`.
pub fn summarize(sample: &Sample, confidence_level: f64) -> Result<SummaryStats> {
    check_probability("confidence_level", confidence_level)?;
    if sample.is_empty() {
        return Err(AbTestError::EmptySample);
    }

    let count = sample.len();
    let successes = sample.successes();
    let rate = successes as f64 / count as f64;
    let std_error = (rate * (1.0 - rate) / count as f64).sqrt();

    let margin = z_critical(confidence_level)? * std_error;
    let ci_lower = (rate - margin).clamp(0.0, 1.0);
    let ci_upper = (rate + margin).clamp(0.0, 1.0);

    Ok(SummaryStats {
        count,
        successes,
        rate,
        std_error,
        confidence_level,
        ci_lower,
        ci_upper,
    })
}
