use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{check_probability, Alternative, StatisticalTest, TestResult, DEFAULT_THRESHOLD};
use crate::error::{AbTestError, Result};
use crate::sample::Sample;

/// Welch's t-test for two independent samples with potentially unequal variances.
///
/// The statistic is oriented treatment minus control, so `Greater` asks
/// whether the treatment converts better than the control.
#[derive(Debug, Clone)]
pub struct WelchTTest {
    pub alternative: Alternative,
    /// Significance threshold for the p-value (default: 0.05).
    pub threshold: f64,
}

impl Default for WelchTTest {
    fn default() -> Self {
        Self {
            alternative: Alternative::TwoSided,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl WelchTTest {
    /// Create a new Welch's t-test.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `threshold` is not in the range (0, 1).
    pub fn new(alternative: Alternative, threshold: f64) -> Result<Self> {
        check_probability("threshold", threshold)?;
        Ok(Self {
            alternative,
            threshold,
        })
    }

    /// Mean and Bessel-corrected variance of a binary sample.
    ///
    /// For 0/1 data the sum of squared deviations is `successes * (1 - mean)`,
    /// so the variance reduces to `n * mean * (1 - mean) / (n - 1)`.
    fn moments(sample: &Sample) -> (f64, f64) {
        let n = sample.len() as f64;
        let successes = sample.successes() as f64;
        let mean = successes / n;
        let variance = successes * (1.0 - mean) / (n - 1.0);
        (mean, variance)
    }

    /// Calculate degrees of freedom using the Welch-Satterthwaite equation.
    ///
    /// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
    fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
        let s1 = var1 / n1 as f64;
        let s2 = var2 / n2 as f64;
        let numerator = (s1 + s2).powi(2);
        let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

        if denominator == 0.0 {
            // Fallback to minimum df when variances are zero
            return (n1.min(n2) - 1) as f64;
        }

        numerator / denominator
    }

    /// p-value of `t_statistic` under the configured alternative.
    ///
    /// Upper tails are taken as `cdf(-t)` so that swapping the groups and
    /// flipping the alternative gives exactly the same value.
    fn p_value(&self, t_statistic: f64, df: f64) -> f64 {
        let p = match StudentsT::new(0.0, 1.0, df) {
            Ok(t_dist) => match self.alternative {
                Alternative::TwoSided => 2.0 * t_dist.cdf(-t_statistic.abs()),
                Alternative::Greater => t_dist.cdf(-t_statistic),
                Alternative::Less => t_dist.cdf(t_statistic),
            },
            Err(_) => 1.0,
        };
        p.clamp(0.0, 1.0)
    }
}

impl StatisticalTest for WelchTTest {
    fn analyze(&self, control: &Sample, treatment: &Sample) -> Result<TestResult> {
        let n_control = control.len();
        let n_treatment = treatment.len();

        if n_control < 2 {
            return Err(AbTestError::InsufficientData {
                group: "control",
                got: n_control,
                min: 2,
            });
        }
        if n_treatment < 2 {
            return Err(AbTestError::InsufficientData {
                group: "treatment",
                got: n_treatment,
                min: 2,
            });
        }

        let (control_mean, control_var) = Self::moments(control);
        let (treatment_mean, treatment_var) = Self::moments(treatment);

        let se = (treatment_var / n_treatment as f64 + control_var / n_control as f64).sqrt();
        let df = Self::welch_satterthwaite_df(treatment_var, n_treatment, control_var, n_control);

        // Both samples constant: the statistic is undefined, report no effect.
        if se == 0.0 {
            return Ok(TestResult {
                alternative: self.alternative,
                t_statistic: 0.0,
                degrees_of_freedom: df,
                p_value: 1.0,
                threshold: self.threshold,
                is_significant: false,
                control_mean,
                treatment_mean,
            });
        }

        let t_statistic = (treatment_mean - control_mean) / se;
        let p_value = self.p_value(t_statistic, df);

        Ok(TestResult {
            alternative: self.alternative,
            t_statistic,
            degrees_of_freedom: df,
            p_value,
            threshold: self.threshold,
            is_significant: p_value < self.threshold,
            control_mean,
            treatment_mean,
        })
    }
}
