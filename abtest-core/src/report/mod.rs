use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::GroupConfig;
use crate::stats::{SummaryStats, TestResult};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration and observed statistics of one experiment arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub config: GroupConfig,
    pub stats: SummaryStats,
}

/// One bar of the comparison chart: a conversion rate with its interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub rate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Error bar extent below the rate, `rate - ci_lower`.
    pub lower_error: f64,
    /// Error bar extent above the rate, `ci_upper - rate`.
    pub upper_error: f64,
}

/// Renderer-independent description of the conversion-rate bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub title: String,
    pub y_label: String,
    /// Upper limit of the y axis; the lower limit is 0.
    pub y_max: f64,
    pub bars: Vec<ChartBar>,
    /// Test summary placed on the chart.
    pub annotation: String,
}

/// Plain-language outcome of the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Treatment converts significantly better than control.
    Increase,
    /// Treatment converts significantly worse than control.
    Decrease,
    Inconclusive,
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub control: GroupReport,
    pub treatment: GroupReport,
    pub test: TestResult,
    pub chart: ComparisonChart,
    /// Markdown summary of configuration, observations and conclusion.
    pub narrative: String,
}

impl Report {
    /// Treatment rate minus control rate.
    pub fn observed_difference(&self) -> f64 {
        self.treatment.stats.rate - self.control.stats.rate
    }

    /// Observed difference relative to the control rate, `None` when the
    /// control rate is zero.
    pub fn relative_difference(&self) -> Option<f64> {
        relative_difference(&self.control.stats, &self.treatment.stats)
    }

    pub fn verdict(&self) -> Verdict {
        verdict(&self.test)
    }
}

pub(crate) fn relative_difference(control: &SummaryStats, treatment: &SummaryStats) -> Option<f64> {
    if control.rate > 0.0 {
        Some((treatment.rate - control.rate) / control.rate)
    } else {
        None
    }
}

pub(crate) fn verdict(test: &TestResult) -> Verdict {
    if !test.is_significant {
        return Verdict::Inconclusive;
    }
    let difference = test.difference();
    if difference > 0.0 {
        Verdict::Increase
    } else if difference < 0.0 {
        Verdict::Decrease
    } else {
        Verdict::Inconclusive
    }
}

/// Renders a [`Report`] to some output.
pub trait Reporter: Send + Sync {
    fn write_report(&self, writer: &mut dyn Write, report: &Report) -> Result<(), ReportError>;

    /// Render to standard output.
    fn report(&self, report: &Report) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_report(&mut writer, report)
    }
}

mod compose;
mod json;
mod markdown;
mod terminal;
pub use compose::compose_report;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use terminal::TerminalReporter;
