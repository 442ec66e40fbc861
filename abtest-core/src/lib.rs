//! Core computation for conversion A/B tests.
//!
//! Synthetic sample generation, per-group confidence intervals, Welch's
//! t-test and report composition. Every operation is a pure computation over
//! in-memory samples; rendering and file handling live at the edges.

pub mod data;
pub mod error;
pub mod generate;
pub mod report;
pub mod sample;
pub mod stats;

// Re-export main types for convenience
pub use error::{AbTestError, Result};
pub use generate::{generate_samples, GroupConfig, SimulationParams, Uplift};
pub use report::{
    compose_report, ChartBar, ComparisonChart, GroupReport, JsonReporter, MarkdownReporter,
    Report, ReportError, Reporter, TerminalReporter, Verdict,
};
pub use sample::Sample;
pub use stats::{
    run_test, summarize, Alternative, StatisticalTest, SummaryStats, TestResult, WelchTTest,
    DEFAULT_CONFIDENCE_LEVEL, DEFAULT_THRESHOLD,
};
