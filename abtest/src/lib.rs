//! abtest: simulate and analyze conversion A/B tests
//!
//! This library wires the `abtest-core` computations to configuration files,
//! command-line overrides and report output.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod logging;

// Re-export core types for convenience
pub use abtest_core::data;
pub use abtest_core::{
    compose_report, generate_samples, run_test, summarize, AbTestError, Alternative,
    GroupConfig, Report, Reporter, Sample, SimulationParams, SummaryStats, TestResult, Uplift,
    Verdict,
};

// Re-export main types from this crate
pub use analysis::{Analysis, Simulation};
pub use cli::Cli;
pub use config::{Config, OutputFormat};
pub use logging::init_logging;
