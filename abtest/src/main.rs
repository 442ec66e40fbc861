use abtest::data::write_samples_csv_path;
use abtest::{init_logging, Analysis, Cli, Config, Reporter};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    debug!(?config, "configuration loaded");

    let analysis = Analysis::from_config(&config).context("Invalid configuration")?;

    let report = match cli.analysis_files() {
        Some((control_path, treatment_path)) => {
            info!("Analyzing uploaded data...");
            analysis.analyze_files(control_path, treatment_path)?
        }
        None => {
            info!("Simulating experiment...");
            let simulation = analysis.run_simulation()?;

            if let Some(path) = &cli.export_data {
                write_samples_csv_path(path, &simulation.control, &simulation.treatment)
                    .with_context(|| format!("Failed to export samples: {}", path.display()))?;
                info!(path = %path.display(), "exported generated samples");
            }

            simulation.report
        }
    };

    config.output.reporter().report(&report)?;

    Ok(())
}
