//! Pillar 3a Forecast CLI
//!
//! Runs every strategy in the lineup and writes the yearly snapshots,
//! withdrawal events and summaries as CSV

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pillar3a_forecast::{output, SimulationConfig, SimulationEngine};

#[derive(Debug, Parser)]
#[command(name = "pillar3a-forecast", version, about = "Compare pillar 3a saving strategies")]
struct Args {
    /// JSON configuration file; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV output
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Seed for the contribution escalator
    #[arg(long)]
    seed: Option<u64>,

    /// Number of sub-accounts for the multi-account strategy
    #[arg(long)]
    accounts: Option<usize>,

    /// Simulation horizon in years
    #[arg(long)]
    horizon: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(accounts) = args.accounts {
        config
            .set_sub_accounts(accounts)
            .context("--accounts cannot be combined with a configured strategy lineup")?;
    }
    if let Some(horizon) = args.horizon {
        config.horizon_years = horizon;
    }

    let engine = SimulationEngine::new(config).context("invalid simulation configuration")?;
    let result = engine.run();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    output::write_result(&args.output_dir, &result)
        .with_context(|| format!("writing results to {}", args.output_dir.display()))?;

    println!(
        "{:<20} {:>14} {:>14} {:>14} {:>12} {:>12}",
        "Strategy", "Regular", "Pillar 3a", "Total", "Tax", "Depleted"
    );
    println!("{}", "-".repeat(91));
    for summary in result.summaries() {
        println!(
            "{:<20} {:>14.2} {:>14.2} {:>14.2} {:>12.2} {:>12}",
            summary.name,
            summary.final_regular_wealth,
            summary.final_tax_advantaged,
            summary.total_assets,
            summary.total_tax,
            summary.depletion_years
        );
    }

    log::info!("results written to {}", args.output_dir.display());
    Ok(())
}
