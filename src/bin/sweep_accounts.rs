//! Sweep the number of pillar 3a sub-accounts
//!
//! Runs the base configuration once per account count in parallel and
//! writes one summary row per strategy and count

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use pillar3a_forecast::{ScenarioRunner, SimulationConfig, SimulationResult};

#[derive(Debug, Parser)]
#[command(name = "sweep_accounts", about = "Compare strategies across sub-account counts")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smallest account count
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// Largest account count
    #[arg(long, default_value_t = 15)]
    max: usize,

    /// Output CSV
    #[arg(long, default_value = "account_sweep.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    accounts: usize,
    strategy: String,
    total_assets: f64,
    total_tax: f64,
    withdrawal_tax: f64,
    total_withdrawn: f64,
    depletion_years: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => SimulationConfig::from_json_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    let runner = ScenarioRunner::new(base);
    let configs = runner
        .account_sweep(args.min..=args.max)
        .context("account sweep needs the preset strategy lineup")?;

    let start = Instant::now();
    let results: Vec<(usize, SimulationResult)> = configs
        .into_par_iter()
        .map(|config| {
            let accounts = config.num_sub_accounts;
            runner.run_config(config).map(|result| (accounts, result))
        })
        .collect::<Result<_, _>>()
        .context("invalid sweep configuration")?;
    log::info!("{} runs complete in {:?}", results.len(), start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for (accounts, result) in &results {
        for summary in result.summaries() {
            writer.serialize(SweepRow {
                accounts: *accounts,
                strategy: summary.name,
                total_assets: summary.total_assets,
                total_tax: summary.total_tax,
                withdrawal_tax: summary.withdrawal_tax,
                total_withdrawn: summary.total_withdrawn,
                depletion_years: summary.depletion_years,
            })?;
        }
    }
    writer.flush()?;

    println!("Sweep written to {}", args.output.display());
    Ok(())
}
