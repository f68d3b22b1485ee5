//! CSV writers for simulation results

use std::path::Path;

use serde::Serialize;

use crate::projection::{Phase, SimulationResult, StrategyResult, StrategySummary, YearSnapshot};

/// Flat snapshot row; account balances joined with `;`
#[derive(Debug, Serialize)]
struct SnapshotRow {
    year: u32,
    phase: Phase,
    regular_wealth: f64,
    tax_advantaged: f64,
    total_assets: f64,
    active_accounts: usize,
    account_balances: String,
    contribution: f64,
    yearly_tax: f64,
    cumulative_tax: f64,
    liquidation_proceeds: f64,
    withdrawal_tax: f64,
    withdrawal: f64,
    depleted: bool,
}

impl From<&YearSnapshot> for SnapshotRow {
    fn from(s: &YearSnapshot) -> Self {
        Self {
            year: s.year,
            phase: s.phase,
            regular_wealth: s.regular_wealth,
            tax_advantaged: s.tax_advantaged,
            total_assets: s.total_assets(),
            active_accounts: s.active_accounts,
            account_balances: s
                .account_balances
                .iter()
                .map(|b| format!("{:.2}", b))
                .collect::<Vec<_>>()
                .join(";"),
            contribution: s.contribution,
            yearly_tax: s.yearly_tax,
            cumulative_tax: s.cumulative_tax,
            liquidation_proceeds: s.liquidation_proceeds,
            withdrawal_tax: s.withdrawal_tax,
            withdrawal: s.withdrawal,
            depleted: s.depleted,
        }
    }
}

#[derive(Debug, Serialize)]
struct WithdrawalRow<'a> {
    strategy: &'a str,
    year: u32,
    account: usize,
    balance: f64,
    tax: f64,
    after_tax: f64,
}

/// Write one strategy's yearly snapshots
pub fn write_snapshots(path: &Path, strategy: &StrategyResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for snapshot in &strategy.snapshots {
        writer.serialize(SnapshotRow::from(snapshot))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the withdrawal events of every strategy into one file
pub fn write_withdrawals(path: &Path, result: &SimulationResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for strategy in &result.strategies {
        for event in &strategy.withdrawals {
            writer.serialize(WithdrawalRow {
                strategy: &strategy.name,
                year: event.year,
                account: event.account,
                balance: event.balance,
                tax: event.tax,
                after_tax: event.after_tax,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write summary rows
pub fn write_summaries(path: &Path, summaries: &[StrategySummary]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every output of a run into `dir`
pub fn write_result(dir: &Path, result: &SimulationResult) -> Result<(), csv::Error> {
    for strategy in &result.strategies {
        write_snapshots(&dir.join(format!("{}_snapshots.csv", strategy.name)), strategy)?;
    }
    write_withdrawals(&dir.join("withdrawals.csv"), result)?;
    write_summaries(&dir.join("summary.csv"), &result.summaries())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::projection::SimulationEngine;

    #[test]
    fn test_snapshot_row_joins_balances() {
        let result = SimulationEngine::new(SimulationConfig {
            seed: Some(3),
            ..Default::default()
        })
        .unwrap()
        .run();
        let snapshot = &result.reference().snapshots[0];
        let row = SnapshotRow::from(snapshot);
        assert_eq!(row.account_balances.split(';').count(), 10);
        assert_eq!(row.total_assets, snapshot.total_assets());
    }

    #[test]
    fn test_write_result_creates_files() {
        let dir = std::env::temp_dir().join(format!("pillar3a_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let result = SimulationEngine::new(SimulationConfig {
            seed: Some(3),
            ..Default::default()
        })
        .unwrap()
        .run();
        write_result(&dir, &result).unwrap();

        for strategy in &result.strategies {
            assert!(dir.join(format!("{}_snapshots.csv", strategy.name)).exists());
        }
        let summary = std::fs::read_to_string(dir.join("summary.csv")).unwrap();
        // header plus one row per strategy
        assert_eq!(summary.lines().count(), result.strategies.len() + 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
