//! Per-year output records and run summaries

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a simulated year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Accumulation,
    PreRetirementDrawdown,
    Decumulation,
}

/// State of one strategy at the end of a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub year: u32,
    pub phase: Phase,

    /// Regular (taxable) wealth, never negative
    pub regular_wealth: f64,

    /// Sum of all pillar 3a balances
    pub tax_advantaged: f64,

    /// Balance of every account ever opened, closed ones at zero
    pub account_balances: Vec<f64>,
    pub active_accounts: usize,

    /// Pillar 3a contribution paid in this year
    pub contribution: f64,

    /// Combined income and wealth tax for the year
    pub yearly_tax: f64,
    pub cumulative_tax: f64,

    /// After-tax proceeds of accounts closed this year
    pub liquidation_proceeds: f64,

    /// Withdrawal tax on accounts closed this year
    pub withdrawal_tax: f64,

    /// Cash paid out to the household (decumulation only)
    pub withdrawal: f64,

    /// Regular wealth had to be clamped at zero this year
    pub depleted: bool,
}

impl YearSnapshot {
    pub fn total_assets(&self) -> f64 {
        self.regular_wealth + self.tax_advantaged
    }
}

/// Liquidation of one pillar 3a account
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    pub year: u32,
    /// Account number in opening order (1-based)
    pub account: usize,
    /// Balance before tax
    pub balance: f64,
    pub tax: f64,
    pub after_tax: f64,
}

/// Regular wealth could not cover an outflow and was clamped at zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepletionEvent {
    pub year: u32,
    /// Amount that could not be paid
    pub shortfall: f64,
}

/// Full history of one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub snapshots: Vec<YearSnapshot>,
    pub withdrawals: Vec<WithdrawalEvent>,
    pub depletions: Vec<DepletionEvent>,
}

impl StrategyResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snapshots: Vec::new(),
            withdrawals: Vec::new(),
            depletions: Vec::new(),
        }
    }

    pub fn add_snapshot(&mut self, snapshot: YearSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Snapshot for a 1-based year
    pub fn snapshot(&self, year: u32) -> Option<&YearSnapshot> {
        self.snapshots.iter().find(|s| s.year == year)
    }

    pub fn summary(&self) -> StrategySummary {
        let last = self.snapshots.last();
        let final_regular_wealth = last.map(|s| s.regular_wealth).unwrap_or(0.0);
        let final_tax_advantaged = last.map(|s| s.tax_advantaged).unwrap_or(0.0);
        let income_and_wealth_tax = last.map(|s| s.cumulative_tax).unwrap_or(0.0);
        let withdrawal_tax: f64 = self.withdrawals.iter().map(|w| w.tax).sum();

        StrategySummary {
            name: self.name.clone(),
            years: self.snapshots.len() as u32,
            final_regular_wealth,
            final_tax_advantaged,
            total_assets: final_regular_wealth + final_tax_advantaged,
            income_and_wealth_tax,
            withdrawal_tax,
            total_tax: income_and_wealth_tax + withdrawal_tax,
            total_withdrawn: self.snapshots.iter().map(|s| s.withdrawal).sum(),
            depletion_years: self.depletions.len() as u32,
        }
    }
}

/// End-of-horizon figures for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub name: String,
    pub years: u32,
    pub final_regular_wealth: f64,
    pub final_tax_advantaged: f64,
    pub total_assets: f64,
    pub income_and_wealth_tax: f64,
    pub withdrawal_tax: f64,
    pub total_tax: f64,
    pub total_withdrawn: f64,
    pub depletion_years: u32,
}

/// Output of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// One entry per strategy, in lineup order
    pub strategies: Vec<StrategyResult>,

    /// Index of the reference strategy
    pub reference: usize,
}

impl SimulationResult {
    pub fn strategy(&self, name: &str) -> Option<&StrategyResult> {
        self.strategies.iter().find(|s| s.name == name)
    }

    pub fn reference(&self) -> &StrategyResult {
        &self.strategies[self.reference]
    }

    pub fn summaries(&self) -> Vec<StrategySummary> {
        self.strategies.iter().map(StrategyResult::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot(year: u32, regular_wealth: f64, tax_advantaged: f64, cumulative_tax: f64) -> YearSnapshot {
        YearSnapshot {
            year,
            phase: Phase::Decumulation,
            regular_wealth,
            tax_advantaged,
            account_balances: vec![tax_advantaged],
            active_accounts: 1,
            contribution: 0.0,
            yearly_tax: 0.0,
            cumulative_tax,
            liquidation_proceeds: 0.0,
            withdrawal_tax: 0.0,
            withdrawal: 1_000.0,
            depleted: false,
        }
    }

    #[test]
    fn test_summary_adds_withdrawal_tax() {
        let mut result = StrategyResult::new("single_account");
        result.add_snapshot(snapshot(1, 100.0, 50.0, 10.0));
        result.add_snapshot(snapshot(2, 200.0, 0.0, 25.0));
        result.withdrawals.push(WithdrawalEvent {
            year: 2,
            account: 1,
            balance: 60.0,
            tax: 2.82,
            after_tax: 57.18,
        });

        let summary = result.summary();
        assert_eq!(summary.years, 2);
        assert_relative_eq!(summary.total_assets, 200.0);
        assert_relative_eq!(summary.income_and_wealth_tax, 25.0);
        assert_relative_eq!(summary.total_tax, 27.82);
        assert_relative_eq!(summary.total_withdrawn, 2_000.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = StrategyResult::new("none").summary();
        assert_eq!(summary.years, 0);
        assert_eq!(summary.total_assets, 0.0);
    }

    #[test]
    fn test_snapshot_lookup() {
        let mut result = StrategyResult::new("x");
        result.add_snapshot(snapshot(1, 1.0, 2.0, 0.0));
        assert_eq!(result.snapshot(1).map(YearSnapshot::total_assets), Some(3.0));
        assert!(result.snapshot(2).is_none());
    }
}
