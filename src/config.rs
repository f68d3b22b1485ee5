//! Simulation configuration

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_fee, ensure_non_negative, ConfigError};
use crate::projection::Phase;
use crate::strategy::{StrategySpec, DEFAULT_ACCOUNT_CEILING};
use crate::tax::TaxRegime;

/// Inputs for one simulation run
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gross yearly income while working
    pub initial_income: f64,

    /// Regular (taxable) wealth at the start
    pub initial_wealth: f64,

    /// Yearly savings while working; pillar 3a contributions come out of this
    pub yearly_investment: f64,

    /// Yearly pillar 3a contribution
    pub contribution: f64,

    pub wealth_growth_rate: f64,
    pub account_growth_rate: f64,

    /// TER on regular investments
    pub wealth_fee_rate: f64,

    /// TER on pillar 3a accounts
    pub account_fee_rate: f64,

    /// Number of simulated years
    pub horizon_years: u32,

    /// First year without income; decumulation starts here
    pub retirement_year: u32,

    /// First year of early account liquidation
    pub drawdown_start_year: u32,

    /// Account count of the reference multi-account strategy
    pub num_sub_accounts: usize,

    /// Ceiling for the adaptive strategy's accounts
    pub account_ceiling: f64,

    /// Absolute cap on the escalated contribution
    pub contribution_cap: f64,

    /// Seed for the contribution escalator; `None` seeds from the OS
    pub seed: Option<u64>,

    /// Strategy lineup; `None` uses the built-in presets
    pub strategies: Option<Vec<StrategySpec>>,

    /// Index of the strategy whose withdrawals the others match
    pub reference_strategy: usize,

    pub tax: TaxRegime,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_income: 100_000.0,
            initial_wealth: 120_000.0,
            yearly_investment: 20_000.0,
            contribution: 7_258.0,
            wealth_growth_rate: 0.04,
            account_growth_rate: 0.04,
            wealth_fee_rate: 0.001,
            account_fee_rate: 0.004,
            horizon_years: 42,
            retirement_year: 37,
            drawdown_start_year: 32,
            num_sub_accounts: 10,
            account_ceiling: DEFAULT_ACCOUNT_CEILING,
            contribution_cap: 10_000.0,
            seed: None,
            strategies: None,
            reference_strategy: 0,
            tax: TaxRegime::default(),
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Strategies to simulate, built from the presets when none are configured
    pub fn lineup(&self) -> Vec<StrategySpec> {
        match &self.strategies {
            Some(strategies) => strategies.clone(),
            None => vec![
                StrategySpec::multi_account(self.num_sub_accounts, self.drawdown_start_year),
                StrategySpec::direct_investment(self.retirement_year),
                StrategySpec::single_account(),
                StrategySpec::staggered_accounts(5, self.retirement_year),
                StrategySpec::adaptive(self.account_ceiling, self.drawdown_start_year),
            ],
        }
    }

    /// Set the reference account count; rejected when a custom lineup is configured
    pub fn set_sub_accounts(&mut self, count: usize) -> Result<(), ConfigError> {
        if self.strategies.is_some() {
            return Err(ConfigError::AccountCountIgnored { count });
        }
        self.num_sub_accounts = count;
        Ok(())
    }

    pub fn phase(&self, year: u32) -> Phase {
        if year >= self.retirement_year {
            Phase::Decumulation
        } else if year >= self.drawdown_start_year {
            Phase::PreRetirementDrawdown
        } else {
            Phase::Accumulation
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_years == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        if self.retirement_year == 0 || self.retirement_year > self.horizon_years {
            return Err(ConfigError::RetirementOutOfRange {
                retirement_year: self.retirement_year,
                horizon: self.horizon_years,
            });
        }
        if self.drawdown_start_year == 0 || self.drawdown_start_year > self.retirement_year {
            return Err(ConfigError::DrawdownOutOfRange {
                drawdown_start: self.drawdown_start_year,
                retirement_year: self.retirement_year,
            });
        }

        ensure_non_negative("initial_income", self.initial_income)?;
        ensure_non_negative("initial_wealth", self.initial_wealth)?;
        ensure_non_negative("yearly_investment", self.yearly_investment)?;
        ensure_non_negative("contribution", self.contribution)?;
        ensure_non_negative("contribution_cap", self.contribution_cap)?;
        ensure_non_negative("wealth_growth_rate", self.wealth_growth_rate)?;
        ensure_non_negative("account_growth_rate", self.account_growth_rate)?;
        ensure_fee("wealth_fee_rate", self.wealth_fee_rate)?;
        ensure_fee("account_fee_rate", self.account_fee_rate)?;
        self.tax.validate()?;

        let lineup = self.lineup();
        if lineup.is_empty() {
            return Err(ConfigError::EmptyLineup);
        }
        if self.reference_strategy >= lineup.len() {
            return Err(ConfigError::ReferenceOutOfRange {
                index: self.reference_strategy,
                count: lineup.len(),
            });
        }

        let mut names = HashSet::new();
        for spec in &lineup {
            spec.validate()?;
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateStrategy(spec.name.clone()));
            }
        }

        Ok(())
    }
}
