//! Scenario runner for batch simulations
//!
//! Holds a base configuration and derives variants from it, e.g. the same
//! household with a different number of pillar 3a accounts.

use std::ops::RangeInclusive;

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::projection::{SimulationEngine, SimulationResult};

/// Runs one base configuration and its variants
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationConfig::default());
///
/// for config in runner.account_sweep(1..=15)? {
///     let result = runner.run_config(config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_config: SimulationConfig,
}

impl ScenarioRunner {
    pub fn new(base_config: SimulationConfig) -> Self {
        Self { base_config }
    }

    /// Run the base configuration
    pub fn run(&self) -> Result<SimulationResult, ConfigError> {
        self.run_config(self.base_config.clone())
    }

    /// Run an arbitrary configuration
    pub fn run_config(&self, config: SimulationConfig) -> Result<SimulationResult, ConfigError> {
        Ok(SimulationEngine::new(config)?.run())
    }

    /// Run several configurations in order; stops at the first invalid one
    pub fn run_batch(&self, configs: &[SimulationConfig]) -> Result<Vec<SimulationResult>, ConfigError> {
        configs
            .iter()
            .map(|config| self.run_config(config.clone()))
            .collect()
    }

    /// Base configuration with `num_sub_accounts` set to each value in `counts`
    ///
    /// Fails when the base configuration has a custom lineup, which the count
    /// would not affect.
    pub fn account_sweep(
        &self,
        counts: RangeInclusive<usize>,
    ) -> Result<Vec<SimulationConfig>, ConfigError> {
        counts
            .map(|count| -> Result<SimulationConfig, ConfigError> {
                let mut config = self.base_config.clone();
                config.set_sub_accounts(count)?;
                Ok(config)
            })
            .collect()
    }

    /// Base configuration under each seed
    pub fn seed_sweep(&self, seeds: &[u64]) -> Vec<SimulationConfig> {
        seeds
            .iter()
            .map(|&seed| SimulationConfig {
                seed: Some(seed),
                ..self.base_config.clone()
            })
            .collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.base_config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.base_config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_sweep_changes_reference_only() {
        let mut runner = ScenarioRunner::default();
        runner.config_mut().seed = Some(1);

        let configs = runner.account_sweep(2..=4).unwrap();
        assert_eq!(configs.len(), 3);

        let results = runner.run_batch(&configs).unwrap();
        let reference_accounts: Vec<usize> = results
            .iter()
            .map(|r| r.reference().snapshots[0].account_balances.len())
            .collect();
        assert_eq!(reference_accounts, vec![2, 3, 4]);

        // The direct-investment strategy does not depend on the account count
        let direct: Vec<f64> = results
            .iter()
            .map(|r| r.strategy("direct_investment").unwrap().snapshots[30].regular_wealth)
            .collect();
        assert_eq!(direct[0], direct[1]);
        assert_eq!(direct[1], direct[2]);
    }

    #[test]
    fn test_account_sweep_rejects_custom_lineup() {
        let mut runner = ScenarioRunner::default();
        runner.config_mut().strategies = Some(vec![crate::strategy::StrategySpec::single_account()]);
        assert!(matches!(
            runner.account_sweep(1..=3),
            Err(ConfigError::AccountCountIgnored { count: 1 })
        ));
    }

    #[test]
    fn test_seed_sweep_is_deterministic() {
        let runner = ScenarioRunner::default();
        let first = runner.run_batch(&runner.seed_sweep(&[11, 12])).unwrap();
        let second = runner.run_batch(&runner.seed_sweep(&[11, 12])).unwrap();

        let adaptive_assets = |results: &[SimulationResult]| -> Vec<f64> {
            results
                .iter()
                .map(|r| r.strategy("adaptive").unwrap().summary().total_assets)
                .collect()
        };
        assert_eq!(adaptive_assets(&first), adaptive_assets(&second));
    }

    #[test]
    fn test_batch_stops_on_invalid_config() {
        let runner = ScenarioRunner::default();
        let bad = SimulationConfig {
            horizon_years: 0,
            ..Default::default()
        };
        assert!(runner.run_batch(&[runner.config().clone(), bad]).is_err());
    }
}
