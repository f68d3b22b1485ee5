//! Year-stepped simulation over every strategy in the lineup

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::strategy::StrategySpec;

use super::escalator::ContributionEscalator;
use super::snapshots::{Phase, SimulationResult};
use super::state::{MarketRates, StrategyState, YearContext};

/// Main simulation engine
pub struct SimulationEngine {
    config: SimulationConfig,
    lineup: Vec<StrategySpec>,
}

impl SimulationEngine {
    /// Validate the configuration and resolve the strategy lineup
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lineup = config.lineup();
        Ok(Self { config, lineup })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn lineup(&self) -> &[StrategySpec] {
        &self.lineup
    }

    /// Run the full horizon
    ///
    /// Each year the reference strategy steps first; its liquidation proceeds
    /// are the withdrawal every other strategy matches in that same year.
    pub fn run(&self) -> SimulationResult {
        let config = &self.config;
        let rates = MarketRates::from(config);
        let reference = config.reference_strategy;
        let mut escalator = ContributionEscalator::new(config.seed, config.contribution_cap);

        let mut states: Vec<StrategyState> = self
            .lineup
            .iter()
            .map(|spec| StrategyState::new(spec.clone(), config.initial_wealth))
            .collect();

        log::info!(
            "simulating {} strategies over {} years (reference: {}, seed: {:?})",
            states.len(),
            config.horizon_years,
            self.lineup[reference].name,
            config.seed
        );

        for year in 1..=config.horizon_years {
            let ctx = self.year_context(year, &mut escalator);

            let outcome = states[reference].step(&ctx, None, &rates, &config.tax);
            for (i, state) in states.iter_mut().enumerate() {
                if i != reference {
                    state.step(&ctx, Some(outcome.proceeds), &rates, &config.tax);
                }
            }

            log::debug!(
                "year {} ({:?}): reference withdrawal {:.2}",
                year,
                ctx.phase,
                outcome.proceeds
            );
        }

        let result = SimulationResult {
            strategies: states.into_iter().map(StrategyState::finish).collect(),
            reference,
        };

        for summary in result.summaries() {
            log::info!(
                "{}: total assets {:.2}, total tax {:.2}",
                summary.name,
                summary.total_assets,
                summary.total_tax
            );
        }

        result
    }

    fn year_context(&self, year: u32, escalator: &mut ContributionEscalator) -> YearContext {
        let config = &self.config;
        let phase = config.phase(year);

        if phase == Phase::Decumulation {
            return YearContext {
                year,
                phase,
                retirement_year: config.retirement_year,
                income: 0.0,
                investment: 0.0,
                contribution: 0.0,
                escalated_contribution: 0.0,
            };
        }

        YearContext {
            year,
            phase,
            retirement_year: config.retirement_year,
            income: config.initial_income,
            investment: config.yearly_investment,
            contribution: config.contribution,
            escalated_contribution: escalator.adjusted_contribution(config.contribution, year),
        }
    }
}
