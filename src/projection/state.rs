//! Per-strategy state and the yearly step

use crate::config::SimulationConfig;
use crate::strategy::{ContributionPolicy, StrategySpec, WithdrawalTiming};
use crate::tax::TaxRegime;

use super::ledger::{ClosedAccount, Ledger};
use super::snapshots::{DepletionEvent, Phase, StrategyResult, WithdrawalEvent, YearSnapshot};

/// Growth and fee rates shared by every strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketRates {
    pub wealth_growth: f64,
    pub wealth_fee: f64,
    pub account_growth: f64,
    pub account_fee: f64,
}

impl From<&SimulationConfig> for MarketRates {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            wealth_growth: config.wealth_growth_rate,
            wealth_fee: config.wealth_fee_rate,
            account_growth: config.account_growth_rate,
            account_fee: config.account_fee_rate,
        }
    }
}

/// Everything about a year that does not depend on the strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearContext {
    pub year: u32,
    pub phase: Phase,
    pub retirement_year: u32,
    /// Earned income (zero from retirement on)
    pub income: f64,
    /// Savings budget (zero from retirement on)
    pub investment: f64,
    /// Fixed pillar 3a contribution (zero from retirement on)
    pub contribution: f64,
    /// Escalated contribution ceiling (zero from retirement on)
    pub escalated_contribution: f64,
}

/// What a strategy's year produced that other strategies may depend on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// After-tax proceeds of accounts closed this year
    pub proceeds: f64,
}

/// Mutable state of one strategy during a run
#[derive(Debug, Clone)]
pub struct StrategyState {
    spec: StrategySpec,
    regular_wealth: f64,
    ledger: Ledger,
    cumulative_tax: f64,
    result: StrategyResult,
}

impl StrategyState {
    pub fn new(spec: StrategySpec, initial_wealth: f64) -> Self {
        let ledger = Ledger::new(spec.opening);
        let result = StrategyResult::new(spec.name.clone());
        Self {
            spec,
            regular_wealth: initial_wealth,
            ledger,
            cumulative_tax: 0.0,
            result,
        }
    }

    pub fn spec(&self) -> &StrategySpec {
        &self.spec
    }

    pub fn regular_wealth(&self) -> f64 {
        self.regular_wealth
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn cumulative_tax(&self) -> f64 {
        self.cumulative_tax
    }

    /// Advance one year
    ///
    /// `reference_withdrawal` is the amount every strategy pays out during
    /// decumulation. The reference strategy itself passes `None` and pays out
    /// its own liquidation proceeds.
    pub fn step(
        &mut self,
        ctx: &YearContext,
        reference_withdrawal: Option<f64>,
        rates: &MarketRates,
        tax: &TaxRegime,
    ) -> StepOutcome {
        let (proceeds, withdrawal_tax) = self.liquidate(ctx, tax);

        // Route liquidation proceeds
        let mut withdrawal = 0.0;
        let mut shortfall = 0.0;
        if ctx.phase == Phase::Decumulation {
            let target = reference_withdrawal.unwrap_or(proceeds);
            self.regular_wealth += proceeds - target;
            let missing = self.clamp_regular_wealth();
            withdrawal = target - missing;
            shortfall += missing;
        } else {
            self.regular_wealth += proceeds;
        }

        let planned = if self.ledger.accepts_contributions() {
            match self.spec.contribution {
                ContributionPolicy::Fixed => ctx.contribution,
                ContributionPolicy::Escalating => ctx.escalated_contribution,
            }
        } else {
            0.0
        };

        // Only money the household actually has reaches the accounts
        let affordable = ctx.investment + self.regular_wealth.max(0.0);
        let contribution = planned.min(affordable);
        if contribution < planned {
            log::debug!(
                "{}: year {} contribution limited to {:.2} (planned {:.2})",
                self.spec.name,
                ctx.year,
                contribution,
                planned
            );
        }

        // Contributions are deductible from taxable income
        let yearly_tax = tax.combined_tax(ctx.income - contribution, self.regular_wealth);
        self.regular_wealth -= yearly_tax;
        self.cumulative_tax += yearly_tax;

        self.ledger
            .apply_year(contribution, rates.account_growth, rates.account_fee, ctx.year);

        self.regular_wealth *= 1.0 - rates.wealth_fee;
        self.regular_wealth *= 1.0 + rates.wealth_growth;
        self.regular_wealth += (ctx.investment - contribution) * (1.0 - rates.wealth_fee);
        shortfall += self.clamp_regular_wealth();

        let depleted = shortfall > 0.0;
        if depleted {
            log::warn!(
                "{}: regular wealth depleted in year {} (shortfall {:.2})",
                self.spec.name,
                ctx.year,
                shortfall
            );
            self.result.depletions.push(DepletionEvent {
                year: ctx.year,
                shortfall,
            });
        }

        self.result.add_snapshot(YearSnapshot {
            year: ctx.year,
            phase: ctx.phase,
            regular_wealth: self.regular_wealth,
            tax_advantaged: self.ledger.total(),
            account_balances: self.ledger.balances(),
            active_accounts: self.ledger.active_count(),
            contribution,
            yearly_tax,
            cumulative_tax: self.cumulative_tax,
            liquidation_proceeds: proceeds,
            withdrawal_tax,
            withdrawal,
            depleted,
        });

        StepOutcome { proceeds }
    }

    /// Close the accounts due this year; returns (after-tax proceeds, withdrawal tax)
    fn liquidate(&mut self, ctx: &YearContext, tax: &TaxRegime) -> (f64, f64) {
        let closed: Vec<ClosedAccount> = match self.spec.withdrawal {
            WithdrawalTiming::LumpSumAtRetirement if ctx.year == ctx.retirement_year => {
                self.ledger.liquidate_all()
            }
            WithdrawalTiming::LumpSumAtRetirement => Vec::new(),
            WithdrawalTiming::Staggered { start_year } if ctx.year >= start_year => {
                self.ledger.liquidate_oldest().into_iter().collect()
            }
            WithdrawalTiming::Staggered { .. } => Vec::new(),
        };

        let mut proceeds = 0.0;
        let mut withdrawal_tax = 0.0;
        for account in closed {
            let tax_due = tax.withdrawal_tax(account.balance);
            let after_tax = account.balance - tax_due;
            log::debug!(
                "{}: year {} closed account {} ({:.2} before tax, {:.2} tax)",
                self.spec.name,
                ctx.year,
                account.id + 1,
                account.balance,
                tax_due
            );
            self.result.withdrawals.push(WithdrawalEvent {
                year: ctx.year,
                account: account.id + 1,
                balance: account.balance,
                tax: tax_due,
                after_tax,
            });
            proceeds += after_tax;
            withdrawal_tax += tax_due;
        }
        (proceeds, withdrawal_tax)
    }

    /// Clamp negative regular wealth to zero, returning the amount clamped
    fn clamp_regular_wealth(&mut self) -> f64 {
        if self.regular_wealth < 0.0 {
            let shortfall = -self.regular_wealth;
            self.regular_wealth = 0.0;
            shortfall
        } else {
            0.0
        }
    }

    pub fn finish(self) -> StrategyResult {
        self.result
    }
}
