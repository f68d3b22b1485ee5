//! Year-stepped projection of every strategy

mod engine;
mod escalator;
mod ledger;
mod snapshots;
mod state;

pub use engine::SimulationEngine;
pub use escalator::{ContributionEscalator, ESCALATION_MAX, ESCALATION_MIN};
pub use ledger::{Account, ClosedAccount, Ledger};
pub use snapshots::{
    DepletionEvent, Phase, SimulationResult, StrategyResult, StrategySummary, WithdrawalEvent,
    YearSnapshot,
};
pub use state::{MarketRates, StepOutcome, StrategyState, YearContext};
