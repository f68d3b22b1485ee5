//! Household strategy definitions

mod data;

pub use data::{
    AccountOpening, ContributionPolicy, StrategySpec, WithdrawalTiming, DEFAULT_ACCOUNT_CEILING,
};
