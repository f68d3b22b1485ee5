//! Strategy description: how many accounts, how they are filled and when they are drawn

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default balance at which a dynamically managed account stops taking contributions
pub const DEFAULT_ACCOUNT_CEILING: f64 = 50_000.0;

/// How pillar 3a accounts come into existence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountOpening {
    /// `count` accounts opened at the start; contributions split evenly
    Fixed { count: usize },
    /// One account at the start; a new one whenever the newest reaches `ceiling`
    Dynamic { ceiling: f64 },
}

/// When accounts are liquidated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WithdrawalTiming {
    /// Every active account is closed in the retirement year
    LumpSumAtRetirement,
    /// The oldest active account is closed each year from `start_year` on
    Staggered { start_year: u32 },
}

/// Which contribution amount a strategy pays in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionPolicy {
    /// The configured contribution, every year
    Fixed,
    /// The stochastically escalated contribution ceiling for the year
    Escalating,
}

/// A household strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    pub opening: AccountOpening,
    pub withdrawal: WithdrawalTiming,
    pub contribution: ContributionPolicy,
}

impl StrategySpec {
    pub fn new(
        name: impl Into<String>,
        opening: AccountOpening,
        withdrawal: WithdrawalTiming,
        contribution: ContributionPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            opening,
            withdrawal,
            contribution,
        }
    }

    /// Many accounts, one closed per year from the drawdown start, proceeds reinvested until retirement
    pub fn multi_account(count: usize, drawdown_start: u32) -> Self {
        Self::new(
            "multi_account",
            AccountOpening::Fixed { count },
            WithdrawalTiming::Staggered { start_year: drawdown_start },
            ContributionPolicy::Fixed,
        )
    }

    /// No pillar 3a at all; everything goes to regular investments
    pub fn direct_investment(retirement_year: u32) -> Self {
        Self::new(
            "direct_investment",
            AccountOpening::Fixed { count: 0 },
            WithdrawalTiming::Staggered { start_year: retirement_year },
            ContributionPolicy::Fixed,
        )
    }

    /// One account, withdrawn in full at retirement
    pub fn single_account() -> Self {
        Self::new(
            "single_account",
            AccountOpening::Fixed { count: 1 },
            WithdrawalTiming::LumpSumAtRetirement,
            ContributionPolicy::Fixed,
        )
    }

    /// A few accounts, one closed per year from retirement on
    pub fn staggered_accounts(count: usize, retirement_year: u32) -> Self {
        Self::new(
            "staggered_accounts",
            AccountOpening::Fixed { count },
            WithdrawalTiming::Staggered { start_year: retirement_year },
            ContributionPolicy::Fixed,
        )
    }

    /// Accounts opened on demand at a balance ceiling, paying the escalating contribution
    pub fn adaptive(ceiling: f64, drawdown_start: u32) -> Self {
        Self::new(
            "adaptive",
            AccountOpening::Dynamic { ceiling },
            WithdrawalTiming::Staggered { start_year: drawdown_start },
            ContributionPolicy::Escalating,
        )
    }

    /// Number of accounts opened at simulation start
    pub fn initial_accounts(&self) -> usize {
        match self.opening {
            AccountOpening::Fixed { count } => count,
            AccountOpening::Dynamic { .. } => 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let AccountOpening::Dynamic { ceiling } = self.opening {
            if !ceiling.is_finite() || ceiling <= 0.0 {
                return Err(ConfigError::InvalidCeiling {
                    name: self.name.clone(),
                    ceiling,
                });
            }
        }
        if let WithdrawalTiming::Staggered { start_year: 0 } = self.withdrawal {
            return Err(ConfigError::ZeroWithdrawalStart {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let multi = StrategySpec::multi_account(10, 32);
        assert_eq!(multi.initial_accounts(), 10);
        assert_eq!(multi.withdrawal, WithdrawalTiming::Staggered { start_year: 32 });

        assert_eq!(StrategySpec::direct_investment(37).initial_accounts(), 0);
        assert_eq!(
            StrategySpec::single_account().withdrawal,
            WithdrawalTiming::LumpSumAtRetirement
        );

        let adaptive = StrategySpec::adaptive(DEFAULT_ACCOUNT_CEILING, 32);
        assert_eq!(adaptive.initial_accounts(), 1);
        assert_eq!(adaptive.contribution, ContributionPolicy::Escalating);
    }

    #[test]
    fn test_validate_ceiling() {
        let spec = StrategySpec::adaptive(0.0, 32);
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::InvalidCeiling { .. })
        ));
        assert!(StrategySpec::adaptive(50_000.0, 32).validate().is_ok());
    }

    #[test]
    fn test_validate_start_year() {
        let spec = StrategySpec::staggered_accounts(5, 0);
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::ZeroWithdrawalStart { .. })
        ));
    }

    #[test]
    fn test_spec_json_shape() {
        let json = r#"{
            "name": "three_accounts",
            "opening": { "kind": "fixed", "count": 3 },
            "withdrawal": { "kind": "staggered", "start_year": 35 },
            "contribution": "fixed"
        }"#;
        let spec: StrategySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.opening, AccountOpening::Fixed { count: 3 });
        assert_eq!(spec.withdrawal, WithdrawalTiming::Staggered { start_year: 35 });

        let lump: WithdrawalTiming =
            serde_json::from_str(r#"{ "kind": "lump_sum_at_retirement" }"#).unwrap();
        assert_eq!(lump, WithdrawalTiming::LumpSumAtRetirement);
    }
}
