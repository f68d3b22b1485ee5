//! Income, wealth and withdrawal tax for a single taxpayer

mod progressive;
mod withdrawal;

pub use progressive::{TaxBracket, TaxBracketTable};
pub use withdrawal::{WithdrawalTaxSchedule, WithdrawalTier};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ConfigError};

/// Cantonal tax multiplier (Steueranlage Kanton Bern)
pub const BERN_CANTON_MULTIPLIER: f64 = 3.025;

/// Municipal tax multiplier
pub const BERN_MUNICIPAL_MULTIPLIER: f64 = 1.54;

/// Wealth at or below this amount pays no wealth tax
pub const BERN_WEALTH_EXEMPTION: f64 = 97_000.0;

/// Container for every table the simulation taxes against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRegime {
    pub income: TaxBracketTable,
    pub wealth: TaxBracketTable,
    /// Exemption gate; above it the whole wealth runs through the table
    pub wealth_exemption: f64,
    pub withdrawal: WithdrawalTaxSchedule,
    pub canton_multiplier: f64,
    pub municipal_multiplier: f64,
}

impl TaxRegime {
    /// Canton Bern, single person
    pub fn canton_bern() -> Self {
        Self {
            income: TaxBracketTable::bern_income(),
            wealth: TaxBracketTable::bern_wealth(),
            wealth_exemption: BERN_WEALTH_EXEMPTION,
            withdrawal: WithdrawalTaxSchedule::bern_pillar_3a(),
            canton_multiplier: BERN_CANTON_MULTIPLIER,
            municipal_multiplier: BERN_MUNICIPAL_MULTIPLIER,
        }
    }

    /// Simple (base) income tax before multipliers
    pub fn income_tax(&self, income: f64) -> f64 {
        self.income.tax(income)
    }

    /// Simple (base) wealth tax before multipliers
    pub fn wealth_tax(&self, wealth: f64) -> f64 {
        if wealth <= self.wealth_exemption {
            return 0.0;
        }
        self.wealth.tax(wealth)
    }

    pub fn total_multiplier(&self) -> f64 {
        self.canton_multiplier + self.municipal_multiplier
    }

    /// Yearly tax bill: base income and wealth tax scaled by both multipliers
    pub fn combined_tax(&self, income: f64, wealth: f64) -> f64 {
        (self.income_tax(income) + self.wealth_tax(wealth)) * self.total_multiplier()
    }

    /// One-off tax on liquidating a pillar 3a account
    pub fn withdrawal_tax(&self, amount: f64) -> f64 {
        self.withdrawal.tax(amount)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.income.validate("income")?;
        self.wealth.validate("wealth")?;
        self.withdrawal.validate()?;
        ensure_non_negative("tax.wealth_exemption", self.wealth_exemption)?;
        ensure_non_negative("tax.canton_multiplier", self.canton_multiplier)?;
        ensure_non_negative("tax.municipal_multiplier", self.municipal_multiplier)?;
        Ok(())
    }
}

impl Default for TaxRegime {
    fn default() -> Self {
        Self::canton_bern()
    }
}
