//! Lump-sum withdrawal tax with cliff-rate tiers

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tier threshold and the rate applied to the whole amount up to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalTier {
    pub threshold: f64,
    pub rate: f64,
}

/// Tiered withdrawal tax schedule
///
/// Not marginal: the first tier whose threshold is at or above the amount sets
/// a single rate for the entire withdrawal, so the tax jumps at each threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalTaxSchedule {
    tiers: Vec<WithdrawalTier>,
}

impl WithdrawalTaxSchedule {
    pub fn new(tiers: &[(f64, f64)]) -> Self {
        Self {
            tiers: tiers
                .iter()
                .map(|&(threshold, rate)| WithdrawalTier { threshold, rate })
                .collect(),
        }
    }

    /// Pillar 3a capital withdrawal rates, Canton Bern
    pub fn bern_pillar_3a() -> Self {
        Self::new(&[
            (50_000.0, 0.047),
            (100_000.0, 0.056),
            (150_000.0, 0.066),
            (200_000.0, 0.075),
            (250_000.0, 0.084),
            (300_000.0, 0.093),
            (350_000.0, 0.102),
            (400_000.0, 0.111),
            (450_000.0, 0.120),
            (500_000.0, 0.129),
        ])
    }

    pub fn tiers(&self) -> &[WithdrawalTier] {
        &self.tiers
    }

    /// Rate for a withdrawal of `amount`; amounts above the last threshold use the last rate
    pub fn rate_for(&self, amount: f64) -> f64 {
        self.tiers
            .iter()
            .find(|tier| amount <= tier.threshold)
            .or_else(|| self.tiers.last())
            .map(|tier| tier.rate)
            .unwrap_or(0.0)
    }

    /// Tax due on withdrawing `amount` in one piece
    pub fn tax(&self, amount: f64) -> f64 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        amount * self.rate_for(amount)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTaxTable {
            table: "withdrawal",
            reason,
        };

        if self.tiers.is_empty() {
            return Err(invalid("no tiers".to_string()));
        }

        let mut previous = 0.0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if !tier.threshold.is_finite() || tier.threshold <= previous {
                return Err(invalid(format!(
                    "tier {} threshold {} does not exceed {}",
                    i + 1,
                    tier.threshold,
                    previous
                )));
            }
            if !tier.rate.is_finite() || !(0.0..1.0).contains(&tier.rate) {
                return Err(invalid(format!("tier {} has rate {}", i + 1, tier.rate)));
            }
            previous = tier.threshold;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_whole_amount_taxed_at_tier_rate() {
        let schedule = WithdrawalTaxSchedule::bern_pillar_3a();
        assert_relative_eq!(schedule.tax(50_000.0), 2_350.0, epsilon = 1e-9);
        assert_relative_eq!(schedule.tax(50_001.0), 50_001.0 * 0.056, epsilon = 1e-9);
        assert_relative_eq!(schedule.tax(20_000.0), 940.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cliff_at_threshold() {
        let schedule = WithdrawalTaxSchedule::bern_pillar_3a();
        let at = schedule.tax(100_000.0);
        let just_above = schedule.tax(100_000.01);
        // 5.6% -> 6.6% on the whole amount: roughly a 1,000 jump for one cent
        assert!(just_above - at > 999.0);
    }

    #[test]
    fn test_effective_rate_is_a_step_function() {
        let schedule = WithdrawalTaxSchedule::bern_pillar_3a();
        let mut lower = 0.0;
        let mut previous_rate = 0.0;

        for tier in schedule.tiers() {
            let samples = [lower + 1.0, (lower + tier.threshold) / 2.0, tier.threshold];
            for amount in samples {
                assert_relative_eq!(schedule.tax(amount) / amount, tier.rate, epsilon = 1e-12);
            }
            assert!(tier.rate > previous_rate);
            previous_rate = tier.rate;
            lower = tier.threshold;
        }
    }

    #[test]
    fn test_above_last_threshold_uses_last_rate() {
        let schedule = WithdrawalTaxSchedule::bern_pillar_3a();
        assert_relative_eq!(schedule.rate_for(2_000_000.0), 0.129);
    }

    #[test]
    fn test_non_positive_amount_is_untaxed() {
        let schedule = WithdrawalTaxSchedule::bern_pillar_3a();
        assert_eq!(schedule.tax(0.0), 0.0);
        assert_eq!(schedule.tax(-10.0), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(WithdrawalTaxSchedule::bern_pillar_3a().validate().is_ok());
        assert!(WithdrawalTaxSchedule::new(&[]).validate().is_err());
        assert!(WithdrawalTaxSchedule::new(&[(10.0, 0.05), (5.0, 0.06)])
            .validate()
            .is_err());
    }
}
