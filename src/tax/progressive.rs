//! Progressive bracket tables for income and wealth tax

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One bracket: the rate applies to the slice between the previous limit and `limit`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Cumulative upper limit of the bracket
    pub limit: f64,
    /// Marginal rate as a fraction (0.0044 = 0.44%)
    pub rate: f64,
}

/// Progressive bracket table with a catch-all top rate
///
/// Brackets are stored as cumulative limits. Tables published as slice widths
/// (the Bern wealth table) are normalised on construction, so every table is
/// walked the same way: each bracket consumes its full nominal width, even at
/// a 0% rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
    /// Rate applied above the last limit
    top_rate: f64,
}

impl TaxBracketTable {
    /// Build from (cumulative limit, rate) pairs
    pub fn from_limits(limits: &[(f64, f64)], top_rate: f64) -> Self {
        Self {
            brackets: limits
                .iter()
                .map(|&(limit, rate)| TaxBracket { limit, rate })
                .collect(),
            top_rate,
        }
    }

    /// Build from (slice width, rate) pairs
    pub fn from_widths(widths: &[(f64, f64)], top_rate: f64) -> Self {
        let mut limit = 0.0;
        let brackets = widths
            .iter()
            .map(|&(width, rate)| {
                limit += width;
                TaxBracket { limit, rate }
            })
            .collect();
        Self { brackets, top_rate }
    }

    /// Canton Bern income tax, single person (percent rates converted)
    pub fn bern_income() -> Self {
        Self::from_limits(
            &[
                (17_800.0, 0.0),
                (35_600.0, 0.0044),
                (58_400.0, 0.0088),
                (89_200.0, 0.0132),
                (116_900.0, 0.0176),
                (176_800.0, 0.0220),
                (351_600.0, 0.0264),
            ],
            0.0297,
        )
    }

    /// Canton Bern wealth tax (permille rates converted, published as widths)
    pub fn bern_wealth() -> Self {
        Self::from_widths(
            &[
                (35_000.0, 0.0),
                (40_000.0, 0.0004),
                (135_000.0, 0.0007),
                (215_000.0, 0.0008),
                (360_000.0, 0.0010),
                (535_000.0, 0.0012),
                (2_300_000.0, 0.0013),
                (2_500_000.0, 0.00135),
            ],
            0.00125,
        )
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn top_rate(&self) -> f64 {
        self.top_rate
    }

    /// Tax owed on `amount`; zero for zero, negative or NaN input
    pub fn tax(&self, amount: f64) -> f64 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }

        let mut tax = 0.0;
        let mut lower = 0.0;

        for bracket in &self.brackets {
            if amount <= lower {
                return tax;
            }
            tax += (amount.min(bracket.limit) - lower) * bracket.rate;
            lower = bracket.limit;
        }

        if amount > lower {
            tax += (amount - lower) * self.top_rate;
        }

        tax
    }

    /// Limits must be strictly increasing and rates finite and non-negative
    pub fn validate(&self, table: &'static str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTaxTable { table, reason };

        let mut previous = 0.0;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if !bracket.limit.is_finite() || bracket.limit <= previous {
                return Err(invalid(format!(
                    "bracket {} limit {} does not exceed {}",
                    i + 1,
                    bracket.limit,
                    previous
                )));
            }
            if !bracket.rate.is_finite() || bracket.rate < 0.0 {
                return Err(invalid(format!("bracket {} has rate {}", i + 1, bracket.rate)));
            }
            previous = bracket.limit;
        }

        if !self.top_rate.is_finite() || self.top_rate < 0.0 {
            return Err(invalid(format!("top rate {}", self.top_rate)));
        }
        Ok(())
    }
}
