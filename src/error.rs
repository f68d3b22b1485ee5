//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before a simulation starts
///
/// Runtime conditions such as depleted regular wealth are not errors; they are
/// clamped and recorded as [`crate::projection::DepletionEvent`]s.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("horizon must be at least one year")]
    EmptyHorizon,

    #[error("retirement year {retirement_year} must lie within 1..={horizon}")]
    RetirementOutOfRange { retirement_year: u32, horizon: u32 },

    #[error("drawdown start year {drawdown_start} must lie within 1..={retirement_year}")]
    DrawdownOutOfRange { drawdown_start: u32, retirement_year: u32 },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} must be below 1.0 (got {value})")]
    FeeTooLarge { field: &'static str, value: f64 },

    #[error("strategy `{name}`: account ceiling must be positive (got {ceiling})")]
    InvalidCeiling { name: String, ceiling: f64 },

    #[error("strategy `{name}`: staggered withdrawals cannot start in year 0")]
    ZeroWithdrawalStart { name: String },

    #[error("strategy lineup is empty")]
    EmptyLineup,

    #[error("duplicate strategy name `{0}`")]
    DuplicateStrategy(String),

    #[error("sub-account count {count} has no effect on a custom strategy lineup")]
    AccountCountIgnored { count: usize },

    #[error("reference strategy index {index} is out of range for {count} strategies")]
    ReferenceOutOfRange { index: usize, count: usize },

    #[error("{table} tax table: {reason}")]
    InvalidTaxTable { table: &'static str, reason: String },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Check that a configured amount or rate is finite and non-negative
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidAmount { field, value })
    }
}

/// Check that a fee rate is a usable fraction in [0, 1)
pub(crate) fn ensure_fee(field: &'static str, value: f64) -> Result<(), ConfigError> {
    ensure_non_negative(field, value)?;
    if value >= 1.0 {
        return Err(ConfigError::FeeTooLarge { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_rejects_nan_and_negatives() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", 12.5).is_ok());
        assert!(ensure_non_negative("x", -0.01).is_err());
        assert!(ensure_non_negative("x", f64::NAN).is_err());
        assert!(ensure_non_negative("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_fee_must_be_below_one() {
        assert!(ensure_fee("fee", 0.004).is_ok());
        assert!(matches!(
            ensure_fee("fee", 1.0),
            Err(ConfigError::FeeTooLarge { field: "fee", .. })
        ));
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = ConfigError::InvalidAmount { field: "wealth_growth_rate", value: -0.1 };
        assert_eq!(
            err.to_string(),
            "wealth_growth_rate must be a finite, non-negative number (got -0.1)"
        );
    }
}
