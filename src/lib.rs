//! Pillar 3a Forecast - year-stepped wealth projection for Swiss pillar 3a strategies
//!
//! This library provides:
//! - Progressive income and wealth tax (Canton Bern) and the pillar 3a withdrawal tax
//! - A multi-account ledger with equal-split, single-account and ceiling-based opening
//! - One parameterised strategy simulator for every household strategy
//! - Reference-matched withdrawals during decumulation
//! - Seeded contribution escalation and batch scenario runs

pub mod config;
pub mod error;
pub mod output;
pub mod projection;
pub mod scenario;
pub mod strategy;
pub mod tax;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use error::ConfigError;
pub use projection::{SimulationEngine, SimulationResult, StrategyResult, YearSnapshot};
pub use scenario::ScenarioRunner;
pub use strategy::StrategySpec;
pub use tax::TaxRegime;
