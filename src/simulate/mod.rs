//! Deterministic demo data generators.
//!
//! Both simulators draw their noise from a seeded RNG, so the same
//! arguments always reproduce the same series.

pub mod emg;
pub mod stock;

pub use emg::{
    moving_average, simulate_session, ArmController, EmgSession, EmgSettings, EmgSimulator,
    SignalPoint,
};
pub use stock::{
    analyze, generate_history, PricePoint, StockParams, TrendAnalysis, TrendDirection,
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid ticker '{0}': use 1-10 letters, digits, '.' or '-'")]
    InvalidTicker(String),

    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        max: usize,
        value: usize,
    },

    #[error("interval must be positive and representable, got {0:?}")]
    InvalidInterval(std::time::Duration),

    #[error("target angle must lie in [-180, 180], got {0}")]
    InvalidTarget(f64),

    #[error("cannot analyze an empty price history")]
    EmptyHistory,
}

pub(crate) fn check_range(
    name: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), SimulationError> {
    if value < min {
        Err(SimulationError::TooSmall { name, min, value })
    } else if value > max {
        Err(SimulationError::TooLarge { name, max, value })
    } else {
        Ok(())
    }
}
