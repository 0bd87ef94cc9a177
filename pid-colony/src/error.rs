//! Error types for the colony search.
//!
//! Only configuration problems are errors. Unstable simulations are scored
//! with a penalty and progress-log failures are reported on the result.

use thiserror::Error;

/// Result type alias using SearchError
pub type Result<T> = std::result::Result<T, SearchError>;

/// Top-level failure of a search run.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Settings or plant rejected before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size {0} is below the minimum of 2")]
    PopulationTooSmall(usize),

    #[error("{name} bounds are invalid: min {min}, max {max}")]
    InvalidBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("simulation horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),

    #[error("horizon {horizon} is shorter than one step of {dt}")]
    ZeroSteps { dt: f64, horizon: f64 },

    #[error("plant numerator must have at least one coefficient")]
    EmptyNumerator,

    #[error("plant denominator length {0} is unsupported (expected 2, 3 or 4)")]
    UnsupportedDenominator(usize),

    #[error("plant coefficients must be finite")]
    NonFiniteCoefficient,

    #[error("worker count must be at least 1")]
    NoWorkers,
}
