//! Search settings and their validation.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Closed interval for one gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainBounds {
    pub min: f64,
    pub max: f64,
}

impl GainBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidBounds {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for GainBounds {
    fn default() -> Self {
        Self::new(DEFAULT_GAIN_MIN, DEFAULT_GAIN_MAX)
    }
}

/// Search box for (Kp, Ki, Kd).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainBox {
    pub kp: GainBounds,
    pub ki: GainBounds,
    pub kd: GainBounds,
}

impl GainBox {
    /// Same interval on every gain.
    pub fn uniform(min: f64, max: f64) -> Self {
        let b = GainBounds::new(min, max);
        Self { kp: b, ki: b, kd: b }
    }
}

/// Everything a run needs besides the plant. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Population size (at least 2).
    pub num_bees: usize,

    /// Number of employed/onlooker/scout iterations.
    pub max_iterations: usize,

    /// Stagnation limit before a bee is scouted.
    pub limit: u32,

    pub bounds: GainBox,

    /// Simulation step in seconds.
    pub dt: f64,

    /// Simulated horizon in seconds.
    pub sim_time: f64,

    /// Serial seed, or parallel base seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            num_bees: DEFAULT_NUM_BEES,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            limit: DEFAULT_SCOUT_LIMIT,
            bounds: GainBox::default(),
            dt: DEFAULT_DT,
            sim_time: DEFAULT_SIM_TIME,
            seed: None,
        }
    }
}

impl SearchSettings {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bees < MIN_NUM_BEES {
            return Err(ConfigError::PopulationTooSmall(self.num_bees));
        }
        self.bounds.kp.validate("Kp")?;
        self.bounds.ki.validate("Ki")?;
        self.bounds.kd.validate("Kd")?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if !self.sim_time.is_finite() || self.sim_time <= 0.0 {
            return Err(ConfigError::InvalidHorizon(self.sim_time));
        }
        if (self.sim_time / self.dt).floor() < 1.0 {
            return Err(ConfigError::ZeroSteps {
                dt: self.dt,
                horizon: self.sim_time,
            });
        }
        Ok(())
    }

    /// Number of simulation steps per evaluation.
    pub fn steps(&self) -> u64 {
        (self.sim_time / self.dt).floor() as u64
    }
}

/// Worker pool shape for the parallel engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelSettings {
    pub workers: usize,
}

impl ParallelSettings {
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(Self { workers })
    }
}
