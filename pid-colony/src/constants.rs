//! Constants for the PID bee-colony tuner.
//!
//! Defaults mirror the production run: 100 bees, 500 iterations, a 40 s
//! step response sampled every millisecond, gains searched in [-10, 10].

// =============================================================================
// Simulation
// =============================================================================

/// Setpoint of the closed-loop step response.
pub const REFERENCE: f64 = 1.0;

/// Magnitude bound on error, integral, controller output and plant output.
/// Anything past this (or non-finite) aborts the simulation as unstable.
pub const DIVERGENCE_BOUND: f64 = 1e6;

/// MSE reported for an unstable or degenerate simulation.
pub const UNSTABLE_PENALTY: f64 = 1e9;

/// Default integration step in seconds.
pub const DEFAULT_DT: f64 = 0.001;

/// Default simulated horizon in seconds.
pub const DEFAULT_SIM_TIME: f64 = 40.0;

// =============================================================================
// Colony
// =============================================================================

/// Default population size.
pub const DEFAULT_NUM_BEES: usize = 100;

/// Default number of employed/onlooker/scout iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Default stagnation limit. A bee whose trial counter exceeds this is
/// replaced by a scout.
pub const DEFAULT_SCOUT_LIMIT: u32 = 30;

/// Smallest population for which a distinct partner always exists.
pub const MIN_NUM_BEES: usize = 2;

/// Fitness assigned to a freshly drawn bee before its first evaluation.
pub const UNEVALUATED_FITNESS: f64 = 1e9;

// =============================================================================
// Gain search box
// =============================================================================

/// Default lower bound for Kp, Ki and Kd.
pub const DEFAULT_GAIN_MIN: f64 = -10.0;

/// Default upper bound for Kp, Ki and Kd.
pub const DEFAULT_GAIN_MAX: f64 = 10.0;

// =============================================================================
// Progress log
// =============================================================================

/// Header row of the per-iteration CSV log.
pub const PROGRESS_HEADER: &str = "iteration,bestMSE,Kp,Ki,Kd";
