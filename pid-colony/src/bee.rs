//! The Bee: one candidate point in gain space.
//!
//! - Gains (Kp, Ki, Kd), always inside the search box
//! - Fitness = step-response MSE (lower is better)
//! - Trial counter of consecutive failed improvements

use serde::{Deserialize, Serialize};

use crate::config::GainBox;
use crate::constants::UNEVALUATED_FITNESS;
use crate::utils::{clamp, RandomSource};

/// PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainTriple {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl GainTriple {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Uniform draw inside the box, in Kp, Ki, Kd order.
    pub fn random(bounds: &GainBox, rng: &mut RandomSource) -> Self {
        Self {
            kp: rng.uniform_real(bounds.kp.min, bounds.kp.max),
            ki: rng.uniform_real(bounds.ki.min, bounds.ki.max),
            kd: rng.uniform_real(bounds.kd.min, bounds.kd.max),
        }
    }

    /// Local search step: `x + phi * (x - partner)` per dimension, clamped.
    pub fn toward(&self, partner: &GainTriple, phi: f64, bounds: &GainBox) -> Self {
        Self {
            kp: self.kp + phi * (self.kp - partner.kp),
            ki: self.ki + phi * (self.ki - partner.ki),
            kd: self.kd + phi * (self.kd - partner.kd),
        }
        .clamped(bounds)
    }

    /// Saturate every gain to its bound.
    pub fn clamped(&self, bounds: &GainBox) -> Self {
        Self {
            kp: clamp(self.kp, bounds.kp.min, bounds.kp.max),
            ki: clamp(self.ki, bounds.ki.min, bounds.ki.max),
            kd: clamp(self.kd, bounds.kd.min, bounds.kd.max),
        }
    }

    pub fn is_within(&self, bounds: &GainBox) -> bool {
        bounds.kp.contains(self.kp) && bounds.ki.contains(self.ki) && bounds.kd.contains(self.kd)
    }
}

/// A single candidate solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Bee {
    pub gains: GainTriple,

    /// Step-response MSE of `gains`.
    pub fitness: f64,

    /// Consecutive local-search attempts that failed to improve.
    pub trials: u32,
}

impl Bee {
    /// Fresh bee with random gains, not yet evaluated.
    pub fn random(bounds: &GainBox, rng: &mut RandomSource) -> Self {
        Self {
            gains: GainTriple::random(bounds, rng),
            fitness: UNEVALUATED_FITNESS,
            trials: 0,
        }
    }

    /// Greedy selection. Keeps `candidate` only on strict improvement and
    /// resets the trial counter; otherwise counts a failed trial.
    ///
    /// Returns whether the candidate was accepted.
    pub fn offer(&mut self, candidate: GainTriple, fitness: f64) -> bool {
        if fitness < self.fitness {
            self.gains = candidate;
            self.fitness = fitness;
            self.trials = 0;
            true
        } else {
            self.trials += 1;
            false
        }
    }

    /// True once the bee has stagnated past `limit`.
    pub fn is_exhausted(&self, limit: u32) -> bool {
        self.trials > limit
    }

    /// Scout replacement: new random gains and a clean trial counter.
    /// The caller evaluates the new gains.
    pub fn reinitialize(&mut self, bounds: &GainBox, rng: &mut RandomSource) {
        self.gains = GainTriple::random(bounds, rng);
        self.fitness = UNEVALUATED_FITNESS;
        self.trials = 0;
    }
}
