//! The Simulation: a PID controller closing the loop around a plant.
//!
//! Fixed-step forward Euler on the plant's controllable canonical form,
//! rectangular integration of the error and a backward-difference
//! derivative. The reference is a unit step.

use crate::bee::GainTriple;
use crate::constants::*;
use crate::plant::PlantModel;

/// Result of one closed-loop step response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOutcome {
    /// Mean squared tracking error, or [`UNSTABLE_PENALTY`].
    pub mse: f64,

    /// Plant output when the simulation stopped.
    pub final_output: f64,

    /// False when the run diverged or had no steps to average over.
    pub stable: bool,
}

impl SimulationOutcome {
    fn penalty(final_output: f64) -> Self {
        Self {
            mse: UNSTABLE_PENALTY,
            final_output,
            stable: false,
        }
    }
}

/// Controller and plant state advanced one `dt` at a time.
#[derive(Debug, Clone)]
pub struct ClosedLoop<'a> {
    gains: GainTriple,
    plant: &'a PlantModel,
    dt: f64,

    /// Integrator chain: position, velocity, acceleration.
    states: [f64; 3],

    /// Plant output.
    y: f64,

    integral: f64,
    prev_error: f64,

    /// Steps completed so far.
    pub tick: u64,
}

impl<'a> ClosedLoop<'a> {
    /// Start at rest: zero output, zero integral, previous error 0.
    pub fn new(gains: GainTriple, plant: &'a PlantModel, dt: f64) -> Self {
        Self {
            gains,
            plant,
            dt,
            states: [0.0; 3],
            y: 0.0,
            integral: 0.0,
            prev_error: 0.0,
            tick: 0,
        }
    }

    /// Current plant output.
    pub fn output(&self) -> f64 {
        self.y
    }

    /// Advance one step.
    ///
    /// Returns the squared error of this step, or `None` as soon as the
    /// error, integral, control effort or output is non-finite or leaves
    /// `±DIVERGENCE_BOUND`.
    pub fn step(&mut self) -> Option<f64> {
        let dt = self.dt;
        let error = REFERENCE - self.y;
        if !within_bound(error) {
            return None;
        }

        self.integral += error * dt;
        let derivative = (error - self.prev_error) / dt;
        let u = self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative;
        if !within_bound(u) || !within_bound(self.integral) {
            return None;
        }

        let b0 = self.plant.input_gain();
        let den = self.plant.denominator();
        let [x1, x2, x3] = &mut self.states;
        match self.plant.order() {
            1 => {
                // y' = -a1 y + b0 u
                let a1 = den[1];
                self.y += dt * (-a1 * self.y + b0 * u);
            }
            2 => {
                // y'' = b0 u - a1 y' - a0 y
                let (a1, a0) = (den[1], den[2]);
                let y_ddot = b0 * u - a1 * *x2 - a0 * *x1;
                *x2 += dt * y_ddot;
                *x1 += dt * *x2;
                self.y = *x1;
            }
            _ => {
                // y''' = b0 u - a2 y'' - a1 y' - a0 y
                let (a2, a1, a0) = (den[1], den[2], den[3]);
                let y_dddot = b0 * u - a2 * *x3 - a1 * *x2 - a0 * *x1;
                *x3 += dt * y_dddot;
                *x2 += dt * *x3;
                *x1 += dt * *x2;
                self.y = *x1;
            }
        }
        if !within_bound(self.y) {
            return None;
        }

        self.prev_error = error;
        self.tick += 1;
        Some(error * error)
    }
}

fn within_bound(value: f64) -> bool {
    value.is_finite() && value.abs() <= DIVERGENCE_BOUND
}

/// Simulate the unit-step response under PID control.
///
/// Runs `floor(horizon / dt)` steps and returns the mean squared error.
/// Divergence, or a horizon too short for a single step, yields
/// [`UNSTABLE_PENALTY`] instead of a NaN or infinite score.
pub fn simulate(gains: &GainTriple, plant: &PlantModel, dt: f64, horizon: f64) -> SimulationOutcome {
    let steps = (horizon / dt).floor();
    if !(steps >= 1.0) || !steps.is_finite() {
        return SimulationOutcome::penalty(0.0);
    }
    let steps = steps as u64;

    let mut sim = ClosedLoop::new(*gains, plant, dt);
    let mut sum_sq = 0.0;
    for _ in 0..steps {
        match sim.step() {
            Some(sq) => sum_sq += sq,
            None => return SimulationOutcome::penalty(sim.output()),
        }
    }

    SimulationOutcome {
        mse: sum_sq / steps as f64,
        final_output: sim.output(),
        stable: true,
    }
}
