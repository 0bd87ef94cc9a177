//! The Plant: a linear transfer function of order 1 to 3.
//!
//! `G(s) = b0 / (s^n + a_{n-1} s^{n-1} + ... + a0)`. The denominator is
//! given highest power first and its leading coefficient is taken to be 1;
//! only the first numerator coefficient is used.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable plant description, validated on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlant")]
pub struct PlantModel {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

#[derive(Deserialize)]
struct RawPlant {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl TryFrom<RawPlant> for PlantModel {
    type Error = ConfigError;

    fn try_from(raw: RawPlant) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl PlantModel {
    /// Build a plant from transfer-function coefficients.
    pub fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Result<Self, ConfigError> {
        if numerator.is_empty() {
            return Err(ConfigError::EmptyNumerator);
        }
        if !(2..=4).contains(&denominator.len()) {
            return Err(ConfigError::UnsupportedDenominator(denominator.len()));
        }
        if numerator.iter().chain(&denominator).any(|c| !c.is_finite()) {
            return Err(ConfigError::NonFiniteCoefficient);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Numerator coefficients as given.
    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    /// Denominator coefficients as given, highest power first.
    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// Plant order (1, 2 or 3).
    pub fn order(&self) -> usize {
        self.denominator.len() - 1
    }

    /// Input gain `b0`.
    pub fn input_gain(&self) -> f64 {
        self.numerator[0]
    }
}
