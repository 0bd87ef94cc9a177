//! The three reference plants, selected on the command line by index.

use std::fmt;
use std::str::FromStr;

use pid_colony::{ConfigError, PlantModel};

/// A reference plant, `G1` to `G3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 1 / (s + 1)
    G1,
    /// 5 / (s^2 + 2s + 5)
    G2,
    /// 10 / (s^3 + 3s^2 + 12s + 10)
    G3,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::G1, Preset::G2, Preset::G3];

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Preset::G1),
            2 => Some(Preset::G2),
            3 => Some(Preset::G3),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Preset::G1 => 1,
            Preset::G2 => 2,
            Preset::G3 => 3,
        }
    }

    fn coefficients(self) -> (Vec<f64>, Vec<f64>) {
        match self {
            Preset::G1 => (vec![1.0], vec![1.0, 1.0]),
            Preset::G2 => (vec![5.0], vec![1.0, 2.0, 5.0]),
            Preset::G3 => (vec![10.0], vec![1.0, 3.0, 12.0, 10.0]),
        }
    }

    pub fn plant(self) -> Result<PlantModel, ConfigError> {
        let (num, den) = self.coefficients();
        PlantModel::new(num, den)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.index())
    }
}

impl FromStr for Preset {
    type Err = String;

    /// Accepts `1`, `2`, `3` or `G1`, `G2`, `G3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['G', 'g']);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Preset::from_index)
            .ok_or_else(|| format!("unknown plant '{}', expected 1, 2 or 3", s))
    }
}
