//! The Swarm: a fixed-size population of bees.
//!
//! Bees are addressed by position. Indices never change for the lifetime of
//! an engine; scouts replace a bee's contents in place.

use std::ops::{Index, IndexMut};

use crate::bee::{Bee, GainTriple};
use crate::config::GainBox;
use crate::utils::RandomSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    bees: Vec<Bee>,
}

impl Population {
    /// Draw `size` bees uniformly inside `bounds`, in index order.
    pub fn random(size: usize, bounds: &GainBox, rng: &mut RandomSource) -> Self {
        let bees = (0..size).map(|_| Bee::random(bounds, rng)).collect();
        Self { bees }
    }

    pub fn from_bees(bees: Vec<Bee>) -> Self {
        Self { bees }
    }

    pub fn len(&self) -> usize {
        self.bees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bee> {
        self.bees.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bee> {
        self.bees.iter()
    }

    pub fn as_slice(&self) -> &[Bee] {
        &self.bees
    }

    pub fn as_mut_slice(&mut self) -> &mut [Bee] {
        &mut self.bees
    }

    /// Copy of every bee's gains, used as the partner table for a phase.
    pub fn gains_snapshot(&self) -> Vec<GainTriple> {
        self.bees.iter().map(|b| b.gains).collect()
    }

    /// Index of the lowest fitness. Ties go to the lowest index.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, bee) in self.bees.iter().enumerate() {
            match best {
                Some((_, fit)) if bee.fitness >= fit => {}
                _ => best = Some((i, bee.fitness)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Whether every bee's gains lie inside `bounds`.
    pub fn all_within(&self, bounds: &GainBox) -> bool {
        self.bees.iter().all(|b| b.gains.is_within(bounds))
    }
}

impl Index<usize> for Population {
    type Output = Bee;

    fn index(&self, index: usize) -> &Bee {
        &self.bees[index]
    }
}

impl IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Bee {
        &mut self.bees[index]
    }
}
