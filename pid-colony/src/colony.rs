//! Bee-colony search over PID gains.
//!
//! Each iteration runs three phases over the whole population, in order:
//! - Employed: every bee tries one step toward/away from a random partner
//! - Onlooker: every bee retries with probability `1 / (1 + fitness)`
//! - Scout: bees stagnant past the limit are redrawn from scratch
//!
//! followed by a global-best update and one progress row.
//!
//! The onlooker probability favours bees with *higher* cost, unlike the
//! canonical fitness-proportional choice. Existing tuning results depend on
//! it, so it stays.
//!
//! [`ColonyEngine`] carries the iteration loop and state machine. The serial
//! [`ColonySearch`] and the rayon-backed
//! [`ParallelColonySearch`](crate::parallel::ParallelColonySearch) only
//! implement the phases.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::bee::{Bee, GainTriple};
use crate::config::SearchSettings;
use crate::constants::UNEVALUATED_FITNESS;
use crate::error::Result;
use crate::plant::PlantModel;
use crate::progress::{ProgressEmitter, ProgressRow, ProgressSink};
use crate::simulation::simulate;
use crate::swarm::Population;
use crate::utils::RandomSource;

/// Final snapshot of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_gains: GainTriple,

    /// MSE of `best_gains`.
    pub best_fitness: f64,

    /// Iterations executed.
    pub iterations: usize,

    /// Simulator calls made, initial evaluation included.
    pub evaluations: u64,

    /// True if the progress sink failed and was dropped mid-run.
    pub progress_lost: bool,
}

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Uninitialized,
    Initialized,
    Iterating,
    Done,
}

/// State shared by both engines.
#[derive(Debug, Clone)]
pub struct ColonyState {
    pub(crate) plant: PlantModel,
    pub(crate) settings: SearchSettings,
    pub(crate) population: Population,
    pub(crate) best_gains: GainTriple,
    pub(crate) best_fitness: f64,
    pub(crate) state: SearchState,
    pub(crate) iterations_done: usize,
    pub(crate) evaluations: u64,
    pub(crate) progress_lost: bool,
}

impl ColonyState {
    /// Validates both the settings and the plant.
    pub(crate) fn new(plant: PlantModel, settings: SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            plant,
            settings,
            population: Population::default(),
            best_gains: GainTriple::default(),
            best_fitness: UNEVALUATED_FITNESS,
            state: SearchState::Uninitialized,
            iterations_done: 0,
            evaluations: 0,
            progress_lost: false,
        })
    }

    pub fn plant(&self) -> &PlantModel {
        &self.plant
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn iterations_done(&self) -> usize {
        self.iterations_done
    }

    /// Current global best (gains, fitness).
    pub fn best(&self) -> (GainTriple, f64) {
        (self.best_gains, self.best_fitness)
    }

    pub fn result(&self) -> SearchResult {
        SearchResult {
            best_gains: self.best_gains,
            best_fitness: self.best_fitness,
            iterations: self.iterations_done,
            evaluations: self.evaluations,
            progress_lost: self.progress_lost,
        }
    }

    /// Replace the snapshot with the population's best on strict improvement.
    pub(crate) fn adopt_if_better(&mut self, index: usize) -> bool {
        let bee = &self.population[index];
        if bee.fitness < self.best_fitness {
            self.best_gains = bee.gains;
            self.best_fitness = bee.fitness;
            true
        } else {
            false
        }
    }

    /// Unconditional snapshot, used right after the initial evaluation.
    pub(crate) fn adopt(&mut self, index: usize) {
        let bee = &self.population[index];
        self.best_gains = bee.gains;
        self.best_fitness = bee.fitness;
    }
}

/// Per-bee search moves, shared by the serial and parallel phases.
///
/// Draw order is fixed: partner index (resampled until it differs from the
/// bee's own), then `phi`. Onlookers draw their acceptance roll first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Forager<'a> {
    plant: &'a PlantModel,
    settings: &'a SearchSettings,
}

impl<'a> Forager<'a> {
    pub(crate) fn new(plant: &'a PlantModel, settings: &'a SearchSettings) -> Self {
        Self { plant, settings }
    }

    /// Score gains by their step-response MSE.
    pub(crate) fn evaluate(&self, gains: &GainTriple) -> f64 {
        simulate(gains, self.plant, self.settings.dt, self.settings.sim_time).mse
    }

    fn pick_partner(&self, index: usize, rng: &mut RandomSource) -> usize {
        let last = self.settings.num_bees - 1;
        loop {
            let k = rng.uniform_int(0, last);
            if k != index {
                return k;
            }
        }
    }

    /// Employed move: perturb around a random partner and evaluate.
    pub(crate) fn employed<F>(
        &self,
        bee: &Bee,
        index: usize,
        rng: &mut RandomSource,
        partner: F,
    ) -> (GainTriple, f64)
    where
        F: Fn(usize) -> GainTriple,
    {
        let k = self.pick_partner(index, rng);
        let phi = rng.uniform_real(-1.0, 1.0);
        let candidate = bee.gains.toward(&partner(k), phi, &self.settings.bounds);
        (candidate, self.evaluate(&candidate))
    }

    /// Onlooker move: an employed move taken with probability `1 / (1 + fitness)`.
    pub(crate) fn onlooker<F>(
        &self,
        bee: &Bee,
        index: usize,
        rng: &mut RandomSource,
        partner: F,
    ) -> Option<(GainTriple, f64)>
    where
        F: Fn(usize) -> GainTriple,
    {
        let prob = 1.0 / (1.0 + bee.fitness);
        if rng.uniform_real(0.0, 1.0) < prob {
            Some(self.employed(bee, index, rng, partner))
        } else {
            None
        }
    }

    /// Scout move: redraw and re-evaluate a bee stagnant past the limit.
    pub(crate) fn scout(&self, bee: &mut Bee, rng: &mut RandomSource) -> bool {
        if !bee.is_exhausted(self.settings.limit) {
            return false;
        }
        bee.reinitialize(&self.settings.bounds, rng);
        bee.fitness = self.evaluate(&bee.gains);
        true
    }
}

/// A colony search engine: the phases plus a provided iteration loop.
pub trait ColonyEngine {
    fn colony(&self) -> &ColonyState;

    fn colony_mut(&mut self) -> &mut ColonyState;

    /// Draw and evaluate the population, then take the initial best.
    /// Does nothing once initialized.
    fn initialize(&mut self);

    fn employed_phase(&mut self);

    fn onlooker_phase(&mut self);

    /// Returns how many bees were scouted.
    fn scout_phase(&mut self) -> usize;

    /// Index of the lowest-fitness bee, lowest index on ties.
    fn best_index(&self) -> Option<usize>;

    /// Take the population's best if it strictly beats the incumbent.
    fn update_best(&mut self) -> bool {
        match self.best_index() {
            Some(i) => self.colony_mut().adopt_if_better(i),
            None => false,
        }
    }

    /// Run one full iteration and return its progress row.
    fn step(&mut self) -> ProgressRow {
        self.initialize();
        self.colony_mut().state = SearchState::Iterating;

        self.employed_phase();
        self.onlooker_phase();
        let scouts = self.scout_phase();
        let improved = self.update_best();

        let colony = self.colony_mut();
        let row = ProgressRow {
            iteration: colony.iterations_done,
            best_fitness: colony.best_fitness,
            gains: colony.best_gains,
        };
        colony.iterations_done += 1;
        debug!(
            iteration = row.iteration,
            best_mse = row.best_fitness,
            scouts,
            improved,
            "iteration complete"
        );
        row
    }

    /// Run the remaining iterations, emitting one row per iteration.
    ///
    /// A failing sink is dropped with a warning and reported through
    /// [`SearchResult::progress_lost`]. Calling `run` again once done
    /// returns the same result.
    fn run(&mut self, sink: Option<&mut dyn ProgressSink>) -> SearchResult {
        if self.colony().state == SearchState::Done {
            return self.colony().result();
        }
        {
            let colony = self.colony();
            let s = &colony.settings;
            info!(
                order = colony.plant.order(),
                bees = s.num_bees,
                iterations = s.max_iterations,
                limit = s.limit,
                dt = s.dt,
                sim_time = s.sim_time,
                "starting colony search"
            );
        }

        self.initialize();
        let mut emitter = ProgressEmitter::new(sink);
        while self.colony().iterations_done < self.colony().settings.max_iterations {
            let row = self.step();
            emitter.emit(&row);
        }

        let colony = self.colony_mut();
        colony.progress_lost |= emitter.lost();
        colony.state = SearchState::Done;
        let result = colony.result();
        info!(
            best_mse = result.best_fitness,
            kp = result.best_gains.kp,
            ki = result.best_gains.ki,
            kd = result.best_gains.kd,
            evaluations = result.evaluations,
            "colony search finished"
        );
        result
    }
}

/// Single-threaded engine with one generator.
///
/// Phases update the live population, so later bees in a phase can pick an
/// already-improved partner. Fully deterministic for a fixed seed.
#[derive(Debug, Clone)]
pub struct ColonySearch {
    colony: ColonyState,
    rng: RandomSource,
}

impl ColonySearch {
    /// Seeds from `settings.seed`, or from entropy when unset.
    pub fn new(plant: PlantModel, settings: SearchSettings) -> Result<Self> {
        let rng = match settings.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Self::with_random_source(plant, settings, rng)
    }

    /// Use an explicit generator; `settings.seed` is ignored.
    pub fn with_random_source(
        plant: PlantModel,
        settings: SearchSettings,
        rng: RandomSource,
    ) -> Result<Self> {
        Ok(Self {
            colony: ColonyState::new(plant, settings)?,
            rng,
        })
    }

    pub fn population(&self) -> &Population {
        &self.colony.population
    }

    pub fn state(&self) -> SearchState {
        self.colony.state
    }

    pub fn best(&self) -> (GainTriple, f64) {
        self.colony.best()
    }
}

impl ColonyEngine for ColonySearch {
    fn colony(&self) -> &ColonyState {
        &self.colony
    }

    fn colony_mut(&mut self) -> &mut ColonyState {
        &mut self.colony
    }

    fn initialize(&mut self) {
        if self.colony.state != SearchState::Uninitialized {
            return;
        }
        let c = &mut self.colony;
        c.population = Population::random(c.settings.num_bees, &c.settings.bounds, &mut self.rng);

        let forager = Forager::new(&c.plant, &c.settings);
        for bee in c.population.as_mut_slice() {
            bee.fitness = forager.evaluate(&bee.gains);
        }
        c.evaluations += c.settings.num_bees as u64;

        if let Some(i) = c.population.best_index() {
            c.adopt(i);
        }
        c.state = SearchState::Initialized;
    }

    fn employed_phase(&mut self) {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        for i in 0..c.population.len() {
            let (candidate, fitness) =
                forager.employed(&c.population[i], i, &mut self.rng, |k| c.population[k].gains);
            c.population[i].offer(candidate, fitness);
            c.evaluations += 1;
        }
    }

    fn onlooker_phase(&mut self) {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        for i in 0..c.population.len() {
            let attempt =
                forager.onlooker(&c.population[i], i, &mut self.rng, |k| c.population[k].gains);
            if let Some((candidate, fitness)) = attempt {
                c.population[i].offer(candidate, fitness);
                c.evaluations += 1;
            }
        }
    }

    fn scout_phase(&mut self) -> usize {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        let mut scouts = 0;
        for (i, bee) in c.population.as_mut_slice().iter_mut().enumerate() {
            if forager.scout(bee, &mut self.rng) {
                trace!(index = i, mse = bee.fitness, "scout reinitialized bee");
                scouts += 1;
            }
        }
        c.evaluations += scouts as u64;
        scouts
    }

    fn best_index(&self) -> Option<usize> {
        self.colony.population.best_index()
    }
}

/// Serial entry point: validate, search, return the best snapshot.
pub fn run_search(
    plant: PlantModel,
    settings: SearchSettings,
    sink: Option<&mut dyn ProgressSink>,
) -> Result<SearchResult> {
    let mut engine = ColonySearch::new(plant, settings)?;
    Ok(engine.run(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GainBox;

    fn forager_fixture() -> (PlantModel, SearchSettings) {
        let plant = PlantModel::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let settings = SearchSettings {
            num_bees: 4,
            max_iterations: 1,
            limit: 2,
            bounds: GainBox::uniform(-10.0, 10.0),
            dt: 0.01,
            sim_time: 1.0,
            seed: Some(0),
        };
        (plant, settings)
    }

    fn bee(fitness: f64, trials: u32) -> Bee {
        Bee {
            gains: GainTriple::new(1.0, 1.0, 1.0),
            fitness,
            trials,
        }
    }

    #[test]
    fn test_partner_never_self() {
        let (plant, settings) = forager_fixture();
        let forager = Forager::new(&plant, &settings);
        let mut rng = RandomSource::seeded(8);
        for i in 0..settings.num_bees {
            for _ in 0..200 {
                assert_ne!(forager.pick_partner(i, &mut rng), i);
            }
        }
    }

    #[test]
    fn test_onlooker_always_tries_perfect_bee() {
        let (plant, settings) = forager_fixture();
        let forager = Forager::new(&plant, &settings);
        let mut rng = RandomSource::seeded(3);
        let partners = [GainTriple::new(2.0, 0.0, 0.0); 4];
        for _ in 0..100 {
            assert!(forager.onlooker(&bee(0.0, 0), 0, &mut rng, |k| partners[k]).is_some());
        }
    }

    #[test]
    fn test_onlooker_skips_penalized_bee() {
        let (plant, settings) = forager_fixture();
        let forager = Forager::new(&plant, &settings);
        let mut rng = RandomSource::seeded(3);
        let partners = [GainTriple::default(); 4];
        let tries = (0..1000)
            .filter(|_| {
                forager
                    .onlooker(&bee(UNEVALUATED_FITNESS, 0), 1, &mut rng, |k| partners[k])
                    .is_some()
            })
            .count();
        assert_eq!(tries, 0);
    }

    #[test]
    fn test_employed_candidate_stays_in_bounds() {
        let (plant, settings) = forager_fixture();
        let forager = Forager::new(&plant, &settings);
        let mut rng = RandomSource::seeded(5);
        let mut far = bee(1.0, 0);
        far.gains = GainTriple::new(10.0, -10.0, 10.0);
        let partners = [GainTriple::new(-10.0, 10.0, -10.0); 4];
        for _ in 0..100 {
            let (candidate, fitness) = forager.employed(&far, 0, &mut rng, |k| partners[k]);
            assert!(candidate.is_within(&settings.bounds));
            assert_eq!(fitness, forager.evaluate(&candidate));
        }
    }

    #[test]
    fn test_scout_waits_until_limit_exceeded() {
        let (plant, settings) = forager_fixture();
        let forager = Forager::new(&plant, &settings);
        let mut rng = RandomSource::seeded(1);

        let mut at_limit = bee(0.5, 2);
        assert!(!forager.scout(&mut at_limit, &mut rng));
        assert_eq!(at_limit.trials, 2);

        let mut past_limit = bee(0.5, 3);
        assert!(forager.scout(&mut past_limit, &mut rng));
        assert_eq!(past_limit.trials, 0);
        assert!(past_limit.gains.is_within(&settings.bounds));
        assert_eq!(past_limit.fitness, forager.evaluate(&past_limit.gains));
    }

    #[test]
    fn test_adopt_if_better_is_strict() {
        let (plant, settings) = forager_fixture();
        let mut colony = ColonyState::new(plant, settings).unwrap();
        colony.population = Population::from_bees(vec![bee(0.4, 0), bee(0.4, 0)]);
        colony.adopt(0);
        colony.population[1].gains = GainTriple::new(9.0, 9.0, 9.0);
        assert!(!colony.adopt_if_better(1));
        assert_eq!(colony.best().0, GainTriple::new(1.0, 1.0, 1.0));
        colony.population[1].fitness = 0.3;
        assert!(colony.adopt_if_better(1));
        assert_eq!(colony.best(), (GainTriple::new(9.0, 9.0, 9.0), 0.3));
    }
}
