//! Data-parallel colony search on a dedicated rayon pool.
//!
//! Every phase splits the population into `workers` contiguous chunks.
//! Chunk `w` is written only by the task holding worker generator `w`
//! (seeded `base + w`), so no bee is ever touched by two threads and no
//! generator is shared. Partner lookups read a snapshot of all gains taken
//! at phase entry; updates made elsewhere in the same phase are not seen.
//!
//! Each phase ends at the pool's join barrier. The global best is a
//! parallel min-reduction, and progress rows are emitted on the calling
//! thread.
//!
//! A fixed base seed and worker count give the same run every time.
//! Changing the worker count changes the random streams, and so the result.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::bee::{Bee, GainTriple};
use crate::colony::{ColonyEngine, ColonyState, Forager, SearchResult, SearchState};
use crate::config::{ParallelSettings, SearchSettings};
use crate::constants::UNEVALUATED_FITNESS;
use crate::error::Result;
use crate::plant::PlantModel;
use crate::progress::ProgressSink;
use crate::swarm::Population;
use crate::utils::RandomSource;

/// Colony search spread over a fixed-size worker pool.
#[derive(Debug)]
pub struct ParallelColonySearch {
    colony: ColonyState,
    workers: Vec<RandomSource>,
    base_seed: u64,
    pool: ThreadPool,
}

impl ParallelColonySearch {
    /// Build the pool and one generator per worker.
    ///
    /// `settings.seed` is the base seed; when unset a base is drawn from
    /// entropy.
    pub fn new(
        plant: PlantModel,
        settings: SearchSettings,
        parallel: ParallelSettings,
    ) -> Result<Self> {
        let colony = ColonyState::new(plant, settings)?;
        let base_seed = colony
            .settings
            .seed
            .unwrap_or_else(|| RandomSource::from_entropy().next_seed());
        let workers = (0..parallel.workers)
            .map(|w| RandomSource::for_worker(base_seed, w))
            .collect();
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallel.workers)
            .thread_name(|i| format!("colony-worker-{}", i))
            .build()?;
        debug!(workers = parallel.workers, base_seed, "worker pool ready");

        Ok(Self {
            colony,
            workers,
            base_seed,
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
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

/// Apply `op` to every bee, chunk `w` on worker generator `w`.
///
/// `op` gets the bee's global index and returns how many evaluations it
/// made; the total is returned after the barrier.
fn par_for_each_bee<F>(
    pool: &ThreadPool,
    bees: &mut [Bee],
    workers: &mut [RandomSource],
    op: F,
) -> u64
where
    F: Fn(usize, &mut Bee, &mut RandomSource) -> u64 + Sync + Send,
{
    let chunk = bees.len().div_ceil(workers.len()).max(1);
    pool.install(|| {
        bees.par_chunks_mut(chunk)
            .zip(workers.par_iter_mut())
            .enumerate()
            .map(|(w, (chunk_bees, rng))| {
                let offset = w * chunk;
                chunk_bees
                    .iter_mut()
                    .enumerate()
                    .map(|(j, bee)| op(offset + j, bee, rng))
                    .sum::<u64>()
            })
            .sum()
    })
}

impl ColonyEngine for ParallelColonySearch {
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
        let placeholder = Bee {
            gains: GainTriple::default(),
            fitness: UNEVALUATED_FITNESS,
            trials: 0,
        };
        c.population = Population::from_bees(vec![placeholder; c.settings.num_bees]);

        let forager = Forager::new(&c.plant, &c.settings);
        let bounds = c.settings.bounds;
        c.evaluations += par_for_each_bee(
            &self.pool,
            c.population.as_mut_slice(),
            &mut self.workers,
            |_, bee, rng| {
                *bee = Bee::random(&bounds, rng);
                bee.fitness = forager.evaluate(&bee.gains);
                1
            },
        );

        if let Some(i) = self.best_index() {
            self.colony.adopt(i);
        }
        self.colony.state = SearchState::Initialized;
    }

    fn employed_phase(&mut self) {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        let partners = c.population.gains_snapshot();
        c.evaluations += par_for_each_bee(
            &self.pool,
            c.population.as_mut_slice(),
            &mut self.workers,
            |i, bee, rng| {
                let (candidate, fitness) = forager.employed(bee, i, rng, |k| partners[k]);
                bee.offer(candidate, fitness);
                1
            },
        );
    }

    fn onlooker_phase(&mut self) {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        let partners = c.population.gains_snapshot();
        c.evaluations += par_for_each_bee(
            &self.pool,
            c.population.as_mut_slice(),
            &mut self.workers,
            |i, bee, rng| match forager.onlooker(bee, i, rng, |k| partners[k]) {
                Some((candidate, fitness)) => {
                    bee.offer(candidate, fitness);
                    1
                }
                None => 0,
            },
        );
    }

    fn scout_phase(&mut self) -> usize {
        self.initialize();
        let c = &mut self.colony;
        let forager = Forager::new(&c.plant, &c.settings);
        let scouts = par_for_each_bee(
            &self.pool,
            c.population.as_mut_slice(),
            &mut self.workers,
            |i, bee, rng| {
                if forager.scout(bee, rng) {
                    trace!(index = i, mse = bee.fitness, "scout reinitialized bee");
                    1
                } else {
                    0
                }
            },
        );
        c.evaluations += scouts;
        scouts as usize
    }

    fn best_index(&self) -> Option<usize> {
        let bees = self.colony.population.as_slice();
        self.pool.install(|| {
            bees.par_iter()
                .enumerate()
                .map(|(i, bee)| (i, bee.fitness))
                .reduce_with(|a, b| {
                    if b.1 < a.1 || (b.1 == a.1 && b.0 < a.0) {
                        b
                    } else {
                        a
                    }
                })
                .map(|(i, _)| i)
        })
    }
}

/// Parallel entry point: validate, search on `workers` threads, return the
/// best snapshot.
pub fn run_search_parallel(
    plant: PlantModel,
    settings: SearchSettings,
    workers: usize,
    sink: Option<&mut dyn ProgressSink>,
) -> Result<SearchResult> {
    let parallel = ParallelSettings::new(workers)?;
    let mut engine = ParallelColonySearch::new(plant, settings, parallel)?;
    Ok(engine.run(sink))
}
