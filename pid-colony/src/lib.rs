//! PID gain tuning by bee-colony search.
//!
//! A population of candidate (Kp, Ki, Kd) triples is scored by simulating
//! the closed-loop unit-step response of a first- to third-order plant and
//! taking the mean squared tracking error. Employed, onlooker and scout
//! phases then refine the population. The search runs on one thread
//! ([`ColonySearch`]) or on a rayon pool ([`ParallelColonySearch`]).
//!
//! ```no_run
//! use pid_colony::{run_search, PlantModel, ProgressHistory, SearchSettings};
//!
//! let plant = PlantModel::new(vec![1.0], vec![1.0, 1.0]).unwrap();
//! let settings = SearchSettings { seed: Some(12345), ..SearchSettings::default() };
//! let mut history = ProgressHistory::new();
//! let result = run_search(plant, settings, Some(&mut history)).unwrap();
//! println!("best MSE {} with {:?}", result.best_fitness, result.best_gains);
//! ```

pub mod bee;
pub mod colony;
pub mod config;
pub mod constants;
pub mod error;
pub mod parallel;
pub mod plant;
pub mod progress;
pub mod simulation;
pub mod swarm;
pub mod utils;

pub use bee::{Bee, GainTriple};
pub use colony::{run_search, ColonyEngine, ColonySearch, SearchResult, SearchState};
pub use config::{GainBounds, GainBox, ParallelSettings, SearchSettings};
pub use error::{ConfigError, SearchError};
pub use parallel::{run_search_parallel, ParallelColonySearch};
pub use plant::PlantModel;
pub use progress::{CsvProgressLog, ProgressHistory, ProgressRow, ProgressSink};
pub use simulation::{simulate, SimulationOutcome};
pub use swarm::Population;
pub use utils::{clamp, RandomSource};
