//! Flags and setup shared by both drivers.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pid_colony::{CsvProgressLog, SearchResult, SearchSettings};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::plants::Preset;
use crate::report::{default_log_path, RunKind};

pub const DEFAULT_SEED: u64 = 12345;

/// Search knobs. Anything left out keeps its `SearchSettings::default()` value.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// RNG seed (parallel runs derive one seed per worker from it)
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Population size
    #[arg(long)]
    pub bees: Option<usize>,

    /// Number of iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Stagnation limit before a bee is scouted
    #[arg(long)]
    pub limit: Option<u32>,

    /// Lower bound for every gain
    #[arg(long, allow_hyphen_values = true)]
    pub gain_min: Option<f64>,

    /// Upper bound for every gain
    #[arg(long, allow_hyphen_values = true)]
    pub gain_max: Option<f64>,

    /// Simulation time step in seconds
    #[arg(long)]
    pub dt: Option<f64>,

    /// Simulated horizon in seconds
    #[arg(long)]
    pub sim_time: Option<f64>,

    /// Progress CSV path [default: data/logs/bco_G<n>_<mode>.csv]
    #[arg(long, conflicts_with = "no_log")]
    pub log: Option<PathBuf>,

    /// Run without a progress CSV
    #[arg(long)]
    pub no_log: bool,

    /// Also write the final result as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Debug-level logging on stderr (RUST_LOG overrides)
    #[arg(long, short)]
    pub verbose: bool,
}

impl SearchArgs {
    pub fn settings(&self) -> SearchSettings {
        let base = SearchSettings::default();
        let mut bounds = base.bounds;
        if let Some(min) = self.gain_min {
            bounds.kp.min = min;
            bounds.ki.min = min;
            bounds.kd.min = min;
        }
        if let Some(max) = self.gain_max {
            bounds.kp.max = max;
            bounds.ki.max = max;
            bounds.kd.max = max;
        }
        SearchSettings {
            num_bees: self.bees.unwrap_or(base.num_bees),
            max_iterations: self.iterations.unwrap_or(base.max_iterations),
            limit: self.limit.unwrap_or(base.limit),
            bounds,
            dt: self.dt.unwrap_or(base.dt),
            sim_time: self.sim_time.unwrap_or(base.sim_time),
            seed: Some(self.seed),
        }
    }

    /// Where the progress CSV goes, if anywhere.
    pub fn log_path(&self, plant: Preset, kind: RunKind) -> Option<PathBuf> {
        if self.no_log {
            return None;
        }
        Some(
            self.log
                .clone()
                .unwrap_or_else(|| default_log_path(plant, kind)),
        )
    }
}

/// Install the stderr subscriber. Default level is `warn`, `debug` with
/// `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second install (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open the progress log, creating its directory.
///
/// Failure is logged and the run goes on without a log.
pub fn open_log(path: &Path) -> Option<CsvProgressLog<BufWriter<File>>> {
    let opened = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or(Ok(()), |dir| fs::create_dir_all(dir))
        .and_then(|_| CsvProgressLog::create(path));
    match opened {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open progress log, running without it");
            None
        }
    }
}

pub fn write_json(path: &Path, result: &SearchResult) -> Result<()> {
    let text = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
    fs::write(path, text).with_context(|| format!("Failed to write: {}", path.display()))
}
