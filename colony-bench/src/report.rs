//! Run summaries and log locations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pid_colony::SearchResult;

use crate::plants::Preset;

pub const LOG_DIR: &str = "data/logs";

/// Which engine produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Serial,
    Parallel,
}

impl RunKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RunKind::Serial => "serial",
            RunKind::Parallel => "parallel",
        }
    }
}

/// `data/logs/bco_G{n}_{serial|parallel}.csv`
pub fn default_log_path(plant: Preset, kind: RunKind) -> PathBuf {
    PathBuf::from(LOG_DIR).join(format!("bco_{}_{}.csv", plant, kind.as_str()))
}

/// How the parallel driver prints its timing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Labelled lines for people.
    #[default]
    Human,
    /// One `threads,plant,elapsed` line for benchmark scripts.
    Csv,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" | "h" => Ok(OutputMode::Human),
            "C" | "c" => Ok(OutputMode::Csv),
            other => Err(format!("unknown output mode '{}', expected H or C", other)),
        }
    }
}

/// What a driver prints once the search returns.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub plant: Preset,
    pub threads: usize,
    pub elapsed: Duration,
    pub result: SearchResult,
    pub log_path: Option<PathBuf>,
}

impl RunSummary {
    /// `threads,plant,elapsed_seconds`
    pub fn csv_line(&self) -> String {
        format!(
            "{},{},{:.6}",
            self.threads,
            self.plant.index(),
            self.elapsed.as_secs_f64()
        )
    }

    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Human => self.to_string(),
            OutputMode::Csv => self.csv_line(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.result.best_gains;
        writeln!(f, "Threads : {}", self.threads)?;
        writeln!(f, "Plant : {}", self.plant)?;
        writeln!(f, "Best MSE : {}", self.result.best_fitness)?;
        writeln!(f, "Kp = {}, Ki = {}, Kd = {}", g.kp, g.ki, g.kd)?;
        if let Some(path) = &self.log_path {
            writeln!(f, "Log saved to {}", path.display())?;
        }
        if self.result.progress_lost {
            writeln!(f, "Progress log incomplete (write failed)")?;
        }
        write!(
            f,
            "Execution Time : {:.6} seconds",
            self.elapsed.as_secs_f64()
        )
    }
}
