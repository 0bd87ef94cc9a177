//! Per-iteration progress recording.
//!
//! A sink receives one row per iteration from the coordinating thread.
//! Sink failures are never fatal to a search: the engine drops the sink,
//! warns, and flags the result.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bee::GainTriple;
use crate::constants::PROGRESS_HEADER;

/// Best-so-far snapshot after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRow {
    /// 0-based iteration index.
    pub iteration: usize,
    pub best_fitness: f64,
    pub gains: GainTriple,
}

/// Receiver of progress rows.
pub trait ProgressSink {
    fn record(&mut self, row: &ProgressRow) -> io::Result<()>;
}

/// CSV log: header `iteration,bestMSE,Kp,Ki,Kd`, then one line per row.
#[derive(Debug)]
pub struct CsvProgressLog<W: Write> {
    out: W,
}

impl CsvProgressLog<BufWriter<File>> {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvProgressLog<W> {
    /// Wrap any writer; the header is written immediately.
    pub fn from_writer(mut out: W) -> io::Result<Self> {
        writeln!(out, "{}", PROGRESS_HEADER)?;
        out.flush()?;
        Ok(Self { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for CsvProgressLog<W> {
    fn record(&mut self, row: &ProgressRow) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{}",
            row.iteration, row.best_fitness, row.gains.kp, row.gains.ki, row.gains.kd
        )?;
        self.out.flush()
    }
}

/// In-memory recorder, handy for inspecting convergence.
#[derive(Debug, Clone, Default)]
pub struct ProgressHistory {
    pub rows: Vec<ProgressRow>,
}

impl ProgressHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best fitness per iteration.
    pub fn fitness_curve(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.best_fitness).collect()
    }
}

impl ProgressSink for ProgressHistory {
    fn record(&mut self, row: &ProgressRow) -> io::Result<()> {
        self.rows.push(*row);
        Ok(())
    }
}

/// Optional sink plus the "it failed once" flag.
pub(crate) struct ProgressEmitter<'s> {
    sink: Option<&'s mut dyn ProgressSink>,
    lost: bool,
}

impl<'s> ProgressEmitter<'s> {
    pub(crate) fn new(sink: Option<&'s mut dyn ProgressSink>) -> Self {
        Self { sink, lost: false }
    }

    pub(crate) fn emit(&mut self, row: &ProgressRow) {
        let failed = match self.sink.as_mut() {
            Some(sink) => sink.record(row).err(),
            None => None,
        };
        if let Some(err) = failed {
            warn!(iteration = row.iteration, error = %err, "progress sink failed, continuing without it");
            self.sink = None;
            self.lost = true;
        }
    }

    pub(crate) fn lost(&self) -> bool {
        self.lost
    }
}
