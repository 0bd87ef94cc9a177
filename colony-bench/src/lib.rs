//! Colony Bench: command-line drivers for the PID bee-colony tuner.
//!
//! Holds the preset plants, the shared flags and the run reporting used by
//! the `bco-serial` and `bco-parallel` binaries.

pub mod cli;
pub mod plants;
pub mod report;
