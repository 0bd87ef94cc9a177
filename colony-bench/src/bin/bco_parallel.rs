//! bco-parallel: tune PID gains on a pool of worker threads and time it.
//!
//! Usage:
//!   bco-parallel <threads> <plant> [H|C] [--seed 12345] [--no-log]
//!
//! `H` prints a labelled summary, `C` a single `threads,plant,elapsed`
//! line for benchmark sweeps.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colony_bench::cli::{init_tracing, open_log, write_json, SearchArgs};
use colony_bench::plants::Preset;
use colony_bench::report::{OutputMode, RunKind, RunSummary};
use pid_colony::{run_search_parallel, ProgressSink};

#[derive(Parser)]
#[command(name = "bco-parallel", about = "Parallel bee-colony PID tuning")]
struct Args {
    /// Worker threads
    threads: usize,

    /// Plant to tune: 1, 2 or 3
    plant: Preset,

    /// Output mode: H (human) or C (csv)
    #[arg(default_value = "H")]
    mode: OutputMode,

    #[command(flatten)]
    search: SearchArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.search.verbose);

    if args.threads == 0 {
        bail!("threads must be at least 1");
    }

    let plant = args.plant.plant().context("Invalid preset plant")?;
    let settings = args.search.settings();
    let log_path = args.search.log_path(args.plant, RunKind::Parallel);
    let mut log = log_path.as_deref().and_then(open_log);
    let saved_to = log.as_ref().and(log_path);

    let start = Instant::now();
    let result = run_search_parallel(
        plant,
        settings,
        args.threads,
        log.as_mut().map(|l| l as &mut dyn ProgressSink),
    )
    .context("Parallel search failed")?;
    let elapsed = start.elapsed();
    drop(log);

    if let Some(path) = &args.search.json {
        write_json(path, &result)?;
    }

    let summary = RunSummary {
        plant: args.plant,
        threads: args.threads,
        elapsed,
        result,
        log_path: saved_to,
    };
    println!("{}", summary.render(args.mode));
    Ok(())
}
