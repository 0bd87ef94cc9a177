//! bco-serial: tune PID gains for one reference plant on a single thread.
//!
//! Usage:
//!   bco-serial --plant 2 [--seed 12345] [--iterations 500] [--no-log]

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colony_bench::cli::{init_tracing, open_log, write_json, SearchArgs};
use colony_bench::plants::Preset;
use colony_bench::report::{OutputMode, RunKind, RunSummary};
use pid_colony::{run_search, ProgressSink};

#[derive(Parser)]
#[command(name = "bco-serial", about = "Serial bee-colony PID tuning")]
struct Args {
    /// Plant to tune: 1, 2 or 3
    #[arg(long, short)]
    plant: Preset,

    #[command(flatten)]
    search: SearchArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.search.verbose);

    let plant = args.plant.plant().context("Invalid preset plant")?;
    let settings = args.search.settings();
    let log_path = args.search.log_path(args.plant, RunKind::Serial);
    let mut log = log_path.as_deref().and_then(open_log);
    let saved_to = log.as_ref().and(log_path);

    let start = Instant::now();
    let result = run_search(
        plant,
        settings,
        log.as_mut().map(|l| l as &mut dyn ProgressSink),
    )
    .context("Serial search failed")?;
    let elapsed = start.elapsed();
    drop(log);

    if let Some(path) = &args.search.json {
        write_json(path, &result)?;
    }

    let summary = RunSummary {
        plant: args.plant,
        threads: 1,
        elapsed,
        result,
        log_path: saved_to,
    };
    println!("Serial BCO");
    println!("{}", summary.render(OutputMode::Human));
    Ok(())
}
