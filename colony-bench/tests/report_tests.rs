use std::path::PathBuf;
use std::time::Duration;

use colony_bench::plants::Preset;
use colony_bench::report::{default_log_path, OutputMode, RunKind, RunSummary};
use pid_colony::{GainTriple, SearchResult};

fn summary(log_path: Option<PathBuf>) -> RunSummary {
    RunSummary {
        plant: Preset::G2,
        threads: 8,
        elapsed: Duration::from_millis(1500),
        result: SearchResult {
            best_gains: GainTriple::new(1.0, 2.0, 0.5),
            best_fitness: 0.25,
            iterations: 500,
            evaluations: 100_000,
            progress_lost: false,
        },
        log_path,
    }
}

#[test]
fn test_default_log_paths() {
    assert_eq!(
        default_log_path(Preset::G1, RunKind::Serial),
        PathBuf::from("data/logs/bco_G1_serial.csv")
    );
    assert_eq!(
        default_log_path(Preset::G3, RunKind::Parallel),
        PathBuf::from("data/logs/bco_G3_parallel.csv")
    );
}

#[test]
fn test_output_mode_parsing() {
    assert_eq!("H".parse::<OutputMode>(), Ok(OutputMode::Human));
    assert_eq!("C".parse::<OutputMode>(), Ok(OutputMode::Csv));
    assert!("X".parse::<OutputMode>().is_err());
    assert_eq!(OutputMode::default(), OutputMode::Human);
}

#[test]
fn test_csv_line() {
    assert_eq!(summary(None).render(OutputMode::Csv), "8,2,1.500000");
}

#[test]
fn test_human_summary_labels() {
    let text = summary(Some(PathBuf::from("out.csv"))).render(OutputMode::Human);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Threads : 8");
    assert_eq!(lines[1], "Plant : G2");
    assert!(text.contains("Best MSE : 0.25"));
    assert!(text.contains("Kp = 1, Ki = 2, Kd = 0.5"));
    assert!(text.contains("Log saved to out.csv"));
    assert_eq!(lines.last(), Some(&"Execution Time : 1.500000 seconds"));
}

#[test]
fn test_human_summary_flags_lost_log() {
    let mut s = summary(None);
    s.result.progress_lost = true;
    let text = s.render(OutputMode::Human);
    assert!(!text.contains("Log saved"));
    assert!(text.contains("incomplete"));
}
