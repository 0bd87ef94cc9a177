use std::io::Write;

use pid_colony::{CsvProgressLog, GainTriple, ProgressHistory, ProgressRow, ProgressSink};

fn row(iteration: usize, best_fitness: f64) -> ProgressRow {
    ProgressRow {
        iteration,
        best_fitness,
        gains: GainTriple::new(1.5, -0.25, 2.0),
    }
}

#[test]
fn test_csv_header_written_on_creation() {
    let log = CsvProgressLog::from_writer(Vec::new()).unwrap();
    assert_eq!(String::from_utf8(log.into_inner()).unwrap(), "iteration,bestMSE,Kp,Ki,Kd\n");
}

#[test]
fn test_csv_row_column_order() {
    let mut log = CsvProgressLog::from_writer(Vec::new()).unwrap();
    log.record(&row(0, 0.125)).unwrap();
    log.record(&row(1, 0.0625)).unwrap();
    let text = String::from_utf8(log.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "0,0.125,1.5,-0.25,2");
    assert_eq!(lines[2], "1,0.0625,1.5,-0.25,2");
}

#[test]
fn test_csv_create_truncates_existing_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "stale line from an old run").unwrap();
    file.flush().unwrap();

    let mut log = CsvProgressLog::create(file.path()).unwrap();
    log.record(&row(0, 0.5)).unwrap();
    drop(log);

    let contents = std::fs::read_to_string(file.path()).unwrap();
    assert!(!contents.contains("stale"));
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_csv_create_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("log.csv");
    assert!(CsvProgressLog::create(path).is_err());
}

#[test]
fn test_history_keeps_rows_in_order() {
    let mut history = ProgressHistory::new();
    history.record(&row(0, 0.9)).unwrap();
    history.record(&row(1, 0.4)).unwrap();
    assert_eq!(history.rows.len(), 2);
    assert_eq!(history.fitness_curve(), vec![0.9, 0.4]);
}
