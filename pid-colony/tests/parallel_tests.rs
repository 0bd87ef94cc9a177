use pid_colony::{
    run_search_parallel, simulate, ColonyEngine, ConfigError, CsvProgressLog, GainBox,
    ParallelColonySearch, ParallelSettings, PlantModel, ProgressHistory, SearchError,
    SearchSettings, SearchState,
};

fn g1() -> PlantModel {
    PlantModel::new(vec![1.0], vec![1.0, 1.0]).unwrap()
}

fn g3() -> PlantModel {
    PlantModel::new(vec![10.0], vec![1.0, 3.0, 12.0, 10.0]).unwrap()
}

fn small_settings(seed: u64) -> SearchSettings {
    SearchSettings {
        num_bees: 10,
        max_iterations: 5,
        limit: 3,
        bounds: GainBox::uniform(-10.0, 10.0),
        dt: 0.01,
        sim_time: 2.0,
        seed: Some(seed),
    }
}

#[test]
fn test_parallel_end_to_end_first_order_with_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bco_G1_parallel.csv");
    let mut log = CsvProgressLog::create(&path).unwrap();

    let result = run_search_parallel(g1(), small_settings(12345), 4, Some(&mut log)).unwrap();
    drop(log);

    assert!(result.best_fitness.is_finite());
    assert!(result.best_fitness <= 1.0, "best MSE {}", result.best_fitness);
    assert!(result.best_gains.is_within(&GainBox::uniform(-10.0, 10.0)));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 6);
    assert_eq!(contents.lines().next(), Some("iteration,bestMSE,Kp,Ki,Kd"));
}

#[test]
fn test_same_seed_same_workers_is_deterministic() {
    let run = || {
        let mut log = CsvProgressLog::from_writer(Vec::new()).unwrap();
        let result = run_search_parallel(g3(), small_settings(77), 3, Some(&mut log)).unwrap();
        (result, log.into_inner())
    };
    let (a, log_a) = run();
    let (b, log_b) = run();
    assert_eq!(a, b);
    assert_eq!(log_a, log_b);
}

#[test]
fn test_worker_seeds_derive_from_base() {
    let engine = ParallelColonySearch::new(
        g1(),
        small_settings(500),
        ParallelSettings::new(3).unwrap(),
    )
    .unwrap();
    assert_eq!(engine.workers(), 3);
    assert_eq!(engine.base_seed(), 500);
}

#[test]
fn test_more_workers_than_bees() {
    let mut history = ProgressHistory::new();
    let result = run_search_parallel(g1(), small_settings(9), 16, Some(&mut history)).unwrap();
    assert_eq!(history.rows.len(), 5);
    assert!(result.best_fitness.is_finite());
}

#[test]
fn test_single_worker_runs() {
    let result = run_search_parallel(g1(), small_settings(9), 1, None).unwrap();
    assert_eq!(result.iterations, 5);
}

#[test]
fn test_parallel_best_is_non_increasing() {
    let mut history = ProgressHistory::new();
    let settings = SearchSettings {
        max_iterations: 25,
        ..small_settings(31)
    };
    run_search_parallel(g3(), settings, 4, Some(&mut history)).unwrap();
    let curve = history.fitness_curve();
    assert_eq!(curve.len(), 25);
    for w in curve.windows(2) {
        assert!(w[1] <= w[0], "best fitness rose from {} to {}", w[0], w[1]);
    }
}

#[test]
fn test_parallel_population_stays_in_bounds() {
    let settings = SearchSettings {
        num_bees: 13,
        bounds: GainBox::uniform(0.0, 4.0),
        ..small_settings(2)
    };
    let bounds = settings.bounds;
    let mut engine =
        ParallelColonySearch::new(g1(), settings, ParallelSettings::new(4).unwrap()).unwrap();
    engine.initialize();
    assert_eq!(engine.population().len(), 13);
    assert!(engine.population().all_within(&bounds));
    for _ in 0..8 {
        engine.employed_phase();
        assert!(engine.population().all_within(&bounds));
        engine.onlooker_phase();
        assert!(engine.population().all_within(&bounds));
        engine.scout_phase();
        assert!(engine.population().all_within(&bounds));
        engine.update_best();
    }
}

#[test]
fn test_parallel_trials_never_exceed_limit_after_scouts() {
    let settings = SearchSettings {
        limit: 1,
        ..small_settings(6)
    };
    let mut engine =
        ParallelColonySearch::new(g3(), settings, ParallelSettings::new(3).unwrap()).unwrap();
    for _ in 0..20 {
        engine.step();
        assert!(engine.population().iter().all(|b| b.trials <= 1));
    }
}

#[test]
fn test_parallel_initial_best_is_population_minimum() {
    let mut engine =
        ParallelColonySearch::new(g3(), small_settings(4), ParallelSettings::new(2).unwrap())
            .unwrap();
    engine.initialize();
    assert_eq!(engine.state(), SearchState::Initialized);
    let min = engine
        .population()
        .iter()
        .map(|b| b.fitness)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(engine.best().1, min);
    assert_eq!(engine.best_index().map(|i| engine.population()[i].fitness), Some(min));
}

#[test]
fn test_parallel_best_gains_reproduce_best_fitness() {
    let settings = small_settings(123);
    let (dt, sim_time) = (settings.dt, settings.sim_time);
    let result = run_search_parallel(g3(), settings, 4, None).unwrap();
    let replay = simulate(&result.best_gains, &g3(), dt, sim_time);
    assert_eq!(replay.mse, result.best_fitness);
}

#[test]
fn test_zero_workers_rejected() {
    assert!(matches!(
        run_search_parallel(g1(), small_settings(1), 0, None),
        Err(SearchError::Config(ConfigError::NoWorkers))
    ));
}

#[test]
fn test_parallel_rejects_bad_settings() {
    let settings = SearchSettings {
        num_bees: 0,
        ..small_settings(1)
    };
    assert!(matches!(
        run_search_parallel(g1(), settings, 2, None),
        Err(SearchError::Config(ConfigError::PopulationTooSmall(0)))
    ));
}
