//! Longer runs on the three reference plants.

use pid_colony::{
    run_search, run_search_parallel, GainBox, PlantModel, ProgressHistory, SearchSettings,
};

fn plants() -> Vec<PlantModel> {
    vec![
        PlantModel::new(vec![1.0], vec![1.0, 1.0]).unwrap(),
        PlantModel::new(vec![5.0], vec![1.0, 2.0, 5.0]).unwrap(),
        PlantModel::new(vec![10.0], vec![1.0, 3.0, 12.0, 10.0]).unwrap(),
    ]
}

fn settings(seed: u64) -> SearchSettings {
    SearchSettings {
        num_bees: 20,
        max_iterations: 30,
        limit: 5,
        bounds: GainBox::uniform(-10.0, 10.0),
        dt: 0.01,
        sim_time: 5.0,
        seed: Some(seed),
    }
}

#[test]
fn test_serial_improves_on_open_loop_for_every_plant() {
    for plant in plants() {
        let mut history = ProgressHistory::new();
        let result = run_search(plant.clone(), settings(12345), Some(&mut history)).unwrap();
        assert!(
            result.best_fitness < 1.0,
            "order {} plant: best MSE {} no better than doing nothing",
            plant.order(),
            result.best_fitness
        );
        assert_eq!(history.rows.len(), 30);
        assert_eq!(history.rows.last().map(|r| r.best_fitness), Some(result.best_fitness));
    }
}

#[test]
fn test_parallel_improves_on_open_loop_for_every_plant() {
    for plant in plants() {
        let result = run_search_parallel(plant.clone(), settings(12345), 4, None).unwrap();
        assert!(
            result.best_fitness < 1.0,
            "order {} plant: best MSE {}",
            plant.order(),
            result.best_fitness
        );
    }
}

#[test]
fn test_default_settings_drive_a_short_run() {
    let settings = SearchSettings {
        max_iterations: 2,
        num_bees: 4,
        sim_time: 1.0,
        seed: Some(1),
        ..SearchSettings::default()
    };
    let result = run_search(plants().remove(0), settings, None).unwrap();
    assert_eq!(result.iterations, 2);
}
