//! Integration test: full tuning runs.
//!
//! Validates: objective assembly → optimizer run → the best candidate is
//! never worse than the caller's initial point, and the reported best
//! parameters reproduce the reported best score.

use boost_common::evaluation::EvaluatorConfig;
use boost_common::optimizer::{Bounds, OptimizerConfig};
use boost_common::params::{AntiWindup, ControllerConfig, ControllerKind};
use boost_common::plant::PlantConfig;
use boost_common::simulation::{SignalNames, SimulationConfig};
use boost_plant::PlantRegistry;
use boost_tuner::evaluation::Evaluator;
use boost_tuner::optimize::{NoopObserver, Objective, OptimizerRegistry};

use super::{Recorder, linear_objective, static_objective};

fn optimizer_config(algorithm: &str) -> OptimizerConfig {
    let mut config = OptimizerConfig {
        algorithm: algorithm.into(),
        seed: Some(2024),
        ..Default::default()
    };
    config.pso.swarm_size = 10;
    config.pso.max_iterations = 5;
    config.ga.population_size = 10;
    config.ga.max_generations = 5;
    config
}

#[test]
fn pso_improves_on_initial_point() {
    let objective = linear_objective();
    let bounds = Bounds::new(vec![(0.1, 10.0), (0.01, 10.0)]);
    let initial = [0.5, 5.0];
    let initial_score = objective.evaluate(&initial).unwrap().score;

    let mut pso = OptimizerRegistry::with_builtin()
        .create(&optimizer_config("pso"))
        .unwrap();
    let result = pso
        .optimize(&objective, &bounds, &initial, &mut NoopObserver)
        .unwrap();

    assert_eq!(result.algorithm, "pso");
    assert!(result.best_score <= initial_score);
    assert_eq!(result.history.len(), 5);
    assert_eq!(result.evaluations, 10 * 6);
    assert!(bounds.contains(&result.best_position));

    // best_parameters is the full controller set at best_position.
    assert_eq!(result.best_parameters.len(), 5);
    assert_eq!(result.best_parameters.get("k"), Some(result.best_position[0]));
    assert_eq!(result.best_parameters.get("Ti"), Some(result.best_position[1]));
    let rescored = objective.evaluate(&result.best_position).unwrap();
    assert_eq!(rescored.score, result.best_score);
    assert_eq!(result.best_diagnostics.as_ref(), Some(&rescored));
}

#[test]
fn pso_on_static_plant_with_bounds_touching_zero() {
    // Clamped particles can land on Ti = 0; those candidates are penalized
    // and the run still completes.
    let objective = static_objective();
    let bounds = Bounds::new(vec![(0.0, 10.0), (0.0, 10.0)]);
    let initial = [0.5, 0.5];
    let initial_score = objective.evaluate(&initial).unwrap().score;
    assert!(initial_score.is_finite());

    let mut pso = OptimizerRegistry::with_builtin()
        .create(&optimizer_config("pso"))
        .unwrap();
    let mut recorder = Recorder::default();
    let result = pso
        .optimize(&objective, &bounds, &initial, &mut recorder)
        .unwrap();

    assert!(result.best_score <= initial_score);
    assert_eq!(result.history.len(), 5);
    assert_eq!(result.evaluations, 10 * 6);
    assert_eq!(recorder.evaluations[9], (initial.to_vec(), initial_score));
    assert!(recorder.evaluations.iter().all(|(x, _)| bounds.contains(x)));
    assert!(result.best_score.is_finite());
}

#[test]
fn ga_improves_on_initial_point() {
    let objective = linear_objective();
    let bounds = Bounds::new(vec![(0.1, 10.0), (0.01, 10.0)]);
    let initial = [0.5, 5.0];
    let initial_score = objective.evaluate(&initial).unwrap().score;

    let mut ga = OptimizerRegistry::with_builtin()
        .create(&optimizer_config("ga"))
        .unwrap();
    let mut recorder = Recorder::default();
    let result = ga
        .optimize(&objective, &bounds, &initial, &mut recorder)
        .unwrap();

    assert_eq!(result.algorithm, "ga");
    assert!(result.best_score <= initial_score);
    assert_eq!(result.evaluations, 10 * 5);
    assert_eq!(recorder.evaluations.len(), 50);
    assert_eq!(recorder.iterations, result.history);
    let iterations: Vec<usize> = result.history.iter().map(|r| r.iteration).collect();
    assert_eq!(iterations, [1, 2, 3, 4, 5]);
}

#[test]
fn dual_loop_boost_short_run() {
    let plant = PlantRegistry::with_builtin()
        .handle(PlantConfig::new("averaged_boost"))
        .unwrap();
    let controller = ControllerConfig {
        kind: ControllerKind::DualLoopPid,
        anti_windup: AntiWindup::Conditional,
        parameters: [
            ("voltage_Td", 0.0),
            ("voltage_y_max", 20.0),
            ("voltage_y_min", 0.0),
            ("current_Td", 0.0),
            ("current_y_max", 0.95),
            ("current_y_min", 0.0),
        ]
        .into_iter()
        .collect(),
    };
    let simulation = SimulationConfig {
        simulation_time: 0.1,
        target_voltage: 160.0,
        initial_voltage: 80.0,
        step_size: 1e-4,
        start_time: 0.0,
        signals: SignalNames::default(),
    };
    let evaluator = Evaluator::new(EvaluatorConfig::new(160.0)).unwrap();
    let tuned = ["voltage_k", "voltage_Ti", "current_k", "current_Ti"]
        .map(String::from)
        .to_vec();
    let objective = Objective::new(plant, controller, tuned, simulation, evaluator).unwrap();

    let bounds = Bounds::new(vec![(0.01, 1.0), (0.001, 0.1), (0.001, 0.1), (0.0001, 0.01)]);
    let initial = [0.3, 0.006, 0.02, 0.001];
    let initial_score = objective.evaluate(&initial).unwrap().score;
    assert!(initial_score.is_finite());

    let mut config = optimizer_config("pso");
    config.pso.swarm_size = 4;
    config.pso.max_iterations = 2;
    let mut pso = OptimizerRegistry::with_builtin().create(&config).unwrap();
    let result = pso
        .optimize(&objective, &bounds, &initial, &mut NoopObserver)
        .unwrap();

    assert!(result.best_score <= initial_score);
    assert_eq!(result.best_parameters.len(), 10);
    assert_eq!(result.best_parameters.get("current_y_max"), Some(0.95));
}
