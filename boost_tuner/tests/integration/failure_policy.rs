//! Integration test: per-candidate failures and cancellation.
//!
//! A plant that faults on large actuation makes some candidates fail.
//! `penalize` keeps searching, `abort` returns the fault, and an observer
//! stop request ends the run with `Cancelled`.

use boost_common::consts::PENALTY_SCORE;
use boost_common::error::TuneError;
use boost_common::optimizer::{Bounds, FailurePolicy, OptimizerConfig};
use boost_common::plant::PlantError;
use boost_tuner::optimize::{OptimizerRegistry, StopFlag};

use super::{Recorder, fragile_registry, objective_on};

fn config(algorithm: &str, failure_policy: FailurePolicy) -> OptimizerConfig {
    let mut config = OptimizerConfig {
        algorithm: algorithm.into(),
        seed: Some(5),
        failure_policy,
        ..Default::default()
    };
    config.pso.swarm_size = 6;
    config.pso.max_iterations = 3;
    config.ga.population_size = 6;
    config.ga.max_generations = 3;
    config
}

// k = 9 drives the first actuation to ~9.09, over the plant's limit.
const FAILING_INITIAL: [f64; 2] = [9.0, 1.0];

fn bounds() -> Bounds {
    Bounds::new(vec![(0.1, 10.0), (0.01, 10.0)])
}

#[test]
fn penalize_scores_failures_and_continues() {
    let objective = objective_on(&fragile_registry(), "fragile");
    for algorithm in ["pso", "ga"] {
        let mut optimizer = OptimizerRegistry::with_builtin()
            .create(&config(algorithm, FailurePolicy::Penalize))
            .unwrap();
        let mut recorder = Recorder::default();
        let result = optimizer
            .optimize(&objective, &bounds(), &FAILING_INITIAL, &mut recorder)
            .unwrap();

        // The initial point is the last member of the first population.
        let (position, score) = &recorder.evaluations[5];
        assert_eq!(position.as_slice(), FAILING_INITIAL);
        assert_eq!(*score, PENALTY_SCORE);

        assert_eq!(result.evaluations, recorder.evaluations.len());
        if result.best_score < PENALTY_SCORE {
            assert!(result.best_diagnostics.is_some());
        } else {
            assert!(result.best_diagnostics.is_none());
        }
    }
}

#[test]
fn abort_propagates_the_fault() {
    let objective = objective_on(&fragile_registry(), "fragile");
    for algorithm in ["pso", "ga"] {
        let mut optimizer = OptimizerRegistry::with_builtin()
            .create(&config(algorithm, FailurePolicy::Abort))
            .unwrap();
        let err = optimizer
            .optimize(&objective, &bounds(), &FAILING_INITIAL, &mut Recorder::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TuneError::SimulationFault(PlantError::Step { .. })
        ));
    }
}

#[test]
fn observer_stop_cancels_without_result() {
    let objective = objective_on(&fragile_registry(), "fragile");
    let mut optimizer = OptimizerRegistry::with_builtin()
        .create(&config("pso", FailurePolicy::Penalize))
        .unwrap();
    let mut recorder = Recorder {
        stop_after: Some(8),
        ..Default::default()
    };
    let err = optimizer
        .optimize(&objective, &bounds(), &[1.0, 1.0], &mut recorder)
        .unwrap_err();
    assert_eq!(err, TuneError::Cancelled);
    assert_eq!(recorder.evaluations.len(), 8);
}

#[test]
fn stop_flag_cancels_before_first_evaluation() {
    let objective = objective_on(&fragile_registry(), "fragile");
    let stop = StopFlag::new();
    stop.cancel();
    let mut observer = boost_tuner::optimize::ProgressLogger::new(stop);
    let mut optimizer = OptimizerRegistry::with_builtin()
        .create(&config("ga", FailurePolicy::Penalize))
        .unwrap();
    let err = optimizer
        .optimize(&objective, &bounds(), &[1.0, 1.0], &mut observer)
        .unwrap_err();
    assert_eq!(err, TuneError::Cancelled);
}

#[test]
fn invalid_problem_evaluates_nothing() {
    let objective = objective_on(&fragile_registry(), "fragile");
    let mut optimizer = OptimizerRegistry::with_builtin()
        .create(&config("pso", FailurePolicy::Penalize))
        .unwrap();
    let mut recorder = Recorder::default();

    // Initial point outside the bounds.
    let err = optimizer
        .optimize(&objective, &bounds(), &[20.0, 1.0], &mut recorder)
        .unwrap_err();
    assert!(matches!(err, TuneError::Config(_)));

    // Bounds dimension does not match the tuned keys.
    let err = optimizer
        .optimize(
            &objective,
            &Bounds::new(vec![(0.0, 1.0)]),
            &[0.5],
            &mut recorder,
        )
        .unwrap_err();
    assert!(matches!(err, TuneError::Config(_)));
    assert!(recorder.evaluations.is_empty());
}
