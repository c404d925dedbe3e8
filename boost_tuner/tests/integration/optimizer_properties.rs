//! Integration test: optimizer contract properties.
//!
//! For arbitrary seeds and small budgets, both algorithms must:
//! - report a non-increasing best score history, one record per sweep
//! - evaluate only positions inside the bounds
//! - evaluate the initial point in the first sweep
//! - return `best_score` equal to the minimum score ever observed
//! - reproduce the same result for the same seed

use boost_common::config::ConfigError;
use boost_common::optimizer::{Bounds, GlobalBestUpdate, OptimizerConfig};
use boost_tuner::optimize::{NoopObserver, OptimizerRegistry};
use proptest::prelude::*;

use super::{Recorder, linear_objective};

fn bounds() -> Bounds {
    Bounds::new(vec![(0.1, 10.0), (0.01, 10.0)])
}

fn config(algorithm: &str, seed: u64, size: usize, iterations: usize) -> OptimizerConfig {
    let mut config = OptimizerConfig {
        algorithm: algorithm.into(),
        seed: Some(seed),
        ..Default::default()
    };
    config.pso.swarm_size = size;
    config.pso.max_iterations = iterations;
    config.ga.population_size = size;
    config.ga.max_generations = iterations;
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn run_invariants(
        seed in any::<u64>(),
        size in 2usize..6,
        iterations in 1usize..4,
        initial_k in 0.1f64..10.0,
        initial_ti in 0.01f64..10.0,
        use_ga in any::<bool>(),
        generational in any::<bool>(),
    ) {
        let algorithm = if use_ga { "ga" } else { "pso" };
        let mut cfg = config(algorithm, seed, size, iterations);
        if generational {
            cfg.pso.global_best_update = GlobalBestUpdate::Generational;
        }
        let objective = linear_objective();
        let initial = [initial_k, initial_ti];

        let mut optimizer = OptimizerRegistry::with_builtin().create(&cfg).unwrap();
        let mut recorder = Recorder::default();
        let result = optimizer
            .optimize(&objective, &bounds(), &initial, &mut recorder)
            .unwrap();

        // One record per sweep, numbered from 1, never getting worse.
        prop_assert_eq!(result.history.len(), iterations);
        for (i, record) in result.history.iter().enumerate() {
            prop_assert_eq!(record.iteration, i + 1);
        }
        for pair in result.history.windows(2) {
            prop_assert!(pair[1].best_score <= pair[0].best_score);
        }

        // Everything evaluated lies inside the bounds.
        for (position, _) in &recorder.evaluations {
            prop_assert!(bounds().contains(position));
        }

        // The initial point closes the first sweep.
        prop_assert_eq!(recorder.evaluations[size - 1].0.as_slice(), initial.as_slice());

        // The best is the minimum over everything observed.
        let observed_min = recorder
            .evaluations
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::INFINITY, f64::min);
        prop_assert_eq!(result.best_score, observed_min);
        prop_assert_eq!(result.evaluations, recorder.evaluations.len());
        if let Some(last) = result.history.last() {
            prop_assert_eq!(last.best_score, result.best_score);
        }
    }

    #[test]
    fn same_seed_same_result(seed in any::<u64>(), use_ga in any::<bool>()) {
        let algorithm = if use_ga { "ga" } else { "pso" };
        let cfg = config(algorithm, seed, 4, 2);
        let objective = linear_objective();
        let registry = OptimizerRegistry::with_builtin();

        let first = registry
            .create(&cfg)
            .unwrap()
            .optimize(&objective, &bounds(), &[1.0, 1.0], &mut NoopObserver)
            .unwrap();
        let second = registry
            .create(&cfg)
            .unwrap()
            .optimize(&objective, &bounds(), &[1.0, 1.0], &mut NoopObserver)
            .unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn unknown_algorithm_is_config_error() {
    let cfg = OptimizerConfig {
        algorithm: "annealing".into(),
        ..Default::default()
    };
    let err = OptimizerRegistry::with_builtin().create(&cfg).err().unwrap();
    assert_eq!(err, ConfigError::UnknownAlgorithm("annealing".into()));
}

#[test]
fn zero_iterations_returns_best_of_initial_swarm() {
    let objective = linear_objective();
    let mut optimizer = OptimizerRegistry::with_builtin()
        .create(&config("pso", 3, 5, 0))
        .unwrap();
    let mut recorder = Recorder::default();
    let result = optimizer
        .optimize(&objective, &bounds(), &[1.0, 1.0], &mut recorder)
        .unwrap();
    assert!(result.history.is_empty());
    assert_eq!(result.evaluations, 5);
    let min = recorder
        .evaluations
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.best_score, min);
}
