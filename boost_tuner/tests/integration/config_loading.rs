//! Integration test: shipped tuning jobs.
//!
//! Validates: every job under `config/` loads, passes validation and binds
//! to the built-in plant registry; a single run of the linear job matches
//! its objective score.

use std::path::PathBuf;

use boost_common::params::ControllerKind;
use boost_plant::PlantRegistry;
use boost_tuner::config::load_job;
use boost_tuner::optimize::OptimizerRegistry;

fn job_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join(name)
}

#[test]
fn dual_loop_job_binds() {
    let job = load_job(&job_path("dual_loop_boost.toml")).unwrap();
    assert_eq!(job.controller.kind, ControllerKind::DualLoopPid);
    assert_eq!(job.search.parameters.len(), 4);

    let objective = job.objective(&PlantRegistry::with_builtin()).unwrap();
    assert_eq!(objective.dims(), 4);
    assert_eq!(objective.plant().model(), "averaged_boost");

    // Both algorithm sections are valid, whichever one is selected.
    let registry = OptimizerRegistry::with_builtin();
    for algorithm in registry.list_algorithms() {
        let mut config = job.optimizer.clone();
        config.algorithm = algorithm.to_string();
        assert_eq!(registry.create(&config).unwrap().name(), algorithm);
    }
}

#[test]
fn linear_job_single_run() {
    let job = load_job(&job_path("linear_pid.toml")).unwrap();
    let objective = job.objective(&PlantRegistry::with_builtin()).unwrap();

    let run = objective.run(&job.search.initial).unwrap();
    assert_eq!(run.trajectory.len(), 100);
    assert_eq!(run.parameters.get("k"), Some(1.0));
    assert!(run.metrics.steady_state_error.is_some());

    let score = objective.evaluate(&job.search.initial).unwrap().score;
    assert_eq!(run.metrics.score, score);
}

#[test]
fn result_serializes_to_json() {
    let job = load_job(&job_path("linear_pid.toml")).unwrap();
    let objective = job.objective(&PlantRegistry::with_builtin()).unwrap();
    let mut config = job.optimizer.clone();
    config.pso.max_iterations = 2;
    config.pso.swarm_size = 3;
    let result = OptimizerRegistry::with_builtin()
        .create(&config)
        .unwrap()
        .optimize(
            &objective,
            &job.search.bounds,
            &job.search.initial,
            &mut boost_tuner::optimize::NoopObserver,
        )
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["algorithm"], "pso");
    assert_eq!(json["history"].as_array().map(Vec::len), Some(2));
    assert!(json["best_parameters"]["Ti"].is_f64());
    assert!(json["best_diagnostics"]["pre_event"]["overshoot"].is_f64());
}
