//! Integration test: simulation driver against the built-in plants.
//!
//! Validates: lifecycle ordering enforced by the plants, fixed-step sample
//! times, closed-loop regulation of the averaged boost converter and plant
//! reuse rules.

use boost_common::error::TuneError;
use boost_common::params::{AntiWindup, ControlParameters, ControllerKind};
use boost_common::plant::{PlantConfig, PlantError};
use boost_common::simulation::{SignalNames, SimulationConfig};
use boost_plant::PlantRegistry;
use boost_tuner::control::Controller;
use boost_tuner::simulation::{simulate, simulate_handle};

fn dual_loop() -> Controller {
    let params: ControlParameters = [
        ("voltage_k", 0.3),
        ("voltage_Ti", 0.006),
        ("voltage_Td", 0.0),
        ("voltage_y_max", 20.0),
        ("voltage_y_min", 0.0),
        ("current_k", 0.02),
        ("current_Ti", 0.001),
        ("current_Td", 0.0),
        ("current_y_max", 0.95),
        ("current_y_min", 0.0),
    ]
    .into_iter()
    .collect();
    Controller::new(ControllerKind::DualLoopPid, &params, AntiWindup::Conditional).unwrap()
}

fn boost_simulation(simulation_time: f64) -> SimulationConfig {
    SimulationConfig {
        simulation_time,
        target_voltage: 160.0,
        initial_voltage: 80.0,
        step_size: 1e-4,
        start_time: 0.0,
        signals: SignalNames::default(),
    }
}

#[test]
fn dual_loop_regulates_boost_output() {
    let handle = PlantRegistry::with_builtin()
        .handle(PlantConfig::new("averaged_boost"))
        .unwrap();
    let trajectory = simulate_handle(&handle, &boost_simulation(0.1), &mut dual_loop()).unwrap();

    assert_eq!(trajectory.len(), 1000);
    let samples = trajectory.samples();
    assert_eq!(samples[0].time, 0.0);
    assert_eq!(samples[0].output, 80.0);
    assert!((samples[999].time - 0.0999).abs() < 1e-9);
    assert!(samples.iter().all(|s| s.output.is_finite() && s.secondary >= 0.0));
    assert!(samples.iter().all(|s| (0.0..=0.95).contains(&s.actuation)));

    let last = samples[999].output;
    assert!((last - 160.0).abs() < 0.02 * 160.0, "final voltage {last}");
}

#[test]
fn load_step_disturbs_then_recovers() {
    let config = PlantConfig::new("averaged_boost").with_parameter("load_step_time", 0.1);
    let handle = PlantRegistry::with_builtin().handle(config).unwrap();
    let trajectory = simulate_handle(&handle, &boost_simulation(0.2), &mut dual_loop()).unwrap();

    let samples = trajectory.samples();
    let before = samples[999].secondary;
    let after = samples[1999].secondary;
    // Halving the load resistance doubles the steady-state input current.
    assert!(after > 1.5 * before, "current {before} -> {after}");
}

#[test]
fn plant_instance_is_single_use() {
    let handle = PlantRegistry::with_builtin()
        .handle(PlantConfig::new("linear"))
        .unwrap();
    let mut plant = handle.open().unwrap();
    let config = SimulationConfig {
        simulation_time: 0.1,
        target_voltage: 1.0,
        initial_voltage: 0.0,
        step_size: 0.01,
        start_time: 0.0,
        signals: SignalNames::default(),
    };
    let params: ControlParameters =
        [("k", 1.0), ("Ti", 1.0), ("Td", 0.0), ("y_max", 10.0), ("y_min", -10.0)]
            .into_iter()
            .collect();
    let mut controller = Controller::new(ControllerKind::Pid, &params, AntiWindup::Off).unwrap();

    simulate(plant.as_mut(), &config, &mut controller).unwrap();
    controller.reset();
    let err = simulate(plant.as_mut(), &config, &mut controller).unwrap_err();
    assert!(matches!(err, TuneError::SimulationFault(PlantError::Sequence(_))));
}

#[test]
fn unknown_signal_is_simulation_fault() {
    let handle = PlantRegistry::with_builtin()
        .handle(PlantConfig::new("averaged_boost"))
        .unwrap();
    let mut config = boost_simulation(0.01);
    config.signals.secondary = "inductor.i".into();
    let err = simulate_handle(&handle, &config, &mut dual_loop()).unwrap_err();
    assert!(matches!(
        err,
        TuneError::SimulationFault(PlantError::UnknownSignal(name)) if name == "inductor.i"
    ));
}
