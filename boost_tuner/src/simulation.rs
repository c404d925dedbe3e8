//! Closed-loop simulation driver.
//!
//! Drives a black-box [`PlantSimulator`] step by step:
//!
//! ```text
//! setup(start) → write(output, initial) → initialize()
//!   ┌─► read(output), read(secondary)
//!   │   controller.update()
//!   │   write(actuation)
//!   │   step(t, dt)
//!   └── record (t, output, secondary, actuation)
//! terminate()   (exactly once, also on failure)
//! ```
//!
//! When the run fails, its error is returned and a failing `terminate()` is
//! only logged. When the run succeeds, a failing `terminate()` is returned.

use crate::control::{Controller, LoopInput};
use boost_common::config::ConfigError;
use boost_common::error::TuneError;
use boost_common::plant::{PlantHandle, PlantSimulator};
use boost_common::simulation::{Sample, SimulationConfig, SimulationTrajectory};
use tracing::{debug, trace, warn};

/// Run one closed-loop simulation on an already opened plant.
///
/// The plant is exclusively borrowed for the whole run and is terminated
/// before returning. The controller is used as passed; call
/// [`Controller::reset`] first to reuse one across runs.
///
/// # Errors
/// - `TuneError::Config` if `config` fails validation (plant untouched)
/// - `TuneError::SimulationFault` for any plant failure
/// - `TuneError::NumericDegenerate` if the controller degenerates
pub fn simulate(
    plant: &mut dyn PlantSimulator,
    config: &SimulationConfig,
    controller: &mut Controller,
) -> Result<SimulationTrajectory, TuneError> {
    config.validate()?;

    let steps = config.step_count();
    debug!(
        plant = plant.name(),
        controller = %controller.kind(),
        steps,
        step_size = config.step_size,
        "simulation start"
    );

    let outcome = run_steps(plant, config, controller, steps);
    let terminated = plant.terminate();

    match (outcome, terminated) {
        (Ok(trajectory), Ok(())) => Ok(trajectory),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(term)) => {
            warn!(error = %term, "plant terminate failed after simulation error");
            Err(e)
        }
    }
}

/// Open a fresh plant from `handle` and run [`simulate`] on it.
pub fn simulate_handle(
    handle: &PlantHandle,
    config: &SimulationConfig,
    controller: &mut Controller,
) -> Result<SimulationTrajectory, TuneError> {
    let mut plant = handle.open()?;
    simulate(plant.as_mut(), config, controller)
}

fn run_steps(
    plant: &mut dyn PlantSimulator,
    config: &SimulationConfig,
    controller: &mut Controller,
    steps: usize,
) -> Result<SimulationTrajectory, TuneError> {
    let signals = &config.signals;
    let dt = config.step_size;

    plant.setup(config.start_time)?;
    plant.write(&signals.output, config.initial_voltage)?;
    plant.initialize()?;

    let mut trajectory = SimulationTrajectory::with_capacity(dt, steps);
    for i in 0..steps {
        let time = config.start_time + i as f64 * dt;
        let output = plant.read(&signals.output)?;
        let secondary = plant.read(&signals.secondary)?;
        let actuation = controller.update(LoopInput {
            target: config.target_voltage,
            output,
            secondary,
            dt,
        })?;
        plant.write(&signals.actuation, actuation)?;
        plant.step(time, dt)?;
        trace!(time, output, secondary, actuation, "step");
        trajectory.push(Sample {
            time,
            output,
            secondary,
            actuation,
        });
    }
    Ok(trajectory)
}

/// Reject an actuation signal that is also one of the sensed signals.
pub fn check_signals(config: &SimulationConfig) -> Result<(), ConfigError> {
    let s = &config.signals;
    if s.actuation == s.output || s.actuation == s.secondary {
        return Err(ConfigError::ValidationError(format!(
            "simulation.signals.actuation '{}' collides with a sensed signal",
            s.actuation
        )));
    }
    Ok(())
}

/// Reject signal names the plant behind `handle` does not expose.
///
/// Opens one instance to query [`PlantSimulator::signals`]; the instance
/// is dropped without being set up.
///
/// # Errors
/// `ConfigError::ValidationError` if the plant cannot be instantiated or
/// a configured signal is unknown to it.
pub fn check_plant_signals(
    handle: &PlantHandle,
    config: &SimulationConfig,
) -> Result<(), ConfigError> {
    let plant = handle.open().map_err(|e| {
        ConfigError::ValidationError(format!("plant '{}': {e}", handle.model()))
    })?;
    let exposed = plant.signals();
    let s = &config.signals;
    for (role, name) in [
        ("output", &s.output),
        ("secondary", &s.secondary),
        ("actuation", &s.actuation),
    ] {
        if !exposed.contains(&name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.signals.{role} '{name}' is not a signal of plant '{}' (known: {})",
                handle.model(),
                exposed.join(", ")
            )));
        }
    }
    Ok(())
}
