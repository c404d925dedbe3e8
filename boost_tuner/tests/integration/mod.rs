//! Shared fixtures for the integration tests.

mod config_loading;
mod end_to_end;
mod failure_policy;
mod optimizer_properties;
mod simulation_sequencing;

use boost_common::evaluation::EvaluatorConfig;
use boost_common::optimizer::IterationRecord;
use boost_common::params::{AntiWindup, ControllerConfig, ControllerKind};
use boost_common::plant::{PlantConfig, PlantError, PlantSimulator};
use boost_common::simulation::{SignalNames, SimulationConfig};
use boost_plant::PlantRegistry;
use boost_tuner::evaluation::Evaluator;
use boost_tuner::optimize::{Objective, Observer};

/// Single-loop objective over `k`, `Ti` on a first-order linear plant.
pub fn linear_objective() -> Objective {
    objective_on(&PlantRegistry::with_builtin(), "linear")
}

/// Single-loop objective on the static linear plant (`y = gain * u`).
pub fn static_objective() -> Objective {
    objective_for(
        &PlantRegistry::with_builtin(),
        PlantConfig::new("linear")
            .with_parameter("gain", 1.0)
            .with_parameter("time_constant", 0.0),
    )
}

/// Same single-loop objective against any plant model in `plants`.
pub fn objective_on(plants: &PlantRegistry, model: &str) -> Objective {
    objective_for(
        plants,
        PlantConfig::new(model).with_parameter("time_constant", 0.1),
    )
}

fn objective_for(plants: &PlantRegistry, config: PlantConfig) -> Objective {
    let plant = plants.handle(config).expect("model registered");
    let controller = ControllerConfig {
        kind: ControllerKind::Pid,
        anti_windup: AntiWindup::Off,
        parameters: [("Td", 0.0), ("y_max", 10.0), ("y_min", -10.0)]
            .into_iter()
            .collect(),
    };
    let simulation = SimulationConfig {
        simulation_time: 1.0,
        target_voltage: 1.0,
        initial_voltage: 0.0,
        step_size: 0.01,
        start_time: 0.0,
        signals: SignalNames::default(),
    };
    let evaluator = Evaluator::new(EvaluatorConfig::new(1.0)).expect("valid evaluator");
    Objective::new(
        plant,
        controller,
        vec!["k".into(), "Ti".into()],
        simulation,
        evaluator,
    )
    .expect("valid objective")
}

/// Observer that records everything and optionally stops after a number of
/// evaluations.
#[derive(Default)]
pub struct Recorder {
    pub evaluations: Vec<(Vec<f64>, f64)>,
    pub iterations: Vec<IterationRecord>,
    pub stop_after: Option<usize>,
}

impl Observer for Recorder {
    fn should_stop(&self) -> bool {
        self.stop_after
            .is_some_and(|n| self.evaluations.len() >= n)
    }

    fn on_evaluation(&mut self, position: &[f64], score: f64) {
        self.evaluations.push((position.to_vec(), score));
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        self.iterations.push(record.clone());
    }
}

/// Static plant (`y = u`, smoothed) that faults whenever the actuation
/// exceeds [`FRAGILE_LIMIT`].
pub struct FragilePlant {
    y: f64,
    u: f64,
}

pub const FRAGILE_LIMIT: f64 = 5.0;

impl PlantSimulator for FragilePlant {
    fn name(&self) -> &'static str {
        "fragile"
    }
    fn signals(&self) -> &'static [&'static str] {
        &boost_common::consts::DEFAULT_SIGNALS
    }
    fn setup(&mut self, _start_time: f64) -> Result<(), PlantError> {
        Ok(())
    }
    fn initialize(&mut self) -> Result<(), PlantError> {
        Ok(())
    }
    fn read(&mut self, _signal: &str) -> Result<f64, PlantError> {
        Ok(self.y)
    }
    fn write(&mut self, signal: &str, value: f64) -> Result<(), PlantError> {
        if signal == boost_common::consts::DEFAULT_OUTPUT_SIGNAL {
            self.y = value;
        } else {
            self.u = value;
        }
        Ok(())
    }
    fn step(&mut self, time: f64, dt: f64) -> Result<(), PlantError> {
        if self.u.abs() > FRAGILE_LIMIT {
            return Err(PlantError::Step {
                time,
                reason: format!("actuation {} over limit", self.u),
            });
        }
        self.y += (self.u - self.y) * dt / 0.1;
        Ok(())
    }
    fn terminate(&mut self) -> Result<(), PlantError> {
        Ok(())
    }
}

pub fn fragile_registry() -> PlantRegistry {
    fn create(_config: &PlantConfig) -> Result<Box<dyn PlantSimulator>, PlantError> {
        Ok(Box::new(FragilePlant { y: 0.0, u: 0.0 }))
    }
    let mut registry = PlantRegistry::new();
    registry.register("fragile", create);
    registry
}
