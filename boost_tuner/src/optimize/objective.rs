//! The tuning objective: parameter vector → score.
//!
//! Bundles everything one candidate evaluation needs: the plant handle,
//! the controller selection and base parameters, the tuned keys, the
//! simulation configuration and the evaluator. Every call builds a fresh
//! controller and opens a fresh plant instance.

use crate::control::Controller;
use crate::evaluation::Evaluator;
use crate::simulation::{check_plant_signals, check_signals, simulate_handle};
use boost_common::config::ConfigError;
use boost_common::error::TuneError;
use boost_common::evaluation::EvaluationMetrics;
use boost_common::params::{ControlParameters, ControllerConfig};
use boost_common::plant::PlantHandle;
use boost_common::simulation::{SimulationConfig, SimulationTrajectory};
use serde::Serialize;
use tracing::debug;

/// Black-box objective over the tuned parameter keys.
#[derive(Debug, Clone)]
pub struct Objective {
    plant: PlantHandle,
    controller: ControllerConfig,
    tuned: Vec<String>,
    simulation: SimulationConfig,
    evaluator: Evaluator,
}

impl Objective {
    /// Assemble and cross-check an objective.
    ///
    /// # Errors
    /// - `ConfigError::MissingParameter` if a controller key is neither in
    ///   the base parameters nor tuned
    /// - `ConfigError::UnexpectedParameter` for a base or tuned key the
    ///   controller does not accept
    /// - `ConfigError::ValidationError` for an invalid simulation config, a
    ///   signal name the plant does not expose, a plant that fails to
    ///   instantiate, or an empty or repeated tuned key list
    pub fn new(
        plant: PlantHandle,
        controller: ControllerConfig,
        tuned: Vec<String>,
        simulation: SimulationConfig,
        evaluator: Evaluator,
    ) -> Result<Self, ConfigError> {
        simulation.validate()?;
        check_signals(&simulation)?;
        check_plant_signals(&plant, &simulation)?;

        if tuned.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one parameter must be tuned".to_string(),
            ));
        }
        let required = controller.kind.required_keys();
        for (i, key) in tuned.iter().enumerate() {
            if !required.contains(key) {
                return Err(ConfigError::UnexpectedParameter(key.clone()));
            }
            if tuned[..i].contains(key) {
                return Err(ConfigError::ValidationError(format!(
                    "tuned parameter '{key}' listed twice"
                )));
            }
        }
        if let Some(missing) = required
            .iter()
            .find(|k| !controller.parameters.contains(k.as_str()) && !tuned.contains(*k))
        {
            return Err(ConfigError::MissingParameter(missing.clone()));
        }
        if let Some((extra, _)) = controller
            .parameters
            .iter()
            .find(|(k, _)| !required.iter().any(|r| r.as_str() == *k))
        {
            return Err(ConfigError::UnexpectedParameter(extra.to_string()));
        }

        Ok(Self {
            plant,
            controller,
            tuned,
            simulation,
            evaluator,
        })
    }

    /// Number of tuned dimensions.
    pub fn dims(&self) -> usize {
        self.tuned.len()
    }

    /// Tuned keys, one per dimension.
    pub fn tuned_keys(&self) -> &[String] {
        &self.tuned
    }

    pub fn plant(&self) -> &PlantHandle {
        &self.plant
    }

    /// Base parameters with `position` overlaid on the tuned keys.
    pub fn parameters_at(&self, position: &[f64]) -> ControlParameters {
        let mut params = self.controller.parameters.clone();
        for (key, value) in self.tuned.iter().zip(position) {
            params.set(key.clone(), *value);
        }
        params
    }

    /// Simulate and score one candidate.
    ///
    /// # Errors
    /// `TuneError::SimulationFault` or `TuneError::NumericDegenerate` for a
    /// failing candidate. `TuneError::Config` if `position` has the wrong
    /// dimension.
    pub fn evaluate(&self, position: &[f64]) -> Result<EvaluationMetrics, TuneError> {
        let (_, trajectory) = self.simulate_at(position)?;
        let metrics = self.evaluator.evaluate(&trajectory);
        debug!(?position, score = metrics.score, "candidate evaluated");
        Ok(metrics)
    }

    /// Single run at `position`, keeping the trajectory and reporting the
    /// steady-state error as well.
    pub fn run(&self, position: &[f64]) -> Result<SimulationRun, TuneError> {
        let (parameters, trajectory) = self.simulate_at(position)?;
        let metrics = self.evaluator.evaluate_run(&trajectory);
        Ok(SimulationRun {
            parameters,
            metrics,
            trajectory,
        })
    }

    fn simulate_at(
        &self,
        position: &[f64],
    ) -> Result<(ControlParameters, SimulationTrajectory), TuneError> {
        if position.len() != self.dims() {
            return Err(ConfigError::ValidationError(format!(
                "position has {} values for {} tuned parameters",
                position.len(),
                self.dims()
            ))
            .into());
        }
        let params = self.parameters_at(position);
        let mut controller =
            Controller::new(self.controller.kind, &params, self.controller.anti_windup)?;
        let trajectory = simulate_handle(&self.plant, &self.simulation, &mut controller)?;
        Ok((params, trajectory))
    }
}

/// Outcome of [`Objective::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub parameters: ControlParameters,
    pub metrics: EvaluationMetrics,
    pub trajectory: SimulationTrajectory,
}
