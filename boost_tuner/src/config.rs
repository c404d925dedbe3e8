//! Tuning job configuration.
//!
//! A job is one TOML document bundling every section the tuner needs:
//!
//! ```toml
//! [shared]
//! service_name = "boost-160v"
//!
//! [plant]
//! model = "averaged_boost"
//!
//! [controller]
//! type = "DualLoopPID"
//! [controller.parameters]
//! voltage_Td = 0.0
//! # ...
//!
//! [simulation]
//! simulation_time = 1.0
//! target_voltage = 160.0
//! initial_voltage = 80.0
//! step_size = 0.0001
//!
//! [evaluation]
//! target_voltage = 160.0
//!
//! [optimizer]
//! algorithm = "pso"
//!
//! [search]
//! bounds = [[0.0, 1.0], [0.0001, 0.1], [0.0, 1.0], [0.0001, 0.1]]
//! initial = [0.05, 0.01, 0.02, 0.001]
//! ```
//!
//! Section-local checks run at load time. Cross-section checks that need the
//! plant registry run in [`TuningJob::objective`].

use crate::evaluation::Evaluator;
use crate::optimize::Objective;
use crate::simulation::check_signals;
use boost_common::config::{ConfigError, ConfigLoader, SharedConfig};
use boost_common::evaluation::EvaluatorConfig;
use boost_common::optimizer::{OptimizerConfig, SearchSpace};
use boost_common::params::ControllerConfig;
use boost_common::plant::PlantConfig;
use boost_common::simulation::SimulationConfig;
use boost_plant::PlantRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A complete tuning job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningJob {
    pub shared: SharedConfig,
    pub plant: PlantConfig,
    pub controller: ControllerConfig,
    pub simulation: SimulationConfig,
    pub evaluation: EvaluatorConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    pub search: SearchSpace,
}

impl TuningJob {
    /// Section-local validation, plus agreement of the simulation and
    /// evaluation targets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.simulation.validate()?;
        check_signals(&self.simulation)?;
        self.evaluation.validate()?;
        self.search.validate()?;
        if self.simulation.target_voltage != self.evaluation.target_voltage {
            return Err(ConfigError::ValidationError(format!(
                "simulation.target_voltage ({}) differs from evaluation.target_voltage ({})",
                self.simulation.target_voltage, self.evaluation.target_voltage
            )));
        }
        Ok(())
    }

    /// Bind the plant and assemble the objective over `search.parameters`.
    ///
    /// # Errors
    /// `ConfigError::UnknownPlant` for an unregistered model, and every
    /// key-set error of [`Objective::new`].
    pub fn objective(&self, plants: &PlantRegistry) -> Result<Objective, ConfigError> {
        let plant = plants.handle(self.plant.clone())?;
        let evaluator = Evaluator::new(self.evaluation.clone())?;
        let objective = Objective::new(
            plant,
            self.controller.clone(),
            self.search.parameters.clone(),
            self.simulation.clone(),
            evaluator,
        )?;
        debug!(
            plant = %self.plant.model,
            controller = %self.controller.kind,
            tuned = ?self.search.parameters,
            "objective assembled"
        );
        Ok(objective)
    }
}

/// Load and validate a tuning job from a TOML file.
pub fn load_job(path: &Path) -> Result<TuningJob, ConfigError> {
    info!("Loading tuning job from {}", path.display());
    let job = TuningJob::load(path)?;
    job.validate()?;
    Ok(job)
}

/// Parse and validate a tuning job from TOML text.
pub fn load_job_from_str(content: &str) -> Result<TuningJob, ConfigError> {
    let job = TuningJob::from_toml_str(content)?;
    job.validate()?;
    Ok(job)
}
