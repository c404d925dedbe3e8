//! Plant simulator interface.
//!
//! This module defines:
//! - `PlantSimulator` trait - Interface for pluggable plant simulators
//! - `PlantError` enum - Error types for plant operations
//! - `PlantConfig` struct - The `[plant]` section of a tuning job
//! - `PlantFactory` type alias - Factory function type
//! - `PlantHandle` struct - Opens fresh simulator instances on demand

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error types for plant operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlantError {
    /// Instantiation or `setup()` failed.
    #[error("plant setup failed: {0}")]
    Setup(String),

    /// `initialize()` failed.
    #[error("plant initialization failed: {0}")]
    Initialize(String),

    /// Reading a signal failed.
    #[error("failed to read '{signal}': {reason}")]
    Read { signal: String, reason: String },

    /// Writing a signal failed.
    #[error("failed to write '{signal}': {reason}")]
    Write { signal: String, reason: String },

    /// Advancing the simulation failed.
    #[error("step at t={time} failed: {reason}")]
    Step { time: f64, reason: String },

    /// `terminate()` failed.
    #[error("plant termination failed: {0}")]
    Terminate(String),

    /// The plant exposes no signal with this name.
    #[error("unknown signal: {0}")]
    UnknownSignal(String),

    /// A lifecycle method was called out of order.
    #[error("lifecycle violation: {0}")]
    Sequence(String),
}

/// Trait defining the interface for plant simulators.
///
/// The simulation driver manages plants through this trait, enabling
/// pluggable backends (in-process models, co-simulation units, etc.).
///
/// # Lifecycle
///
/// 1. `setup()` - Called once with the experiment start time
/// 2. `write()` of initial state, then `initialize()`
/// 3. `read()` / `write()` / `step()` - Called once per simulation step
/// 4. `terminate()` - Called exactly once, also after a failed step
///
/// Signal reads after `step(t, dt)` observe the state at `t + dt`.
pub trait PlantSimulator: Send {
    /// Returns the plant model identifier (e.g. "averaged_boost").
    fn name(&self) -> &'static str;

    /// Signal names accepted by `read()` and `write()`.
    fn signals(&self) -> &'static [&'static str];

    /// Prepare the experiment starting at `start_time`.
    fn setup(&mut self, start_time: f64) -> Result<(), PlantError>;

    /// Leave initialization mode. Values written before this call form the
    /// initial state.
    fn initialize(&mut self) -> Result<(), PlantError>;

    /// Read the current value of a named signal.
    fn read(&mut self, signal: &str) -> Result<f64, PlantError>;

    /// Set a named input (or, before `initialize()`, an initial state).
    fn write(&mut self, signal: &str, value: f64) -> Result<(), PlantError>;

    /// Advance the plant from `time` by `dt`.
    fn step(&mut self, time: f64, dt: f64) -> Result<(), PlantError>;

    /// Release the instance.
    fn terminate(&mut self) -> Result<(), PlantError>;
}

/// Plant section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [plant]
/// model = "averaged_boost"
///
/// [plant.parameters]
/// input_voltage = 80.0
/// load_step_time = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Registered plant model name.
    pub model: String,

    /// Model-specific numeric parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

impl PlantConfig {
    /// Config for `model` with no parameter overrides.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style parameter override.
    pub fn with_parameter(mut self, key: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Look up a parameter, falling back to `default`.
    ///
    /// # Errors
    /// Returns `PlantError::Setup` if the configured value is not finite.
    pub fn parameter_or(&self, key: &str, default: f64) -> Result<f64, PlantError> {
        match self.parameters.get(key) {
            Some(v) if v.is_finite() => Ok(*v),
            Some(_) => Err(PlantError::Setup(format!("parameter '{key}' is not finite"))),
            None => Ok(default),
        }
    }

    /// Reject any parameter key outside `known`.
    ///
    /// # Errors
    /// Returns `PlantError::Setup` naming the first unknown key.
    pub fn check_known(&self, known: &[&str]) -> Result<(), PlantError> {
        match self.parameters.keys().find(|k| !known.contains(&k.as_str())) {
            Some(k) => Err(PlantError::Setup(format!(
                "unknown parameter '{k}' for plant '{}'",
                self.model
            ))),
            None => Ok(()),
        }
    }
}

/// Factory function type for creating plant instances.
pub type PlantFactory = fn(&PlantConfig) -> Result<Box<dyn PlantSimulator>, PlantError>;

/// Opaque handle to a plant model.
///
/// Each call to [`PlantHandle::open`] creates an independent simulator
/// instance, so one handle serves every candidate evaluation of a run.
#[derive(Clone)]
pub struct PlantHandle {
    config: PlantConfig,
    factory: PlantFactory,
}

impl PlantHandle {
    /// Bind a plant configuration to the factory that builds it.
    pub fn new(config: PlantConfig, factory: PlantFactory) -> Self {
        Self { config, factory }
    }

    /// Registered model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Plant configuration this handle opens.
    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Instantiate a fresh simulator.
    pub fn open(&self) -> Result<Box<dyn PlantSimulator>, PlantError> {
        (self.factory)(&self.config)
    }
}

impl fmt::Debug for PlantHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantHandle")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
