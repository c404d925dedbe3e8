//! Simulation configuration and trajectory types.

use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_ACTUATION_SIGNAL, DEFAULT_OUTPUT_SIGNAL, DEFAULT_SECONDARY_SIGNAL, DEFAULT_START_TIME,
    MAX_STEP_COUNT, STEP_COUNT_EPSILON,
};
use serde::{Deserialize, Serialize};

fn default_start_time() -> f64 {
    DEFAULT_START_TIME
}

fn default_output_signal() -> String {
    DEFAULT_OUTPUT_SIGNAL.to_string()
}

fn default_secondary_signal() -> String {
    DEFAULT_SECONDARY_SIGNAL.to_string()
}

fn default_actuation_signal() -> String {
    DEFAULT_ACTUATION_SIGNAL.to_string()
}

/// Plant signal names the driver reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalNames {
    /// Primary sensed output (voltage).
    #[serde(default = "default_output_signal")]
    pub output: String,
    /// Secondary sensed quantity (inductor current).
    #[serde(default = "default_secondary_signal")]
    pub secondary: String,
    /// Actuation input (duty cycle).
    #[serde(default = "default_actuation_signal")]
    pub actuation: String,
}

impl Default for SignalNames {
    fn default() -> Self {
        Self {
            output: default_output_signal(),
            secondary: default_secondary_signal(),
            actuation: default_actuation_signal(),
        }
    }
}

/// The `[simulation]` section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [simulation]
/// simulation_time = 1.0
/// step_size = 0.0001
/// target_voltage = 160.0
/// initial_voltage = 80.0
///
/// [simulation.signals]
/// output = "voltageSensor.v"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total simulated duration [s].
    pub simulation_time: f64,
    /// Reference for the controller.
    pub target_voltage: f64,
    /// Initial value written to the output signal before `initialize()`.
    pub initial_voltage: f64,
    /// Fixed integration step [s].
    pub step_size: f64,
    /// Experiment start time [s].
    #[serde(default = "default_start_time")]
    pub start_time: f64,
    /// Signal name overrides.
    #[serde(default)]
    pub signals: SignalNames,
}

impl SimulationConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` unless all values are finite,
    /// `target_voltage > 0`, `step_size > 0`, `step_size <= simulation_time`
    /// and the step count stays within [`MAX_STEP_COUNT`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("simulation_time", self.simulation_time),
            ("target_voltage", self.target_voltage),
            ("initial_voltage", self.initial_voltage),
            ("step_size", self.step_size),
            ("start_time", self.start_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "simulation.{name} must be finite"
                )));
            }
        }
        if self.target_voltage <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.target_voltage must be positive, got {}",
                self.target_voltage
            )));
        }
        if self.step_size <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.step_size must be positive, got {}",
                self.step_size
            )));
        }
        if self.step_size > self.simulation_time {
            return Err(ConfigError::ValidationError(format!(
                "simulation.step_size ({}) exceeds simulation_time ({})",
                self.step_size, self.simulation_time
            )));
        }
        let ratio = self.simulation_time / self.step_size;
        if !ratio.is_finite() || ratio > MAX_STEP_COUNT as f64 {
            return Err(ConfigError::ValidationError(format!(
                "simulation_time / step_size exceeds {MAX_STEP_COUNT} steps"
            )));
        }
        let names = &self.signals;
        if names.output.is_empty() || names.secondary.is_empty() || names.actuation.is_empty() {
            return Err(ConfigError::ValidationError(
                "simulation.signals names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of fixed steps: `floor(simulation_time / step_size)`, with a
    /// small tolerance against representation error.
    pub fn step_count(&self) -> usize {
        (self.simulation_time / self.step_size + STEP_COUNT_EPSILON).floor() as usize
    }
}

/// One simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Step start time [s].
    pub time: f64,
    /// Sensed output read at the start of the step.
    pub output: f64,
    /// Sensed secondary quantity read at the start of the step.
    pub secondary: f64,
    /// Actuation applied during the step.
    pub actuation: f64,
}

/// Time-indexed closed-loop response with uniform step size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrajectory {
    step_size: f64,
    samples: Vec<Sample>,
}

impl SimulationTrajectory {
    /// Empty trajectory with room for `capacity` samples.
    pub fn with_capacity(step_size: f64, capacity: usize) -> Self {
        Self {
            step_size,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Build from recorded samples.
    pub fn from_samples(step_size: f64, samples: Vec<Sample>) -> Self {
        Self { step_size, samples }
    }

    /// Append one sample.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Fixed step size [s].
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// All samples in time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the first sample.
    pub fn start_time(&self) -> Option<f64> {
        self.samples.first().map(|s| s.time)
    }

    /// End of the covered interval (last sample time plus one step).
    pub fn end_time(&self) -> Option<f64> {
        self.samples.last().map(|s| s.time + self.step_size)
    }
}
