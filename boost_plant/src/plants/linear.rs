//! Linear first-order plant.
//!
//! `tau * dy/dt = gain * u - y`, integrated exactly over each step. With
//! `time_constant = 0` the plant is static: `y = gain * u` after every step.
//! The secondary signal echoes the applied actuation, so both controller
//! kinds can drive it.
//!
//! Parameters (all optional): `gain` (1.0), `time_constant` (0.0) [s].

use crate::lifecycle::{Lifecycle, Phase};
use boost_common::consts::{
    DEFAULT_ACTUATION_SIGNAL, DEFAULT_OUTPUT_SIGNAL, DEFAULT_SECONDARY_SIGNAL, DEFAULT_SIGNALS,
};
use boost_common::plant::{PlantConfig, PlantError, PlantSimulator};
use tracing::trace;

/// Registry name.
pub const NAME: &str = "linear";

const PARAMETERS: [&str; 2] = ["gain", "time_constant"];

/// First-order linear plant.
#[derive(Debug, Clone)]
pub struct LinearPlant {
    gain: f64,
    time_constant: f64,
    output: f64,
    actuation: f64,
    lifecycle: Lifecycle,
}

impl LinearPlant {
    /// Create a plant with the given static gain and time constant.
    ///
    /// # Errors
    /// `PlantError::Setup` if either value is not finite or the time
    /// constant is negative.
    pub fn new(gain: f64, time_constant: f64) -> Result<Self, PlantError> {
        if !gain.is_finite() || !time_constant.is_finite() || time_constant < 0.0 {
            return Err(PlantError::Setup(format!(
                "invalid linear plant: gain={gain}, time_constant={time_constant}"
            )));
        }
        Ok(Self {
            gain,
            time_constant,
            output: 0.0,
            actuation: 0.0,
            lifecycle: Lifecycle::default(),
        })
    }
}

/// Factory registered under [`NAME`].
pub fn create_plant(config: &PlantConfig) -> Result<Box<dyn PlantSimulator>, PlantError> {
    config.check_known(&PARAMETERS)?;
    Ok(Box::new(LinearPlant::new(
        config.parameter_or("gain", 1.0)?,
        config.parameter_or("time_constant", 0.0)?,
    )?))
}

impl PlantSimulator for LinearPlant {
    fn name(&self) -> &'static str {
        NAME
    }

    fn signals(&self) -> &'static [&'static str] {
        &DEFAULT_SIGNALS
    }

    fn setup(&mut self, start_time: f64) -> Result<(), PlantError> {
        self.lifecycle.setup(start_time)
    }

    fn initialize(&mut self) -> Result<(), PlantError> {
        self.lifecycle.initialize()
    }

    fn read(&mut self, signal: &str) -> Result<f64, PlantError> {
        self.lifecycle.check_read()?;
        match signal {
            DEFAULT_OUTPUT_SIGNAL => Ok(self.output),
            DEFAULT_SECONDARY_SIGNAL | DEFAULT_ACTUATION_SIGNAL => Ok(self.actuation),
            other => Err(PlantError::UnknownSignal(other.to_string())),
        }
    }

    fn write(&mut self, signal: &str, value: f64) -> Result<(), PlantError> {
        self.lifecycle.check_write()?;
        if !value.is_finite() {
            return Err(PlantError::Write {
                signal: signal.to_string(),
                reason: format!("value {value} is not finite"),
            });
        }
        match signal {
            DEFAULT_ACTUATION_SIGNAL => self.actuation = value,
            DEFAULT_OUTPUT_SIGNAL if self.lifecycle.phase() == Phase::Initializing => {
                self.output = value
            }
            DEFAULT_OUTPUT_SIGNAL | DEFAULT_SECONDARY_SIGNAL => {
                return Err(PlantError::Write {
                    signal: signal.to_string(),
                    reason: "not writable in this phase".to_string(),
                });
            }
            other => return Err(PlantError::UnknownSignal(other.to_string())),
        }
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), PlantError> {
        self.lifecycle.check_step(time, dt)?;
        let steady = self.gain * self.actuation;
        self.output = if self.time_constant == 0.0 {
            steady
        } else {
            steady + (self.output - steady) * (-dt / self.time_constant).exp()
        };
        trace!(time, output = self.output, "linear plant step");
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), PlantError> {
        self.lifecycle.terminate()
    }
}
