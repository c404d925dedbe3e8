//! State-averaged boost converter.
//!
//! Continuous-conduction averaged model with duty cycle `d`:
//!
//! ```text
//! L di/dt = Vin - (1 - d) v
//! C dv/dt = (1 - d) i - v / R(t)
//! ```
//!
//! `R(t)` switches from `load_resistance` to `step_load_resistance` at
//! `load_step_time`, which produces the load-disturbance half of a tuning
//! experiment. Each `step()` is split into `substeps` forward-Euler
//! sub-intervals. The inductor current is floored at zero (diode blocks
//! reverse current) and the duty cycle is clamped to `[0, max_duty]`.
//!
//! | Parameter              | Default  | Unit |
//! |------------------------|----------|------|
//! | `input_voltage`        | 80.0     | V    |
//! | `inductance`           | 2.0e-3   | H    |
//! | `capacitance`          | 470e-6   | F    |
//! | `load_resistance`      | 50.0     | Ω    |
//! | `step_load_resistance` | 25.0     | Ω    |
//! | `load_step_time`       | 0.5      | s    |
//! | `max_duty`             | 0.95     | -    |
//! | `substeps`             | 10       | -    |

use crate::lifecycle::{Lifecycle, Phase};
use boost_common::consts::{
    DEFAULT_ACTUATION_SIGNAL, DEFAULT_OUTPUT_SIGNAL, DEFAULT_SECONDARY_SIGNAL, DEFAULT_SIGNALS,
};
use boost_common::plant::{PlantConfig, PlantError, PlantSimulator};
use tracing::{debug, trace};

/// Registry name.
pub const NAME: &str = "averaged_boost";

const PARAMETERS: [&str; 8] = [
    "input_voltage",
    "inductance",
    "capacitance",
    "load_resistance",
    "step_load_resistance",
    "load_step_time",
    "max_duty",
    "substeps",
];

/// Electrical parameters of the converter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostParameters {
    /// Input voltage [V].
    pub input_voltage: f64,
    /// Inductance [H].
    pub inductance: f64,
    /// Output capacitance [F].
    pub capacitance: f64,
    /// Load before the step [Ω].
    pub load_resistance: f64,
    /// Load after the step [Ω].
    pub step_load_resistance: f64,
    /// Time of the load step [s].
    pub load_step_time: f64,
    /// Upper duty-cycle clamp.
    pub max_duty: f64,
    /// Forward-Euler sub-intervals per step.
    pub substeps: u32,
}

impl Default for BoostParameters {
    fn default() -> Self {
        Self {
            input_voltage: 80.0,
            inductance: 2.0e-3,
            capacitance: 470e-6,
            load_resistance: 50.0,
            step_load_resistance: 25.0,
            load_step_time: 0.5,
            max_duty: 0.95,
            substeps: 10,
        }
    }
}

impl BoostParameters {
    /// Read parameters from a plant config, defaulting absent keys.
    pub fn from_config(config: &PlantConfig) -> Result<Self, PlantError> {
        config.check_known(&PARAMETERS)?;
        let d = Self::default();
        let substeps = config.parameter_or("substeps", f64::from(d.substeps))?;
        if substeps < 1.0 || substeps.fract() != 0.0 || substeps > f64::from(u32::MAX) {
            return Err(PlantError::Setup(format!(
                "substeps must be a positive integer, got {substeps}"
            )));
        }
        let params = Self {
            input_voltage: config.parameter_or("input_voltage", d.input_voltage)?,
            inductance: config.parameter_or("inductance", d.inductance)?,
            capacitance: config.parameter_or("capacitance", d.capacitance)?,
            load_resistance: config.parameter_or("load_resistance", d.load_resistance)?,
            step_load_resistance: config
                .parameter_or("step_load_resistance", d.step_load_resistance)?,
            load_step_time: config.parameter_or("load_step_time", d.load_step_time)?,
            max_duty: config.parameter_or("max_duty", d.max_duty)?,
            substeps: substeps as u32,
        };
        params.validate()?;
        Ok(params)
    }

    /// Physical sanity checks.
    pub fn validate(&self) -> Result<(), PlantError> {
        for (name, value) in [
            ("inductance", self.inductance),
            ("capacitance", self.capacitance),
            ("load_resistance", self.load_resistance),
            ("step_load_resistance", self.step_load_resistance),
        ] {
            if value <= 0.0 {
                return Err(PlantError::Setup(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.max_duty) {
            return Err(PlantError::Setup(format!(
                "max_duty must be in [0, 1), got {}",
                self.max_duty
            )));
        }
        if self.substeps == 0 {
            return Err(PlantError::Setup("substeps must be at least 1".to_string()));
        }
        Ok(())
    }

    fn load_at(&self, time: f64) -> f64 {
        if time >= self.load_step_time {
            self.step_load_resistance
        } else {
            self.load_resistance
        }
    }
}

/// Averaged boost converter plant.
#[derive(Debug, Clone)]
pub struct AveragedBoostPlant {
    params: BoostParameters,
    /// Inductor current [A].
    current: f64,
    /// Capacitor (output) voltage [V].
    voltage: f64,
    /// Applied duty cycle, already clamped.
    duty: f64,
    lifecycle: Lifecycle,
}

impl AveragedBoostPlant {
    /// Create a de-energized converter.
    pub fn new(params: BoostParameters) -> Result<Self, PlantError> {
        params.validate()?;
        Ok(Self {
            params,
            current: 0.0,
            voltage: 0.0,
            duty: 0.0,
            lifecycle: Lifecycle::default(),
        })
    }

    /// Converter parameters.
    pub fn params(&self) -> &BoostParameters {
        &self.params
    }

    fn substep(&mut self, time: f64, h: f64) {
        let p = &self.params;
        let off = 1.0 - self.duty;
        let di = (p.input_voltage - off * self.voltage) / p.inductance * h;
        let dv = (off * self.current - self.voltage / p.load_at(time)) / p.capacitance * h;
        self.current = (self.current + di).max(0.0);
        self.voltage += dv;
    }
}

/// Factory registered under [`NAME`].
pub fn create_plant(config: &PlantConfig) -> Result<Box<dyn PlantSimulator>, PlantError> {
    let params = BoostParameters::from_config(config)?;
    debug!(?params, "averaged boost plant created");
    Ok(Box::new(AveragedBoostPlant::new(params)?))
}

impl PlantSimulator for AveragedBoostPlant {
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
            DEFAULT_OUTPUT_SIGNAL => Ok(self.voltage),
            DEFAULT_SECONDARY_SIGNAL => Ok(self.current),
            DEFAULT_ACTUATION_SIGNAL => Ok(self.duty),
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
        let initializing = self.lifecycle.phase() == Phase::Initializing;
        match signal {
            DEFAULT_ACTUATION_SIGNAL => self.duty = value.clamp(0.0, self.params.max_duty),
            DEFAULT_OUTPUT_SIGNAL if initializing => self.voltage = value,
            DEFAULT_SECONDARY_SIGNAL if initializing => self.current = value.max(0.0),
            DEFAULT_OUTPUT_SIGNAL | DEFAULT_SECONDARY_SIGNAL => {
                return Err(PlantError::Write {
                    signal: signal.to_string(),
                    reason: "state is only writable before initialize()".to_string(),
                });
            }
            other => return Err(PlantError::UnknownSignal(other.to_string())),
        }
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), PlantError> {
        self.lifecycle.check_step(time, dt)?;
        let n = self.params.substeps;
        let h = dt / f64::from(n);
        for k in 0..n {
            self.substep(time + f64::from(k) * h, h);
        }
        if !self.voltage.is_finite() || !self.current.is_finite() {
            return Err(PlantError::Step {
                time,
                reason: "converter state diverged".to_string(),
            });
        }
        trace!(time, v = self.voltage, i = self.current, d = self.duty, "boost step");
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), PlantError> {
        self.lifecycle.terminate()
    }
}
