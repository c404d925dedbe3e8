//! Cascaded dual-loop PID.
//!
//! The outer (voltage) loop turns the output error into a reference for the
//! secondary quantity (inductor current); the inner (current) loop turns the
//! secondary error into the actuation (duty cycle). Parameters live in the
//! `voltage_` and `current_` namespaces of one `ControlParameters` set.

use super::pid::Pid;
use boost_common::consts::{INNER_LOOP_PREFIX, OUTER_LOOP_PREFIX};
use boost_common::error::{NumericError, TuneError};
use boost_common::params::{AntiWindup, ControlParameters, ControllerKind, PidParameters};

/// Outer/inner PID cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct DualLoopPid {
    outer: Pid,
    inner: Pid,
}

impl DualLoopPid {
    /// Build from the ten namespaced keys.
    ///
    /// # Errors
    /// `TuneError::Config` naming the first missing or unexpected key;
    /// `TuneError::NumericDegenerate` for invalid loop parameters.
    pub fn from_params(
        params: &ControlParameters,
        anti_windup: AntiWindup,
    ) -> Result<Self, TuneError> {
        params.check_keys(&ControllerKind::DualLoopPid.required_keys())?;
        let outer = PidParameters::from_params(params, OUTER_LOOP_PREFIX)?;
        let inner = PidParameters::from_params(params, INNER_LOOP_PREFIX)?;
        Ok(Self {
            outer: Pid::new(outer, anti_windup)?,
            inner: Pid::new(inner, anti_windup)?,
        })
    }

    /// One cascade step; returns the actuation.
    pub fn update(
        &mut self,
        target: f64,
        measured_output: f64,
        measured_secondary: f64,
        dt: f64,
    ) -> Result<f64, NumericError> {
        let reference = self.outer.update(target - measured_output, dt)?;
        self.inner.update(reference - measured_secondary, dt)
    }

    /// Reset both loops.
    pub fn reset(&mut self) {
        self.outer.reset();
        self.inner.reset();
    }

    /// Voltage loop.
    pub fn outer(&self) -> &Pid {
        &self.outer
    }

    /// Current loop.
    pub fn inner(&self) -> &Pid {
        &self.inner
    }
}
