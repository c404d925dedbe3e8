//! Controller engine root.
//!
//! A [`Controller`] is selected by [`ControllerKind`] and built from a flat
//! `ControlParameters` set. Every variant consumes the same [`LoopInput`] so
//! the simulation driver stays controller-agnostic.

pub mod dual_loop;
pub mod pid;

use boost_common::error::{NumericError, TuneError};
use boost_common::params::{AntiWindup, ControlParameters, ControllerKind, PidParameters};

use dual_loop::DualLoopPid;
use pid::Pid;

/// Signals available to a controller at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopInput {
    /// Reference for the sensed output.
    pub target: f64,
    /// Sensed output (voltage).
    pub output: f64,
    /// Sensed secondary quantity (inductor current).
    pub secondary: f64,
    /// Step size [s].
    pub dt: f64,
}

/// Closed set of controller implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    /// Single loop on `target - output`.
    Pid(Pid),
    /// Voltage/current cascade.
    DualLoopPid(DualLoopPid),
}

impl Controller {
    /// Build a controller of `kind` with zeroed state.
    ///
    /// # Errors
    /// `TuneError::Config` when the key set does not match `kind` exactly;
    /// `TuneError::NumericDegenerate` for invalid parameter values.
    pub fn new(
        kind: ControllerKind,
        params: &ControlParameters,
        anti_windup: AntiWindup,
    ) -> Result<Self, TuneError> {
        match kind {
            ControllerKind::Pid => {
                params.check_keys(&kind.required_keys())?;
                let loop_params = PidParameters::from_params(params, "")?;
                Ok(Self::Pid(Pid::new(loop_params, anti_windup)?))
            }
            ControllerKind::DualLoopPid => Ok(Self::DualLoopPid(DualLoopPid::from_params(
                params,
                anti_windup,
            )?)),
        }
    }

    /// Variant tag.
    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::Pid(_) => ControllerKind::Pid,
            Self::DualLoopPid(_) => ControllerKind::DualLoopPid,
        }
    }

    /// Compute the actuation for one step.
    #[inline]
    pub fn update(&mut self, input: LoopInput) -> Result<f64, NumericError> {
        match self {
            Self::Pid(pid) => pid.update(input.target - input.output, input.dt),
            Self::DualLoopPid(c) => c.update(input.target, input.output, input.secondary, input.dt),
        }
    }

    /// Zero all loop state.
    pub fn reset(&mut self) {
        match self {
            Self::Pid(pid) => pid.reset(),
            Self::DualLoopPid(c) => c.reset(),
        }
    }
}
