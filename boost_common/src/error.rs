//! Error taxonomy for controller construction, simulation and optimization.
//!
//! [`TuneError`] is the umbrella returned by every fallible tuning entry
//! point. Configuration failures abort a run unconditionally; simulation
//! faults and numeric degeneracies are per-candidate and are subject to the
//! optimizer's failure policy.

use crate::config::ConfigError;
use crate::plant::PlantError;
use thiserror::Error;

/// Numeric degeneracy detected by a controller, at construction or update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    /// A quantity that must be strictly positive is not (e.g. `Ti`).
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: String, value: f64 },

    /// A quantity is NaN or infinite.
    #[error("{name} is not finite")]
    NonFinite { name: String },

    /// Output limits are inverted.
    #[error("output limits inverted: y_min={min} > y_max={max}")]
    InvertedLimits { min: f64, max: f64 },
}

impl NumericError {
    /// Shorthand for a [`NumericError::NonFinite`] naming `name`.
    pub fn non_finite(name: impl Into<String>) -> Self {
        Self::NonFinite { name: name.into() }
    }

    /// Shorthand for a [`NumericError::NonPositive`].
    pub fn non_positive(name: impl Into<String>, value: f64) -> Self {
        Self::NonPositive {
            name: name.into(),
            value,
        }
    }
}

/// Umbrella error for tuning runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuneError {
    /// Invalid configuration. Fatal, never retried.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The plant simulator reported a failure.
    #[error("simulation fault: {0}")]
    SimulationFault(#[from] PlantError),

    /// A controller hit a numeric degeneracy.
    #[error("numeric degenerate: {0}")]
    NumericDegenerate(#[from] NumericError),

    /// The run was stopped by its observer before completion.
    #[error("optimization cancelled")]
    Cancelled,
}

impl TuneError {
    /// Per-candidate failures may be penalized; everything else aborts.
    pub const fn is_candidate_failure(&self) -> bool {
        matches!(self, Self::SimulationFault(_) | Self::NumericDegenerate(_))
    }
}
