//! Prelude module for common re-exports.
//!
//! Consumers can do `use boost_common::prelude::*;` and get the most
//! important types without listing individual paths.

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{NumericError, TuneError};

// ─── Plant ──────────────────────────────────────────────────────────
pub use crate::plant::{PlantConfig, PlantError, PlantFactory, PlantHandle, PlantSimulator};

// ─── Controller ─────────────────────────────────────────────────────
pub use crate::params::{
    AntiWindup, ControlParameters, ControllerConfig, ControllerKind, PidParameters,
};

// ─── Simulation & Evaluation ────────────────────────────────────────
pub use crate::evaluation::{
    EvaluationMetrics, EvaluatorConfig, EvaluatorKind, MetricWeights, SegmentMetrics,
};
pub use crate::simulation::{Sample, SignalNames, SimulationConfig, SimulationTrajectory};

// ─── Optimization ───────────────────────────────────────────────────
pub use crate::optimizer::{
    Bounds, FailurePolicy, GaConfig, GlobalBestUpdate, IterationRecord, OptimizationResult,
    OptimizerConfig, PsoConfig, SearchSpace,
};
