//! Boost Common Library
//!
//! Shared types for the boost-converter controller tuning workspace:
//! configuration loading, the error taxonomy, the plant simulator interface
//! and the data model exchanged between controller, simulation driver,
//! evaluator and optimizers.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Defaults and limits
//! - [`error`] - Numeric and umbrella tuning errors
//! - [`plant`] - Plant simulator trait, handle and factory
//! - [`params`] - Controller parameter sets and controller selection
//! - [`simulation`] - Simulation configuration and trajectories
//! - [`evaluation`] - Evaluator configuration and metrics
//! - [`optimizer`] - Optimizer configuration, search space and results
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use boost_common::prelude::*;
//!
//! let params: ControlParameters = [("k", 1.0), ("Ti", 0.1)].into_iter().collect();
//! assert_eq!(params.get("Ti"), Some(0.1));
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod evaluation;
pub mod optimizer;
pub mod params;
pub mod plant;
pub mod prelude;
pub mod simulation;
