//! # Boost Tuner Library
//!
//! Controller tuning engine for boost converters. One objective evaluation
//! runs the full pipeline:
//!
//! ```text
//! parameter vector → Controller → simulate() → trajectory → Evaluator → score
//! ```
//!
//! and the optimizers (PSO, GA) repeat it until their budget is spent.
//!
//! ## Modules
//!
//! - [`control`]: single-loop and dual-loop (cascaded) PID
//! - [`simulation`]: step-wise closed-loop driver over a `PlantSimulator`
//! - [`evaluation`]: segmented step-response scoring
//! - [`optimize`]: objective, observers, PSO, GA and the optimizer registry
//! - [`config`]: TOML tuning job loading

pub mod config;
pub mod control;
pub mod evaluation;
pub mod optimize;
pub mod simulation;
