//! # Boost Plant Library
//!
//! Plant simulators with a pluggable registry.
//!
//! Plants implement the `PlantSimulator` trait defined in
//! `boost_common::plant`. The tuner opens them by name through a
//! [`PlantRegistry`], so external co-simulation backends plug in exactly like
//! the built-in models.
//!
//! # Module Structure
//!
//! - [`registry`] - Plant factory registration
//! - [`plants`] - Built-in plant implementations
//! - [`lifecycle`] - Shared lifecycle bookkeeping for plant implementations

#![deny(missing_docs)]

pub mod lifecycle;
pub mod plants;
pub mod registry;

pub use crate::registry::PlantRegistry;
