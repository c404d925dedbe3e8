//! Built-in plant implementations.
//!
//! - [`linear`] - Deterministic first-order stand-in for tests and smoke runs
//! - [`averaged_boost`] - State-averaged boost converter with a load step
//!
//! # Adding New Plants
//!
//! 1. Create a new submodule under `plants/`
//! 2. Implement the `PlantSimulator` trait from `boost_common::plant`
//! 3. Register the factory in [`register_builtin`]

pub mod averaged_boost;
pub mod linear;

use crate::registry::PlantRegistry;

/// Register all built-in plants.
pub fn register_builtin(registry: &mut PlantRegistry) {
    registry.register(linear::NAME, linear::create_plant);
    registry.register(averaged_boost::NAME, averaged_boost::create_plant);
}
