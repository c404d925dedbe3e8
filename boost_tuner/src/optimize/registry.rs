//! Optimizer registry.
//!
//! Maps algorithm names to [`OptimizerFactory`] constructors. Lookup is
//! case-insensitive; registered names are lowercase.

use super::{Optimizer, OptimizerFactory, ga, pso};
use boost_common::config::ConfigError;
use boost_common::optimizer::OptimizerConfig;
use std::collections::HashMap;

/// Registry of available optimization algorithms.
pub struct OptimizerRegistry {
    factories: HashMap<&'static str, OptimizerFactory>,
}

impl OptimizerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding `pso` and `ga`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(pso::NAME, pso::create);
        registry.register(ga::NAME, ga::create);
        registry
    }

    /// Register an optimizer factory.
    ///
    /// # Panics
    /// Panics if an algorithm with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: OptimizerFactory) {
        if self.factories.contains_key(name) {
            panic!("Optimizer '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get an optimizer factory by name.
    pub fn get_factory(&self, name: &str) -> Option<OptimizerFactory> {
        self.factories.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// Build the optimizer `config.algorithm` names.
    ///
    /// # Errors
    /// `ConfigError::UnknownAlgorithm` for an unregistered name, or the
    /// factory's validation error.
    pub fn create(&self, config: &OptimizerConfig) -> Result<Box<dyn Optimizer>, ConfigError> {
        let factory = self
            .get_factory(&config.algorithm)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(config.algorithm.clone()))?;
        factory(config)
    }

    /// List all registered algorithm names, sorted.
    pub fn list_algorithms(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for OptimizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
