//! Plant registry.
//!
//! Provides a `PlantRegistry` struct for registering and retrieving plant
//! factories. This uses constructor-injection rather than global state.

use boost_common::config::ConfigError;
use boost_common::plant::{PlantConfig, PlantFactory, PlantHandle};
use std::collections::HashMap;

/// Registry of available plant models.
///
/// Constructed at startup, populated via `register()`, and consulted when a
/// tuning job is loaded. No global state, testable in isolation.
pub struct PlantRegistry {
    factories: HashMap<&'static str, PlantFactory>,
}

impl PlantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in plant.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::plants::register_builtin(&mut registry);
        registry
    }

    /// Register a plant factory.
    ///
    /// # Panics
    /// Panics if a plant with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: PlantFactory) {
        if self.factories.contains_key(name) {
            panic!("Plant '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a plant factory by name.
    pub fn get_factory(&self, name: &str) -> Option<PlantFactory> {
        self.factories.get(name).copied()
    }

    /// Bind `config` to its registered factory.
    ///
    /// # Errors
    /// Returns `ConfigError::UnknownPlant` if `config.model` is not registered.
    pub fn handle(&self, config: PlantConfig) -> Result<PlantHandle, ConfigError> {
        let factory = self
            .get_factory(&config.model)
            .ok_or_else(|| ConfigError::UnknownPlant(config.model.clone()))?;
        Ok(PlantHandle::new(config, factory))
    }

    /// List all registered plant names, sorted.
    pub fn list_plants(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for PlantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boost_common::plant::{PlantError, PlantSimulator};

    struct TestPlant;

    impl PlantSimulator for TestPlant {
        fn name(&self) -> &'static str {
            "test"
        }
        fn signals(&self) -> &'static [&'static str] {
            &[]
        }
        fn setup(&mut self, _start_time: f64) -> Result<(), PlantError> {
            Ok(())
        }
        fn initialize(&mut self) -> Result<(), PlantError> {
            Ok(())
        }
        fn read(&mut self, _signal: &str) -> Result<f64, PlantError> {
            Ok(0.0)
        }
        fn write(&mut self, _signal: &str, _value: f64) -> Result<(), PlantError> {
            Ok(())
        }
        fn step(&mut self, _time: f64, _dt: f64) -> Result<(), PlantError> {
            Ok(())
        }
        fn terminate(&mut self) -> Result<(), PlantError> {
            Ok(())
        }
    }

    fn create_test_plant(_config: &PlantConfig) -> Result<Box<dyn PlantSimulator>, PlantError> {
        Ok(Box::new(TestPlant))
    }

    #[test]
    fn registry_register_and_open() {
        let mut reg = PlantRegistry::new();
        reg.register("test_plant", create_test_plant);

        let handle = reg.handle(PlantConfig::new("test_plant")).expect("should bind");
        let plant = handle.open().expect("should open");
        assert_eq!(plant.name(), "test");
    }

    #[test]
    fn registry_plant_not_found() {
        let reg = PlantRegistry::new();
        let result = reg.handle(PlantConfig::new("fmu"));
        assert!(matches!(result, Err(ConfigError::UnknownPlant(name)) if name == "fmu"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn registry_duplicate_panics() {
        let mut reg = PlantRegistry::new();
        reg.register("dup", create_test_plant);
        reg.register("dup", create_test_plant);
    }

    #[test]
    fn builtin_plants_listed() {
        let reg = PlantRegistry::with_builtin();
        assert_eq!(reg.list_plants(), vec!["averaged_boost", "linear"]);
    }
}
