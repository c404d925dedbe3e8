//! Configuration loading traits and types.
//!
//! Every tuning job is a TOML document. Any `serde`-deserializable struct can
//! be read through [`ConfigLoader`]; semantic checks live in the `validate()`
//! methods of the individual config types.
//!
//! # Usage
//!
//! ```rust,no_run
//! use boost_common::config::{ConfigLoader, SharedConfig, ConfigError};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct MyJob {
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let job = MyJob::load(Path::new("job.toml"))?;
//!     println!("Service: {}", job.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading and construction-time validation.
///
/// Configuration errors are fatal: they abort the run before any simulation
/// is started and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required controller parameter key is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A controller parameter key is not part of the controller's key set.
    #[error("Unexpected parameter: {0}")]
    UnexpectedParameter(String),

    /// Controller name not in the controller registry.
    #[error("Unknown controller type: {0}")]
    UnknownController(String),

    /// Evaluator name not in the evaluator registry.
    #[error("Unknown evaluation method: {0}")]
    UnknownEvaluator(String),

    /// Optimization algorithm name not in the optimizer registry.
    #[error("Unknown optimization algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Plant model name not in the plant registry.
    #[error("Unknown plant model: {0}")]
    UnknownPlant(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-step simulation detail.
    Trace,
    /// Per-candidate evaluation detail.
    Debug,
    /// Run milestones and iteration summaries.
    #[default]
    Info,
    /// Penalized candidates and recoverable faults.
    Warn,
    /// Fatal errors only.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared by every tuning job.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "boost-160v"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Job identifier, used as a span field in logs.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax or shape is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from an in-memory TOML document.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
