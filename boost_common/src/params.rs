//! Controller parameter sets and controller selection.
//!
//! [`ControlParameters`] is the flat `key -> value` map exchanged with the
//! optimizer and read from `[controller.parameters]`. Each controller kind
//! defines the exact key set it accepts; [`PidParameters`] is one validated
//! PID namespace extracted from it.

use crate::config::ConfigError;
use crate::consts::{INNER_LOOP_PREFIX, OUTER_LOOP_PREFIX, PID_PARAMETER_SUFFIXES};
use crate::error::NumericError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── ControlParameters ──────────────────────────────────────────────

/// Mapping from parameter key to value.
///
/// Ordered so that iteration, logging and JSON output are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlParameters(BTreeMap<String, f64>);

impl ControlParameters {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Value for `key`.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingParameter` naming `key` when absent.
    pub fn require(&self, key: &str) -> Result<f64, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingParameter(key.to_string()))
    }

    /// Insert or overwrite `key`.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(key, value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Check that the key set is exactly `expected`.
    ///
    /// Missing keys are reported first, in `expected` order; then the first
    /// (alphabetical) key not in `expected`.
    pub fn check_keys(&self, expected: &[String]) -> Result<(), ConfigError> {
        if let Some(missing) = expected.iter().find(|k| !self.contains(k)) {
            return Err(ConfigError::MissingParameter(missing.clone()));
        }
        if let Some(extra) = self.0.keys().find(|k| !expected.contains(k)) {
            return Err(ConfigError::UnexpectedParameter(extra.clone()));
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ControlParameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ─── PID namespace ──────────────────────────────────────────────────

/// One PID loop's parameters.
///
/// Transfer form: `u = k * (e + (1/Ti)∫e dt + Td * de/dt)`, clipped to
/// `[y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidParameters {
    /// Proportional gain.
    pub k: f64,
    /// Integral time [s].
    #[serde(rename = "Ti")]
    pub ti: f64,
    /// Derivative time [s].
    #[serde(rename = "Td")]
    pub td: f64,
    /// Upper output limit.
    pub y_max: f64,
    /// Lower output limit.
    pub y_min: f64,
}

impl PidParameters {
    /// Extract the namespace `prefix` (e.g. `"voltage_"`, or `""`) from
    /// `params`, stripping the prefix.
    ///
    /// # Errors
    /// `ConfigError::MissingParameter` with the full prefixed key.
    pub fn from_params(params: &ControlParameters, prefix: &str) -> Result<Self, ConfigError> {
        let [k, ti, td, y_max, y_min] = PID_PARAMETER_SUFFIXES;
        let get = |suffix: &str| params.require(&format!("{prefix}{suffix}"));
        Ok(Self {
            k: get(k)?,
            ti: get(ti)?,
            td: get(td)?,
            y_max: get(y_max)?,
            y_min: get(y_min)?,
        })
    }

    /// Numeric sanity: all finite, `Ti > 0`, `y_min <= y_max`.
    pub fn validate(&self) -> Result<(), NumericError> {
        for (name, value) in [
            ("k", self.k),
            ("Ti", self.ti),
            ("Td", self.td),
            ("y_max", self.y_max),
            ("y_min", self.y_min),
        ] {
            if !value.is_finite() {
                return Err(NumericError::non_finite(name));
            }
        }
        if self.ti <= 0.0 {
            return Err(NumericError::non_positive("Ti", self.ti));
        }
        if self.y_min > self.y_max {
            return Err(NumericError::InvertedLimits {
                min: self.y_min,
                max: self.y_max,
            });
        }
        Ok(())
    }
}

// ─── Controller selection ───────────────────────────────────────────

/// Integrator anti-windup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntiWindup {
    /// Integrator accumulates unconditionally.
    #[default]
    Off,
    /// The step's `error * dt` is removed again while the output is clipped.
    Conditional,
}

/// Closed set of controller variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ControllerKind {
    /// Single-loop PID on the sensed output.
    Pid,
    /// Cascaded voltage (outer) / current (inner) PID.
    DualLoopPid,
}

impl ControllerKind {
    /// Every variant, in registry order.
    pub const ALL: [Self; 2] = [Self::Pid, Self::DualLoopPid];

    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pid => "pid",
            Self::DualLoopPid => "duallooppid",
        }
    }

    /// Parameter-namespace prefixes this controller reads.
    pub const fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Pid => &[""],
            Self::DualLoopPid => &[OUTER_LOOP_PREFIX, INNER_LOOP_PREFIX],
        }
    }

    /// Full key set, in validation order.
    pub fn required_keys(&self) -> Vec<String> {
        self.prefixes()
            .iter()
            .flat_map(|p| PID_PARAMETER_SUFFIXES.iter().map(move |s| format!("{p}{s}")))
            .collect()
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| ConfigError::UnknownController(s.to_string()))
    }
}

impl TryFrom<String> for ControllerKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ControllerKind> for String {
    fn from(kind: ControllerKind) -> Self {
        kind.name().to_string()
    }
}

// ─── Controller section ─────────────────────────────────────────────

/// The `[controller]` section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [controller]
/// type = "DualLoopPID"
/// anti_windup = "off"
///
/// [controller.parameters]
/// voltage_k = 0.3
/// voltage_Ti = 0.006
/// # ...
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Controller variant, matched case-insensitively.
    #[serde(rename = "type")]
    pub kind: ControllerKind,
    #[serde(default)]
    pub anti_windup: AntiWindup,
    /// Base parameter set; tuned keys are overlaid per candidate.
    #[serde(default)]
    pub parameters: ControlParameters,
}
