//! Evaluator configuration and metric types.

use crate::config::ConfigError;
use crate::consts::DEFAULT_SETTLING_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

fn default_weight() -> f64 {
    1.0
}

fn default_settling_tolerance() -> f64 {
    DEFAULT_SETTLING_TOLERANCE
}

/// Closed set of evaluator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EvaluatorKind {
    /// Two-segment step response split at a load event.
    #[default]
    SegmentedStep,
}

impl EvaluatorKind {
    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SegmentedStep => "segmented",
        }
    }

    /// Accepted names (lowercase) for this variant.
    const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::SegmentedStep => &["segmented", "duallooppid"],
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvaluatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        [Self::SegmentedStep]
            .into_iter()
            .find(|k| k.aliases().contains(&lower.as_str()))
            .ok_or_else(|| ConfigError::UnknownEvaluator(s.to_string()))
    }
}

impl TryFrom<String> for EvaluatorKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EvaluatorKind> for String {
    fn from(kind: EvaluatorKind) -> Self {
        kind.name().to_string()
    }
}

/// Non-negative weights of the six segment metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    #[serde(default = "default_weight")]
    pub settling_time: f64,
    #[serde(default = "default_weight")]
    pub overshoot: f64,
    #[serde(default = "default_weight")]
    pub integrated_error: f64,
    #[serde(default = "default_weight")]
    pub post_settling_time: f64,
    #[serde(default = "default_weight")]
    pub post_overshoot: f64,
    #[serde(default = "default_weight")]
    pub post_integrated_error: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            settling_time: 1.0,
            overshoot: 1.0,
            integrated_error: 1.0,
            post_settling_time: 1.0,
            post_overshoot: 1.0,
            post_integrated_error: 1.0,
        }
    }
}

impl MetricWeights {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("settling_time", self.settling_time),
            ("overshoot", self.overshoot),
            ("integrated_error", self.integrated_error),
            ("post_settling_time", self.post_settling_time),
            ("post_overshoot", self.post_overshoot),
            ("post_integrated_error", self.post_integrated_error),
        ]
    }
}

/// The `[evaluation]` section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [evaluation]
/// method = "segmented"
/// target_voltage = 160.0
/// event_time = 0.5
///
/// [evaluation.weights]
/// overshoot = 100.0
/// integrated_error = 1000.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Evaluator variant.
    #[serde(default)]
    pub method: EvaluatorKind,
    /// Reference the response is scored against.
    pub target_voltage: f64,
    /// Metric weights.
    #[serde(default)]
    pub weights: MetricWeights,
    /// Segment boundary [s]; mid-run when absent.
    #[serde(default)]
    pub event_time: Option<f64>,
    /// Relative settling band.
    #[serde(default = "default_settling_tolerance")]
    pub settling_tolerance: f64,
}

impl EvaluatorConfig {
    /// Config with unit weights, mid-run event and default tolerance.
    pub fn new(target_voltage: f64) -> Self {
        Self {
            method: EvaluatorKind::default(),
            target_voltage,
            weights: MetricWeights::default(),
            event_time: None,
            settling_tolerance: DEFAULT_SETTLING_TOLERANCE,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` when the target is zero or not finite,
    /// a weight is negative or not finite, the tolerance is outside `(0, 1)`,
    /// or the event time is not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_voltage.is_finite() || self.target_voltage == 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "evaluation.target_voltage must be finite and non-zero, got {}",
                self.target_voltage
            )));
        }
        for (name, w) in self.weights.entries() {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "evaluation.weights.{name} must be finite and non-negative, got {w}"
                )));
            }
        }
        if !(self.settling_tolerance > 0.0 && self.settling_tolerance < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "evaluation.settling_tolerance must be in (0, 1), got {}",
                self.settling_tolerance
            )));
        }
        if let Some(t) = self.event_time {
            if !t.is_finite() {
                return Err(ConfigError::ValidationError(
                    "evaluation.event_time must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Metrics of one trajectory segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentMetrics {
    /// Segment-relative time of first entry into the settling band.
    /// `None` when the band is never reached.
    pub settling_time: Option<f64>,
    /// Peak relative excursion above target, never negative.
    pub overshoot: f64,
    /// Accumulated relative absolute error times step size.
    pub integrated_error: f64,
    /// Covered segment length [s].
    pub duration: f64,
}

impl SegmentMetrics {
    /// Settling time as it enters the score: the full segment when never
    /// settled.
    pub fn scored_settling_time(&self) -> f64 {
        self.settling_time.unwrap_or(self.duration)
    }
}

/// Evaluation diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Composite weighted score (lower is better).
    pub score: f64,
    /// Samples before the event.
    pub pre_event: SegmentMetrics,
    /// Samples at or after the event.
    pub post_event: SegmentMetrics,
    /// `|y_last - target| / target`; reported, never weighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steady_state_error: Option<f64>,
}

impl EvaluationMetrics {
    /// Flat `name -> value` view using the classic metric names.
    pub fn to_map(&self) -> BTreeMap<&'static str, Option<f64>> {
        let mut map = BTreeMap::new();
        map.insert("score", Some(self.score));
        map.insert("settling_time", self.pre_event.settling_time);
        map.insert("overshoot", Some(self.pre_event.overshoot));
        map.insert("integrated_error", Some(self.pre_event.integrated_error));
        map.insert("post_settling_time", self.post_event.settling_time);
        map.insert("post_overshoot", Some(self.post_event.overshoot));
        map.insert("post_integrated_error", Some(self.post_event.integrated_error));
        if self.steady_state_error.is_some() {
            map.insert("steady_state_error", self.steady_state_error);
        }
        map
    }
}
