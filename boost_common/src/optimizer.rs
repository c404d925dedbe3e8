//! Optimizer configuration, search space and result types.

use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_ALGORITHM, DEFAULT_COGNITIVE, DEFAULT_INERTIA, DEFAULT_MAX_GENERATIONS,
    DEFAULT_MAX_ITERATIONS, DEFAULT_MUTATION_RATE, DEFAULT_POPULATION_SIZE, DEFAULT_SOCIAL,
    DEFAULT_SWARM_SIZE, DEFAULT_TOURNAMENT_SIZE, DEFAULT_TUNED_PARAMETERS, DEFAULT_VELOCITY_SCALE,
};
use crate::evaluation::EvaluationMetrics;
use crate::params::ControlParameters;
use serde::{Deserialize, Serialize};

// ─── Serde defaults ─────────────────────────────────────────────────

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}
fn default_swarm_size() -> usize {
    DEFAULT_SWARM_SIZE
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
fn default_inertia() -> f64 {
    DEFAULT_INERTIA
}
fn default_cognitive() -> f64 {
    DEFAULT_COGNITIVE
}
fn default_social() -> f64 {
    DEFAULT_SOCIAL
}
fn default_velocity_scale() -> f64 {
    DEFAULT_VELOCITY_SCALE
}
fn default_population_size() -> usize {
    DEFAULT_POPULATION_SIZE
}
fn default_max_generations() -> usize {
    DEFAULT_MAX_GENERATIONS
}
fn default_mutation_rate() -> f64 {
    DEFAULT_MUTATION_RATE
}
fn default_tournament_size() -> usize {
    DEFAULT_TOURNAMENT_SIZE
}
fn default_tuned_parameters() -> Vec<String> {
    DEFAULT_TUNED_PARAMETERS.iter().map(|s| s.to_string()).collect()
}

fn validation(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}

// ─── Policies ───────────────────────────────────────────────────────

/// What happens when a single candidate evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Score the candidate as the worst possible and keep searching.
    #[default]
    Penalize,
    /// Stop the run and return the error.
    Abort,
}

/// When PSO publishes an improved global best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalBestUpdate {
    /// As soon as any particle improves on it (later particles in the same
    /// sweep already see it).
    #[default]
    Immediate,
    /// Once per sweep, after all particles moved.
    Generational,
}

// ─── Algorithm configs ──────────────────────────────────────────────

/// `[optimizer.pso]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsoConfig {
    #[serde(default = "default_swarm_size")]
    pub swarm_size: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Inertia weight.
    #[serde(default = "default_inertia")]
    pub w: f64,
    /// Cognitive (personal best) coefficient.
    #[serde(default = "default_cognitive")]
    pub c1: f64,
    /// Social (global best) coefficient.
    #[serde(default = "default_social")]
    pub c2: f64,
    /// Initial velocity spread as a fraction of each dimension's range.
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
    #[serde(default)]
    pub global_best_update: GlobalBestUpdate,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: DEFAULT_SWARM_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            w: DEFAULT_INERTIA,
            c1: DEFAULT_COGNITIVE,
            c2: DEFAULT_SOCIAL,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            global_best_update: GlobalBestUpdate::default(),
        }
    }
}

impl PsoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swarm_size == 0 {
            return Err(validation("optimizer.pso.swarm_size must be at least 1".into()));
        }
        for (name, v) in [
            ("w", self.w),
            ("c1", self.c1),
            ("c2", self.c2),
            ("velocity_scale", self.velocity_scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(validation(format!(
                    "optimizer.pso.{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// `[optimizer.ga]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Per-gene mutation probability.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: DEFAULT_MAX_GENERATIONS,
            mutation_rate: DEFAULT_MUTATION_RATE,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(validation(format!(
                "optimizer.ga.population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(validation("optimizer.ga.max_generations must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(validation(format!(
                "optimizer.ga.mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.tournament_size == 0 {
            return Err(validation("optimizer.ga.tournament_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// The `[optimizer]` section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [optimizer]
/// algorithm = "pso"
/// seed = 42
/// failure_policy = "penalize"
///
/// [optimizer.pso]
/// swarm_size = 20
/// max_iterations = 50
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Registered algorithm name.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// RNG seed; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub pso: PsoConfig,
    #[serde(default)]
    pub ga: GaConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            seed: None,
            failure_policy: FailurePolicy::default(),
            pso: PsoConfig::default(),
            ga: GaConfig::default(),
        }
    }
}

// ─── Search space ───────────────────────────────────────────────────

/// Per-dimension inclusive `[min, max]` intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bounds(Vec<(f64, f64)>);

impl Bounds {
    pub fn new(intervals: Vec<(f64, f64)>) -> Self {
        Self(intervals)
    }

    /// Number of dimensions.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// `(min, max)` of every dimension.
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.0
    }

    /// Every interval finite with `min <= max`, at least one dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(validation("search.bounds must name at least one dimension".into()));
        }
        for (i, &(lo, hi)) in self.0.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(validation(format!(
                    "search.bounds[{i}] = ({lo}, {hi}) must be finite with min <= max"
                )));
            }
        }
        Ok(())
    }

    /// Whether `position` has one value per dimension, each inside its
    /// interval.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.0.len()
            && self
                .0
                .iter()
                .zip(position)
                .all(|(&(lo, hi), &x)| (lo..=hi).contains(&x))
    }

    /// Clamp `position` in place, dimension by dimension.
    pub fn clamp(&self, position: &mut [f64]) {
        for (x, &(lo, hi)) in position.iter_mut().zip(&self.0) {
            *x = x.clamp(lo, hi);
        }
    }

    /// Check an initial point against the bounds.
    pub fn check_initial(&self, initial: &[f64]) -> Result<(), ConfigError> {
        if initial.len() != self.0.len() {
            return Err(validation(format!(
                "search.initial has {} values for {} dimensions",
                initial.len(),
                self.0.len()
            )));
        }
        if !self.contains(initial) {
            return Err(validation(format!(
                "search.initial {initial:?} lies outside search.bounds"
            )));
        }
        Ok(())
    }
}

/// The `[search]` section of a tuning job.
///
/// # TOML Example
///
/// ```toml
/// [search]
/// parameters = ["voltage_k", "voltage_Ti", "current_k", "current_Ti"]
/// bounds = [[0.0, 1.0], [0.0001, 0.1], [0.0, 1.0], [0.0001, 0.1]]
/// initial = [0.05, 0.01, 0.02, 0.001]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    /// Tuned `ControlParameters` keys, one per dimension.
    #[serde(default = "default_tuned_parameters")]
    pub parameters: Vec<String>,
    pub bounds: Bounds,
    pub initial: Vec<f64>,
}

impl SearchSpace {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        if self.parameters.len() != self.bounds.dims() {
            return Err(validation(format!(
                "search.parameters has {} keys for {} bounds",
                self.parameters.len(),
                self.bounds.dims()
            )));
        }
        for (i, key) in self.parameters.iter().enumerate() {
            if self.parameters[..i].contains(key) {
                return Err(validation(format!("search.parameters repeats '{key}'")));
            }
        }
        self.bounds.check_initial(&self.initial)
    }
}

// ─── Results ────────────────────────────────────────────────────────

/// Global best after one PSO sweep or GA generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based sweep or generation number.
    pub iteration: usize,
    pub best_score: f64,
    pub best_position: Vec<f64>,
    /// `None` when the best so far is a penalized candidate.
    pub best_diagnostics: Option<EvaluationMetrics>,
}

/// Final outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Registry name of the algorithm that produced this result.
    pub algorithm: String,
    pub best_position: Vec<f64>,
    /// Full controller parameter set at `best_position`.
    pub best_parameters: ControlParameters,
    pub best_score: f64,
    pub best_diagnostics: Option<EvaluationMetrics>,
    pub history: Vec<IterationRecord>,
    /// Total objective evaluations performed.
    pub evaluations: usize,
}
