//! Derivative-free optimizers over an [`Objective`].
//!
//! Every algorithm implements [`Optimizer`] and is created through the
//! [`OptimizerRegistry`] from an `OptimizerConfig`. Shared machinery lives
//! here: problem validation, seeding, candidate scoring under the
//! configured [`FailurePolicy`] and result assembly.
//!
//! Scores are minimized. Ties never replace an incumbent: a candidate only
//! becomes a new best when its score is strictly lower.

pub mod ga;
pub mod objective;
pub mod observer;
pub mod pso;
pub mod registry;

pub use objective::Objective;
pub use observer::{NoopObserver, Observer, ProgressLogger, StopFlag};
pub use registry::OptimizerRegistry;

use boost_common::config::ConfigError;
use boost_common::consts::PENALTY_SCORE;
use boost_common::error::{NumericError, TuneError};
use boost_common::evaluation::EvaluationMetrics;
use boost_common::optimizer::{
    Bounds, FailurePolicy, IterationRecord, OptimizationResult, OptimizerConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// A search algorithm.
pub trait Optimizer {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Minimize `objective` inside `bounds`, seeding the search with
    /// `initial`.
    ///
    /// # Errors
    /// - `TuneError::Config` for inconsistent bounds, dimensions or initial
    ///   point (nothing is evaluated)
    /// - `TuneError::Cancelled` when `observer` asks to stop
    /// - any candidate failure under `FailurePolicy::Abort`
    fn optimize(
        &mut self,
        objective: &Objective,
        bounds: &Bounds,
        initial: &[f64],
        observer: &mut dyn Observer,
    ) -> Result<OptimizationResult, TuneError>;
}

/// Constructor stored in the [`OptimizerRegistry`].
pub type OptimizerFactory = fn(&OptimizerConfig) -> Result<Box<dyn Optimizer>, ConfigError>;

// ─── Shared helpers ─────────────────────────────────────────────────

/// Bounds valid, one per tuned key, `initial` inside them.
pub(crate) fn check_problem(
    objective: &Objective,
    bounds: &Bounds,
    initial: &[f64],
) -> Result<(), ConfigError> {
    bounds.validate()?;
    if bounds.dims() != objective.dims() {
        return Err(ConfigError::ValidationError(format!(
            "{} bounds for {} tuned parameters",
            bounds.dims(),
            objective.dims()
        )));
    }
    bounds.check_initial(initial)
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform point inside `bounds`.
pub(crate) fn random_position(rng: &mut StdRng, bounds: &Bounds) -> Vec<f64> {
    bounds
        .intervals()
        .iter()
        .map(|&(lo, hi)| rng.gen_range(lo..=hi))
        .collect()
}

/// Score of one evaluated candidate.
#[derive(Debug, Clone)]
pub(crate) struct Scored {
    pub score: f64,
    /// `None` for a penalized candidate.
    pub diagnostics: Option<EvaluationMetrics>,
}

/// Best candidate seen so far.
#[derive(Debug, Clone)]
pub(crate) struct Best {
    pub position: Vec<f64>,
    pub score: f64,
    pub diagnostics: Option<EvaluationMetrics>,
}

impl Best {
    pub fn new(position: &[f64], scored: &Scored) -> Self {
        Self {
            position: position.to_vec(),
            score: scored.score,
            diagnostics: scored.diagnostics.clone(),
        }
    }

    /// Replace the incumbent if `scored` is strictly better.
    pub fn offer(&mut self, position: &[f64], scored: &Scored) -> bool {
        if scored.score < self.score {
            *self = Self::new(position, scored);
            true
        } else {
            false
        }
    }

    pub fn record(&self, iteration: usize) -> IterationRecord {
        IterationRecord {
            iteration,
            best_score: self.score,
            best_position: self.position.clone(),
            best_diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Fill an empty slot or offer to its incumbent.
pub(crate) fn offer_best(slot: &mut Option<Best>, position: &[f64], scored: &Scored) {
    match slot {
        Some(best) => {
            best.offer(position, scored);
        }
        None => *slot = Some(Best::new(position, scored)),
    }
}

/// Objective evaluation under a failure policy, with cancellation and
/// bookkeeping.
pub(crate) struct Evaluations<'a> {
    objective: &'a Objective,
    policy: FailurePolicy,
    observer: &'a mut dyn Observer,
    history: Vec<IterationRecord>,
    count: usize,
}

impl<'a> Evaluations<'a> {
    pub fn new(
        objective: &'a Objective,
        policy: FailurePolicy,
        observer: &'a mut dyn Observer,
    ) -> Self {
        Self {
            objective,
            policy,
            observer,
            history: Vec::new(),
            count: 0,
        }
    }

    /// Evaluate one candidate.
    pub fn score(&mut self, position: &[f64]) -> Result<Scored, TuneError> {
        if self.observer.should_stop() {
            debug!(evaluations = self.count, "stop requested");
            return Err(TuneError::Cancelled);
        }
        self.count += 1;

        let outcome = self.objective.evaluate(position).and_then(|m| {
            if m.score.is_finite() {
                Ok(m)
            } else {
                Err(NumericError::non_finite("score").into())
            }
        });
        let scored = match outcome {
            Ok(metrics) => Scored {
                score: metrics.score,
                diagnostics: Some(metrics),
            },
            Err(e) if e.is_candidate_failure() && self.policy == FailurePolicy::Penalize => {
                warn!(?position, error = %e, "candidate failed, penalized");
                Scored {
                    score: PENALTY_SCORE,
                    diagnostics: None,
                }
            }
            Err(e) => return Err(e),
        };
        self.observer.on_evaluation(position, scored.score);
        Ok(scored)
    }

    /// Append the iteration record for `best` and notify the observer.
    pub fn complete_iteration(&mut self, iteration: usize, best: &Best) {
        let record = best.record(iteration);
        self.observer.on_iteration(&record);
        self.history.push(record);
    }

    pub fn finish(self, algorithm: &str, best: Best) -> OptimizationResult {
        OptimizationResult {
            algorithm: algorithm.to_string(),
            best_parameters: self.objective.parameters_at(&best.position),
            best_position: best.position,
            best_score: best.score,
            best_diagnostics: best.diagnostics,
            history: self.history,
            evaluations: self.count,
        }
    }
}
