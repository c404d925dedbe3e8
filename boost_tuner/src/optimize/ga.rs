//! Generational genetic algorithm.
//!
//! Real-valued genes, tournament selection, single-point crossover and
//! uniform-reset mutation. The caller's initial point is the last member
//! of the first population. The best individual ever evaluated is tracked
//! outside the population, so no elitism is needed for the result.

use super::{
    Best, Evaluations, Objective, Observer, Optimizer, check_problem, offer_best, random_position,
    seeded_rng,
};
use boost_common::config::ConfigError;
use boost_common::error::TuneError;
use boost_common::optimizer::{Bounds, FailurePolicy, GaConfig, OptimizationResult, OptimizerConfig};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index;
use tracing::{debug, info};

/// Registry name.
pub const NAME: &str = "ga";

/// Genetic algorithm optimizer.
#[derive(Debug, Clone)]
pub struct Ga {
    config: GaConfig,
    seed: Option<u64>,
    failure_policy: FailurePolicy,
}

impl Ga {
    pub fn new(config: GaConfig, seed: Option<u64>, failure_policy: FailurePolicy) -> Self {
        Self {
            config,
            seed,
            failure_policy,
        }
    }
}

/// Registry factory.
pub fn create(config: &OptimizerConfig) -> Result<Box<dyn Optimizer>, ConfigError> {
    config.ga.validate()?;
    Ok(Box::new(Ga::new(
        config.ga.clone(),
        config.seed,
        config.failure_policy,
    )))
}

impl Optimizer for Ga {
    fn name(&self) -> &'static str {
        NAME
    }

    fn optimize(
        &mut self,
        objective: &Objective,
        bounds: &Bounds,
        initial: &[f64],
        observer: &mut dyn Observer,
    ) -> Result<OptimizationResult, TuneError> {
        check_problem(objective, bounds, initial)?;
        let cfg = &self.config;
        let pop = cfg.population_size;
        let mut rng = seeded_rng(self.seed);
        let mut evals = Evaluations::new(objective, self.failure_policy, observer);

        info!(
            population_size = pop,
            max_generations = cfg.max_generations,
            dims = bounds.dims(),
            "ga start"
        );

        let mut population: Vec<Vec<f64>> = (0..pop)
            .map(|i| {
                if i + 1 == pop {
                    initial.to_vec()
                } else {
                    random_position(&mut rng, bounds)
                }
            })
            .collect();

        let mut best: Option<Best> = None;
        for generation in 1..=cfg.max_generations {
            // ── Evaluate ────────────────────────────────────────
            let mut scores = Vec::with_capacity(pop);
            for individual in &population {
                let scored = evals.score(individual)?;
                offer_best(&mut best, individual, &scored);
                scores.push(scored.score);
            }
            let Some(current) = &best else {
                return Err(ConfigError::ValidationError("empty population".into()).into());
            };
            debug!(generation, best_score = current.score, "ga generation");
            evals.complete_iteration(generation, current);

            if generation == cfg.max_generations {
                break;
            }

            // ── Breed ───────────────────────────────────────────
            let parents: Vec<&[f64]> = (0..pop)
                .map(|_| population[tournament(&mut rng, &scores, cfg.tournament_size)].as_slice())
                .collect();
            let mut children = Vec::with_capacity(pop);
            for pair in parents.chunks(2) {
                match pair {
                    [a, b] => {
                        let (c1, c2) = crossover(&mut rng, a, b);
                        children.push(c1);
                        children.push(c2);
                    }
                    [a] => children.push(a.to_vec()),
                    _ => {}
                }
            }
            for child in &mut children {
                mutate(&mut rng, child, bounds, cfg.mutation_rate);
            }
            population = children;
        }

        let Some(best) = best else {
            return Err(ConfigError::ValidationError("no generation evaluated".into()).into());
        };
        info!(best_score = best.score, "ga finished");
        Ok(evals.finish(NAME, best))
    }
}

/// Index of the fittest of `size` distinct random contestants. The first
/// drawn wins ties.
fn tournament(rng: &mut StdRng, scores: &[f64], size: usize) -> usize {
    let contestants = index::sample(rng, scores.len(), size.min(scores.len()));
    let mut winner = contestants.index(0);
    for i in contestants.iter().skip(1) {
        if scores[i] < scores[winner] {
            winner = i;
        }
    }
    winner
}

/// Single-point crossover with the cut in `1..dims`. One-dimensional
/// parents are copied.
fn crossover(rng: &mut StdRng, a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if a.len() < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let cut = rng.gen_range(1..a.len());
    let c1 = a[..cut].iter().chain(&b[cut..]).copied().collect();
    let c2 = b[..cut].iter().chain(&a[cut..]).copied().collect();
    (c1, c2)
}

/// Reset each gene to a uniform value in its bounds with probability
/// `rate`.
fn mutate(rng: &mut StdRng, genes: &mut [f64], bounds: &Bounds, rate: f64) {
    for (gene, &(lo, hi)) in genes.iter_mut().zip(bounds.intervals()) {
        if rng.gen_bool(rate) {
            *gene = rng.gen_range(lo..=hi);
        }
    }
}
