//! Particle swarm optimization.
//!
//! Global-best topology with inertia. The caller's initial point is placed
//! as the last particle, all others start uniformly inside the bounds with
//! normally distributed velocities scaled to each dimension's range.
//!
//! Per sweep and particle (in index order), with `r1, r2 ~ U[0, 1)` drawn
//! once per particle:
//!
//! ```text
//! v = w·v + c1·r1·(p_best − x) + c2·r2·(g_best − x)
//! x = clamp(x + v, bounds)
//! ```
//!
//! The initial evaluation sweep is not part of the history; every
//! subsequent sweep appends one record.

use super::{
    Best, Evaluations, Objective, Observer, Optimizer, check_problem, offer_best, random_position,
    seeded_rng,
};
use boost_common::config::ConfigError;
use boost_common::error::TuneError;
use boost_common::optimizer::{
    Bounds, FailurePolicy, GlobalBestUpdate, OptimizationResult, OptimizerConfig, PsoConfig,
};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, info};

/// Registry name.
pub const NAME: &str = "pso";

struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best: Best,
}

/// Particle swarm optimizer.
#[derive(Debug, Clone)]
pub struct Pso {
    config: PsoConfig,
    seed: Option<u64>,
    failure_policy: FailurePolicy,
}

impl Pso {
    pub fn new(config: PsoConfig, seed: Option<u64>, failure_policy: FailurePolicy) -> Self {
        Self {
            config,
            seed,
            failure_policy,
        }
    }
}

/// Registry factory.
pub fn create(config: &OptimizerConfig) -> Result<Box<dyn Optimizer>, ConfigError> {
    config.pso.validate()?;
    Ok(Box::new(Pso::new(
        config.pso.clone(),
        config.seed,
        config.failure_policy,
    )))
}

impl Optimizer for Pso {
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
        let mut rng = seeded_rng(self.seed);
        let mut evals = Evaluations::new(objective, self.failure_policy, observer);

        info!(
            swarm_size = cfg.swarm_size,
            max_iterations = cfg.max_iterations,
            dims = bounds.dims(),
            "pso start"
        );

        // ── Initial swarm ───────────────────────────────────────
        let mut particles = Vec::with_capacity(cfg.swarm_size);
        let mut global: Option<Best> = None;
        for i in 0..cfg.swarm_size {
            let position = if i + 1 == cfg.swarm_size {
                initial.to_vec()
            } else {
                random_position(&mut rng, bounds)
            };
            let velocity: Vec<f64> = bounds
                .intervals()
                .iter()
                .map(|&(lo, hi)| {
                    rng.sample::<f64, _>(StandardNormal) * cfg.velocity_scale * (hi - lo)
                })
                .collect();
            let scored = evals.score(&position)?;
            offer_best(&mut global, &position, &scored);
            particles.push(Particle {
                best: Best::new(&position, &scored),
                position,
                velocity,
            });
        }
        let Some(mut global) = global else {
            return Err(ConfigError::ValidationError("empty swarm".into()).into());
        };
        debug!(best_score = global.score, "initial swarm evaluated");

        // ── Sweeps ──────────────────────────────────────────────
        for iteration in 1..=cfg.max_iterations {
            let leader = global.position.clone();
            let mut sweep_best = global.clone();

            for particle in &mut particles {
                let r1: f64 = rng.gen_range(0.0..1.0);
                let r2: f64 = rng.gen_range(0.0..1.0);
                let social = match cfg.global_best_update {
                    GlobalBestUpdate::Immediate => &global.position,
                    GlobalBestUpdate::Generational => &leader,
                };
                for d in 0..particle.position.len() {
                    let x = particle.position[d];
                    particle.velocity[d] = cfg.w * particle.velocity[d]
                        + cfg.c1 * r1 * (particle.best.position[d] - x)
                        + cfg.c2 * r2 * (social[d] - x);
                    particle.position[d] = x + particle.velocity[d];
                }
                bounds.clamp(&mut particle.position);

                let scored = evals.score(&particle.position)?;
                particle.best.offer(&particle.position, &scored);
                match cfg.global_best_update {
                    GlobalBestUpdate::Immediate => {
                        global.offer(&particle.position, &scored);
                    }
                    GlobalBestUpdate::Generational => {
                        sweep_best.offer(&particle.position, &scored);
                    }
                }
            }
            if cfg.global_best_update == GlobalBestUpdate::Generational {
                global = sweep_best;
            }

            debug!(iteration, best_score = global.score, "pso sweep");
            evals.complete_iteration(iteration, &global);
        }

        info!(best_score = global.score, "pso finished");
        Ok(evals.finish(NAME, global))
    }
}
