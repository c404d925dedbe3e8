//! Workspace-wide constants.
//!
//! Single source of truth for defaults and limits. Config structs reference
//! these through `#[serde(default = ...)]` helpers; no duplication permitted.

// ─── Plant Signals ──────────────────────────────────────────────────

/// Default name of the primary sensed output (converter output voltage).
pub const DEFAULT_OUTPUT_SIGNAL: &str = "voltageSensor.v";

/// Default name of the secondary sensed quantity (inductor current).
pub const DEFAULT_SECONDARY_SIGNAL: &str = "currentSensor.i";

/// Default name of the actuation input (duty cycle).
pub const DEFAULT_ACTUATION_SIGNAL: &str = "const3.k";

/// The three default signal names, as exposed by the built-in plants.
pub const DEFAULT_SIGNALS: [&str; 3] = [
    DEFAULT_OUTPUT_SIGNAL,
    DEFAULT_SECONDARY_SIGNAL,
    DEFAULT_ACTUATION_SIGNAL,
];

// ─── Controller ─────────────────────────────────────────────────────

/// Namespace prefix of the outer (voltage) loop parameters.
pub const OUTER_LOOP_PREFIX: &str = "voltage_";

/// Namespace prefix of the inner (current) loop parameters.
pub const INNER_LOOP_PREFIX: &str = "current_";

/// Suffixes every PID parameter namespace must provide, in validation order.
pub const PID_PARAMETER_SUFFIXES: [&str; 5] = ["k", "Ti", "Td", "y_max", "y_min"];

// ─── Simulation ─────────────────────────────────────────────────────

/// Default simulation start time [s].
pub const DEFAULT_START_TIME: f64 = 0.0;

/// Tolerance added to `simulation_time / step_size` before flooring, so that
/// e.g. `1.0 / 0.0001` yields 10000 steps rather than 9999.
pub const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Upper limit on `simulation_time / step_size`; one trajectory sample is
/// stored per step.
pub const MAX_STEP_COUNT: usize = 10_000_000;

// ─── Evaluation ─────────────────────────────────────────────────────

/// Default settling band, relative to target (2 %).
pub const DEFAULT_SETTLING_TOLERANCE: f64 = 0.02;

// ─── Optimization ───────────────────────────────────────────────────

/// Score assigned to a candidate whose evaluation failed under the
/// `penalize` failure policy.
pub const PENALTY_SCORE: f64 = f64::MAX;

/// Parameter keys tuned when `[search].parameters` is omitted.
pub const DEFAULT_TUNED_PARAMETERS: [&str; 4] =
    ["voltage_k", "voltage_Ti", "current_k", "current_Ti"];

/// Default optimization algorithm.
pub const DEFAULT_ALGORITHM: &str = "pso";

/// Default PSO swarm size.
pub const DEFAULT_SWARM_SIZE: usize = 10;

/// Default PSO iteration count.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default PSO inertia weight.
pub const DEFAULT_INERTIA: f64 = 0.5;

/// Default PSO cognitive coefficient.
pub const DEFAULT_COGNITIVE: f64 = 1.5;

/// Default PSO social coefficient.
pub const DEFAULT_SOCIAL: f64 = 1.5;

/// Default initial velocity spread, as a fraction of each dimension's range.
pub const DEFAULT_VELOCITY_SCALE: f64 = 0.001;

/// Default GA population size.
pub const DEFAULT_POPULATION_SIZE: usize = 10;

/// Default GA generation count.
pub const DEFAULT_MAX_GENERATIONS: usize = 100;

/// Default GA per-gene mutation probability.
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// Default GA tournament size.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(DEFAULT_SETTLING_TOLERANCE > 0.0 && DEFAULT_SETTLING_TOLERANCE < 1.0);
        assert!(DEFAULT_SWARM_SIZE >= 1);
        assert!(DEFAULT_POPULATION_SIZE >= 2);
        assert!(DEFAULT_TOURNAMENT_SIZE >= 1);
        assert!((0.0..=1.0).contains(&DEFAULT_MUTATION_RATE));
        assert!(DEFAULT_VELOCITY_SCALE > 0.0);
    }

    #[test]
    fn prefixes_are_distinct() {
        assert_ne!(OUTER_LOOP_PREFIX, INNER_LOOP_PREFIX);
        assert!(OUTER_LOOP_PREFIX.ends_with('_'));
        assert!(INNER_LOOP_PREFIX.ends_with('_'));
    }
}
