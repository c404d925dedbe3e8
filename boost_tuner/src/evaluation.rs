//! Trajectory evaluation.
//!
//! Reduces a [`SimulationTrajectory`] to a scalar score (lower is better)
//! and per-segment diagnostics. The trajectory is split at the event time:
//! samples with `t < event` form the pre-event segment, the rest the
//! post-event segment. Pre-event times count from the first sample,
//! post-event times from the event.
//!
//! Per segment, with `e = (y - target) / target`:
//! - `overshoot = max(0, max e)`
//! - `settling_time` = first time with `|e| <= tolerance`, or `None`
//! - `integrated_error = Σ |e| * dt`
//!
//! The score is the weighted sum of the six segment metrics. A segment that
//! never settles contributes its whole duration as settling time.

use boost_common::config::ConfigError;
use boost_common::evaluation::{EvaluationMetrics, EvaluatorConfig, EvaluatorKind, SegmentMetrics};
use boost_common::simulation::{Sample, SimulationTrajectory};

/// Validated evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Validate `config` and build the evaluator it selects.
    pub fn new(config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Evaluator configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Score `trajectory`. Pure: equal inputs give equal outputs.
    pub fn evaluate(&self, trajectory: &SimulationTrajectory) -> EvaluationMetrics {
        match self.config.method {
            EvaluatorKind::SegmentedStep => self.segmented(trajectory),
        }
    }

    /// Like [`Evaluator::evaluate`], additionally reporting the final
    /// steady-state error.
    pub fn evaluate_run(&self, trajectory: &SimulationTrajectory) -> EvaluationMetrics {
        let mut metrics = self.evaluate(trajectory);
        metrics.steady_state_error = trajectory.samples().last().map(|s| {
            ((s.output - self.config.target_voltage) / self.config.target_voltage).abs()
        });
        metrics
    }

    /// Segment boundary for `trajectory`: configured, or mid-run.
    pub fn event_time(&self, trajectory: &SimulationTrajectory) -> f64 {
        if let Some(t) = self.config.event_time {
            return t;
        }
        match (trajectory.start_time(), trajectory.end_time()) {
            (Some(start), Some(end)) => start + (end - start) / 2.0,
            _ => 0.0,
        }
    }

    fn segmented(&self, trajectory: &SimulationTrajectory) -> EvaluationMetrics {
        let event = self.event_time(trajectory);
        let samples = trajectory.samples();
        let split = samples.partition_point(|s| s.time < event);
        let (pre, post) = samples.split_at(split);

        let dt = trajectory.step_size();
        let pre_origin = pre.first().map_or(event, |s| s.time);
        let pre_event = self.segment(pre, pre_origin, dt);
        let post_event = self.segment(post, event, dt);

        let w = &self.config.weights;
        let score = w.settling_time * pre_event.scored_settling_time()
            + w.overshoot * pre_event.overshoot
            + w.integrated_error * pre_event.integrated_error
            + w.post_settling_time * post_event.scored_settling_time()
            + w.post_overshoot * post_event.overshoot
            + w.post_integrated_error * post_event.integrated_error;

        EvaluationMetrics {
            score,
            pre_event,
            post_event,
            steady_state_error: None,
        }
    }

    fn segment(&self, samples: &[Sample], origin: f64, dt: f64) -> SegmentMetrics {
        let target = self.config.target_voltage;
        let tolerance = self.config.settling_tolerance;

        let mut metrics = SegmentMetrics {
            duration: samples.len() as f64 * dt,
            ..SegmentMetrics::default()
        };
        for s in samples {
            let e = (s.output - target) / target;
            if metrics.settling_time.is_none() && e.abs() <= tolerance {
                metrics.settling_time = Some(s.time - origin);
            }
            metrics.overshoot = metrics.overshoot.max(e);
            metrics.integrated_error += e.abs() * dt;
        }
        metrics
    }
}
