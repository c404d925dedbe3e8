//! Progress observation and cancellation for optimizer runs.

use boost_common::optimizer::IterationRecord;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Hooks called by an optimizer while it runs.
///
/// `should_stop` is polled before every objective evaluation; returning
/// `true` ends the run with `TuneError::Cancelled`.
pub trait Observer {
    fn should_stop(&self) -> bool {
        false
    }

    /// Called after every objective evaluation with the (possibly
    /// penalized) score.
    fn on_evaluation(&mut self, _position: &[f64], _score: f64) {}

    /// Called after every completed sweep or generation.
    fn on_iteration(&mut self, _record: &IterationRecord) {}
}

/// Observer that never stops and ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Shared cancellation flag, settable from another thread or a signal
/// handler.
#[derive(Debug, Default, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Observer that logs each completed iteration and honors a [`StopFlag`].
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    stop: StopFlag,
}

impl ProgressLogger {
    pub fn new(stop: StopFlag) -> Self {
        Self { stop }
    }
}

impl Observer for ProgressLogger {
    fn should_stop(&self) -> bool {
        self.stop.is_cancelled()
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        info!(
            iteration = record.iteration,
            best_score = record.best_score,
            best_position = ?record.best_position,
            "iteration complete"
        );
    }
}
