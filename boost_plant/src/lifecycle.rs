//! Lifecycle bookkeeping shared by the built-in plants.
//!
//! Tracks the phase of one simulator instance and rejects calls that arrive
//! out of order with `PlantError::Sequence`.

use boost_common::plant::PlantError;

/// Phase of a plant instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Created, `setup()` not yet called.
    #[default]
    Instantiated,
    /// After `setup()`: initial values may be written.
    Initializing,
    /// After `initialize()`: stepping allowed.
    Running,
    /// After `terminate()`: every call fails.
    Terminated,
}

/// Phase tracker with transition checks.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    phase: Phase,
    start_time: f64,
}

impl Lifecycle {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start time passed to `setup()`.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// `Instantiated -> Initializing`.
    pub fn setup(&mut self, start_time: f64) -> Result<(), PlantError> {
        self.expect(Phase::Instantiated, "setup")?;
        if !start_time.is_finite() {
            return Err(PlantError::Setup(format!(
                "start time must be finite, got {start_time}"
            )));
        }
        self.start_time = start_time;
        self.phase = Phase::Initializing;
        Ok(())
    }

    /// `Initializing -> Running`.
    pub fn initialize(&mut self) -> Result<(), PlantError> {
        self.expect(Phase::Initializing, "initialize")?;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Reads are valid while initializing or running.
    pub fn check_read(&self) -> Result<(), PlantError> {
        match self.phase {
            Phase::Initializing | Phase::Running => Ok(()),
            other => Err(out_of_order("read", other)),
        }
    }

    /// Writes are valid while initializing or running.
    pub fn check_write(&self) -> Result<(), PlantError> {
        match self.phase {
            Phase::Initializing | Phase::Running => Ok(()),
            other => Err(out_of_order("write", other)),
        }
    }

    /// Steps are valid only while running, with a positive finite `dt`.
    pub fn check_step(&self, time: f64, dt: f64) -> Result<(), PlantError> {
        self.expect(Phase::Running, "step")?;
        if !(dt.is_finite() && dt > 0.0) || !time.is_finite() {
            return Err(PlantError::Step {
                time,
                reason: format!("invalid step size {dt}"),
            });
        }
        Ok(())
    }

    /// Any phase except `Terminated` -> `Terminated`.
    pub fn terminate(&mut self) -> Result<(), PlantError> {
        if self.phase == Phase::Terminated {
            return Err(out_of_order("terminate", self.phase));
        }
        self.phase = Phase::Terminated;
        Ok(())
    }

    fn expect(&self, phase: Phase, op: &str) -> Result<(), PlantError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(out_of_order(op, self.phase))
        }
    }
}

fn out_of_order(op: &str, phase: Phase) -> PlantError {
    PlantError::Sequence(format!("{op}() called in phase {phase:?}"))
}
