//! PID controller in time-constant form with rectangular integration,
//! output clipping and optional conditional-integration anti-windup.
//!
//! `u = k * (e + xi/Ti + Td * de/dt)`, `xi = Σ e*dt`, clipped to
//! `[y_min, y_max]`. With `dt == 0` the derivative term is dropped.

use boost_common::error::NumericError;
use boost_common::params::{AntiWindup, PidParameters};

/// Internal state of one PID loop.
///
/// Preserves the integral accumulator and the previous error across steps.
/// Must be reset (via [`PidState::reset`]) before reusing a controller for a
/// new run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Integral accumulator `Σ e*dt`.
    pub integral: f64,
    /// Previous error (for derivative).
    pub prev_error: f64,
    /// Previous clipped output.
    pub prev_output: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Compute one PID step.
///
/// # Arguments
/// - `state`: Mutable PID state (integral, previous error and output).
/// - `params`: Validated loop parameters.
/// - `anti_windup`: Integrator strategy while clipped.
/// - `error`: Tracking error (reference − measurement).
/// - `dt`: Step size [s], `>= 0`.
///
/// # Returns
/// Clipped output. State is only committed when the result is finite.
///
/// # Errors
/// `NumericError::NonFinite` for a non-finite `error`, `dt` or output;
/// `NumericError::NonPositive` for a negative `dt`.
#[inline]
pub fn pid_compute(
    state: &mut PidState,
    params: &PidParameters,
    anti_windup: AntiWindup,
    error: f64,
    dt: f64,
) -> Result<f64, NumericError> {
    if !dt.is_finite() {
        return Err(NumericError::non_finite("dt"));
    }
    if dt < 0.0 {
        return Err(NumericError::non_positive("dt", dt));
    }
    if !error.is_finite() {
        return Err(NumericError::non_finite("error"));
    }

    // ── I term (rectangular) ────────────────────────────────
    let mut integral = state.integral + error * dt;

    // ── D term (unfiltered, skipped when dt == 0) ───────────
    let derivative = if dt > 0.0 {
        (error - state.prev_error) / dt
    } else {
        0.0
    };

    let raw = params.k * (error + integral / params.ti + params.td * derivative);
    if !raw.is_finite() {
        return Err(NumericError::non_finite("output"));
    }
    let output = raw.clamp(params.y_min, params.y_max);

    // ── Anti-windup (conditional integration) ───────────────
    if anti_windup == AntiWindup::Conditional
        && (output == params.y_min || output == params.y_max)
    {
        integral -= error * dt;
    }

    state.integral = integral;
    state.prev_error = error;
    state.prev_output = output;
    Ok(output)
}

/// Single-loop PID controller: validated parameters plus state.
#[derive(Debug, Clone, PartialEq)]
pub struct Pid {
    params: PidParameters,
    anti_windup: AntiWindup,
    state: PidState,
}

impl Pid {
    /// Build a controller with zeroed state.
    ///
    /// # Errors
    /// Any [`NumericError`] from [`PidParameters::validate`].
    pub fn new(params: PidParameters, anti_windup: AntiWindup) -> Result<Self, NumericError> {
        params.validate()?;
        Ok(Self {
            params,
            anti_windup,
            state: PidState::default(),
        })
    }

    /// Advance one step on `error`.
    #[inline]
    pub fn update(&mut self, error: f64, dt: f64) -> Result<f64, NumericError> {
        pid_compute(&mut self.state, &self.params, self.anti_windup, error, dt)
    }

    /// Zero the state; the controller is then equivalent to a fresh one.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn params(&self) -> &PidParameters {
        &self.params
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
