// Implements the time-stepped PID controller with bang-bang override
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::cell::Cell;
use core::fmt;
use core::time::Duration;

use log::{debug, trace};
use num_traits::float::FloatCore;

use crate::time::{Clock, InstantLike};

/// Default minimum interval between two PID recalculations.
pub const DEFAULT_TIME_STEP: Duration = Duration::from_millis(1000);

/// Converts a duration to seconds in the controller's numeric type.
pub(crate) fn secs<F: FloatCore>(duration: Duration) -> F {
    num_traits::cast(duration.as_secs_f64()).unwrap_or_else(F::zero)
}

/// Maps the "zero means disabled" convention of bang-bang thresholds onto `Option`.
fn threshold<F: FloatCore>(value: F) -> Option<F> {
    if value == F::zero() {
        None
    } else {
        Some(value)
    }
}

/// Errors reported by [`PidConfigBuilder::build`].
///
/// Only the builder validates. The setters on [`PidConfig`] and on the bound controllers accept
/// any value and leave consistency to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidConfigError {
    /// Kp is NaN or infinite.
    #[cfg_attr(feature = "std", error("proportional gain must be finite"))]
    InvalidProportionalGain,
    /// Ki is NaN or infinite.
    #[cfg_attr(feature = "std", error("integral gain must be finite"))]
    InvalidIntegralGain,
    /// Kd is NaN or infinite.
    #[cfg_attr(feature = "std", error("derivative gain must be finite"))]
    InvalidDerivativeGain,
    /// Either output limit is NaN, or the minimum exceeds the maximum.
    #[cfg_attr(
        feature = "std",
        error("output limits must not be NaN and the minimum must not exceed the maximum")
    )]
    InvalidOutputLimits,
    /// A bang-bang threshold is negative, NaN or infinite.
    #[cfg_attr(
        feature = "std",
        error("bang-bang thresholds must be finite and non-negative")
    )]
    InvalidBangBangThreshold,
    /// The time step is zero.
    #[cfg_attr(feature = "std", error("time step must be greater than zero"))]
    InvalidTimeStep,
}

#[cfg(not(feature = "std"))]
impl fmt::Display for PidConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PidConfigError::InvalidProportionalGain => "proportional gain must be finite",
            PidConfigError::InvalidIntegralGain => "integral gain must be finite",
            PidConfigError::InvalidDerivativeGain => "derivative gain must be finite",
            PidConfigError::InvalidOutputLimits => {
                "output limits must not be NaN and the minimum must not exceed the maximum"
            }
            PidConfigError::InvalidBangBangThreshold => {
                "bang-bang thresholds must be finite and non-negative"
            }
            PidConfigError::InvalidTimeStep => "time step must be greater than zero",
        };
        f.write_str(msg)
    }
}

/// Tuning and timing parameters of a PID controller.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidConfig<F> {
    /// Proportional gain coefficient.
    /// Defaults to 1.0.
    kp: F,

    /// Integral gain coefficient, applied per second of elapsed time.
    /// Defaults to 0.0.
    ki: F,

    /// Derivative gain coefficient, applied to the error rate per second.
    /// Defaults to 0.0.
    kd: F,

    /// Minimum output value.
    /// Defaults to negative infinity, i.e. no limit.
    output_min: F,

    /// Maximum output value.
    /// Defaults to positive infinity, i.e. no limit.
    output_max: F,

    /// Absolute error above which the output is driven to a limit.
    /// Defaults to None, i.e. disabled.
    bang_on: Option<F>,

    /// Absolute error below which the output is driven to zero.
    /// Defaults to None, i.e. disabled.
    bang_off: Option<F>,

    /// Minimum elapsed time between PID recalculations.
    /// Defaults to 1000ms.
    time_step: Duration,
}

impl<F: FloatCore> Default for PidConfig<F> {
    fn default() -> Self {
        PidConfig {
            kp: F::one(),
            ki: F::zero(),
            kd: F::zero(),
            output_min: F::neg_infinity(),
            output_max: F::infinity(),
            bang_on: None,
            bang_off: None,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl<F: FloatCore> PidConfig<F> {
    /// Creates a configuration from output bounds and initial gains, with bang-bang disabled and
    /// the default time step.
    pub fn new(output_min: F, output_max: F, kp: F, ki: F, kd: F) -> Self {
        PidConfig {
            kp,
            ki,
            kd,
            output_min,
            output_max,
            ..Default::default()
        }
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> F {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> F {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> F {
        self.kd
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (F, F, F) {
        (self.kp, self.ki, self.kd)
    }

    /// Returns the minimum output limit.
    pub fn output_min(&self) -> F {
        self.output_min
    }

    /// Returns the maximum output limit.
    pub fn output_max(&self) -> F {
        self.output_max
    }

    /// Returns the bang-on threshold, or `None` if that branch is disabled.
    pub fn bang_on(&self) -> Option<F> {
        self.bang_on
    }

    /// Returns the bang-off threshold, or `None` if that branch is disabled.
    pub fn bang_off(&self) -> Option<F> {
        self.bang_off
    }

    /// Returns the minimum interval between PID recalculations.
    pub fn time_step(&self) -> Duration {
        self.time_step
    }

    /// Replaces all three gains. Takes effect on the next recalculation.
    ///
    /// The accumulated integral is NOT rescaled when `ki` changes: it already carries the gain
    /// that was in effect when each error sample was integrated.
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Sets independent bang-bang thresholds. A zero threshold disables its branch.
    pub fn set_bang_bang(&mut self, bang_on: F, bang_off: F) {
        self.bang_on = threshold(bang_on);
        self.bang_off = threshold(bang_off);
    }

    /// Sets the same threshold for both bang-bang branches.
    pub fn set_bang_bang_range(&mut self, bang_range: F) {
        self.set_bang_bang(bang_range, bang_range);
    }

    /// Replaces the output limits. `output_min <= output_max` is the caller's responsibility.
    pub fn set_output_range(&mut self, output_min: F, output_max: F) {
        self.output_min = output_min;
        self.output_max = output_max;
    }

    /// Sets the minimum interval between PID recalculations. The bang-bang branches are not
    /// rate-limited and ignore this setting.
    pub fn set_time_step(&mut self, time_step: Duration) {
        self.time_step = time_step;
    }

    /// Clamps `value` to the output limits.
    ///
    /// The lower bound is applied first, so inverted limits resolve to `output_max`.
    fn clamp(&self, value: F) -> F {
        let mut value = value;
        if value < self.output_min {
            value = self.output_min;
        }
        if value > self.output_max {
            value = self.output_max;
        }
        value
    }
}

/// Builder for a validated [`PidConfig`].
///
/// ```rust
/// use core::time::Duration;
/// use auto_pid::pid::{PidConfigBuilder, PidConfigError};
///
/// let config = PidConfigBuilder::default()
///     .gains(2.0, 0.5, 0.1)
///     .output_range(0.0, 255.0)
///     .bang_bang(40.0, 0.0)
///     .time_step(Duration::from_millis(100))
///     .build()
///     .expect("Invalid PID config");
/// assert_eq!(config.bang_on(), Some(40.0));
/// assert_eq!(config.bang_off(), None);
///
/// let invalid = PidConfigBuilder::default().output_range(1.0, -1.0).build();
/// assert_eq!(invalid.map(|_| ()), Err(PidConfigError::InvalidOutputLimits));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct PidConfigBuilder<F> {
    config: PidConfig<F>,
    // Bang thresholds are kept raw so `build` can reject negative values before they are
    // folded into `Option`s.
    bang_on: F,
    bang_off: F,
}

impl<F: FloatCore> Default for PidConfigBuilder<F> {
    fn default() -> Self {
        PidConfigBuilder {
            config: PidConfig::default(),
            bang_on: F::zero(),
            bang_off: F::zero(),
        }
    }
}

impl<F: FloatCore> PidConfigBuilder<F> {
    /// Sets the proportional gain.
    pub fn kp(mut self, kp: F) -> Self {
        self.config.kp = kp;
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: F) -> Self {
        self.config.ki = ki;
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: F) -> Self {
        self.config.kd = kd;
        self
    }

    /// Sets all three gains.
    pub fn gains(self, kp: F, ki: F, kd: F) -> Self {
        self.kp(kp).ki(ki).kd(kd)
    }

    /// Sets the output limits.
    pub fn output_range(mut self, output_min: F, output_max: F) -> Self {
        self.config.output_min = output_min;
        self.config.output_max = output_max;
        self
    }

    /// Sets independent bang-bang thresholds; zero disables a branch.
    pub fn bang_bang(mut self, bang_on: F, bang_off: F) -> Self {
        self.bang_on = bang_on;
        self.bang_off = bang_off;
        self
    }

    /// Sets the same threshold for both bang-bang branches.
    pub fn bang_bang_range(self, bang_range: F) -> Self {
        self.bang_bang(bang_range, bang_range)
    }

    /// Sets the minimum interval between PID recalculations.
    pub fn time_step(mut self, time_step: Duration) -> Self {
        self.config.time_step = time_step;
        self
    }

    /// Validates the parameters and produces the configuration.
    pub fn build(self) -> Result<PidConfig<F>, PidConfigError> {
        let mut config = self.config;
        if !config.kp.is_finite() {
            return Err(PidConfigError::InvalidProportionalGain);
        }
        if !config.ki.is_finite() {
            return Err(PidConfigError::InvalidIntegralGain);
        }
        if !config.kd.is_finite() {
            return Err(PidConfigError::InvalidDerivativeGain);
        }
        if config.output_min.is_nan()
            || config.output_max.is_nan()
            || config.output_min > config.output_max
        {
            return Err(PidConfigError::InvalidOutputLimits);
        }
        let valid_threshold = |t: F| t.is_finite() && t >= F::zero();
        if !valid_threshold(self.bang_on) || !valid_threshold(self.bang_off) {
            return Err(PidConfigError::InvalidBangBangThreshold);
        }
        if config.time_step.is_zero() {
            return Err(PidConfigError::InvalidTimeStep);
        }
        config.set_bang_bang(self.bang_on, self.bang_off);
        Ok(config)
    }
}

/// The branch of the control law taken by the most recent call to `run`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// Not controlling. The initial state, and the state after `stop`.
    Stopped,
    /// Continuous PID control, possibly waiting for the time step to elapse.
    Pid,
    /// Error above the bang-on threshold; output held at a limit.
    BangOn,
    /// Error below the bang-off threshold; output held at zero.
    BangOff,
}

/// The PID state machine, unbound from any external cells.
///
/// Inputs and the current time are passed explicitly to [`PidController::run`], which returns
/// the new output or `None` when the output should stay unchanged. [`AutoPid`] and
/// [`crate::relay::AutoPidRelay`] layer cell bindings and a clock on top of this type.
#[derive(Copy, Clone, Debug)]
pub struct PidController<I: InstantLike, F> {
    config: PidConfig<F>,
    integral: F,
    previous_error: F,
    last_step: Option<I>,
    mode: ControlMode,
}

impl<I: InstantLike, F: FloatCore> PidController<I, F> {
    /// Creates a stopped controller. Its state is initialized by the first call to `run`.
    pub fn new(config: PidConfig<F>) -> Self {
        Self {
            config,
            integral: F::zero(),
            previous_error: F::zero(),
            last_step: None,
            mode: ControlMode::Stopped,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        &self.config
    }

    /// Returns the configuration for in-place tuning. Changes apply from the next `run`.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        &mut self.config
    }

    /// Returns the accumulated integral term, which already includes the integral gain.
    pub fn integral(&self) -> F {
        self.integral
    }

    /// Overrides the accumulated integral term, e.g. to seed a bumpless transfer.
    pub fn set_integral(&mut self, integral: F) {
        self.integral = integral;
    }

    /// Returns the error of the last PID recalculation, zero after a reset.
    pub fn previous_error(&self) -> F {
        self.previous_error
    }

    /// Returns the time of the last PID recalculation or reset, `None` before the first `run`.
    pub fn last_step(&self) -> Option<I> {
        self.last_step
    }

    /// Returns the branch taken by the last `run`, or [`ControlMode::Stopped`].
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Returns true until the first `run` and after `stop`.
    pub fn is_stopped(&self) -> bool {
        self.mode == ControlMode::Stopped
    }

    /// Returns true iff `|setpoint - input| <= threshold`.
    pub fn at_set_point(&self, input: F, setpoint: F, threshold: F) -> bool {
        (setpoint - input).abs() <= threshold
    }

    /// Performs one control step.
    ///
    /// A stopped controller starts running and resets first. Bang-bang branches are evaluated on
    /// every call and take priority; the PID branch recalculates only once the time step has
    /// elapsed since the last recalculation or reset.
    ///
    /// # Returns
    /// - `Some(output)` if the output changes on this call.
    /// - `None` if the PID branch skipped this call, i.e. the output is left as it was.
    pub fn run(&mut self, input: F, setpoint: F, now: I) -> Option<F> {
        if self.is_stopped() {
            self.reset(now);
        }

        let error = setpoint - input;
        let abs_error = error.abs();

        if self.config.bang_on.map_or(false, |on| abs_error > on) {
            self.enter(ControlMode::BangOn);
            self.reset(now);
            return Some(if error > F::zero() {
                self.config.output_max
            } else {
                self.config.output_min
            });
        }

        if self.config.bang_off.map_or(false, |off| abs_error < off) {
            self.enter(ControlMode::BangOff);
            self.reset(now);
            return Some(F::zero());
        }

        self.enter(ControlMode::Pid);

        // `last_step` is always set here since a stopped controller was reset above
        let elapsed = self
            .last_step
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        if elapsed < self.config.time_step {
            return None;
        }
        trace!("PID recalculation after {:?}", elapsed);

        self.last_step = Some(now);
        let dt: F = secs(elapsed);

        self.integral = self.integral + error * self.config.ki * dt;
        // Only reachable with a zero time step
        let derivative = if dt > F::zero() {
            (error - self.previous_error) / dt
        } else {
            F::zero()
        };
        self.previous_error = error;

        let output = self.config.kp * error + self.integral + self.config.kd * derivative;
        Some(self.config.clamp(output))
    }

    /// Stops the controller and clears its accumulated state. The next `run` restarts it.
    pub fn stop(&mut self, now: I) {
        self.enter(ControlMode::Stopped);
        self.reset(now);
    }

    /// Clears the integral and previous error, and restarts the time step window at `now`.
    pub fn reset(&mut self, now: I) {
        self.last_step = Some(now);
        self.integral = F::zero();
        self.previous_error = F::zero();
    }

    fn enter(&mut self, mode: ControlMode) {
        if self.mode != mode {
            debug!("control mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

/// Capabilities shared by the bound controllers [`AutoPid`] and
/// [`crate::relay::AutoPidRelay`], so a host control loop can drive either.
pub trait ControlLoop<F> {
    /// Performs one control step, writing to the bound output cells.
    fn run(&mut self);

    /// Stops the controller and clears its accumulated state.
    fn stop(&mut self);

    /// Clears the accumulated state without stopping.
    fn reset(&mut self);

    /// Returns whether the controller is stopped.
    fn is_stopped(&self) -> bool;

    /// Returns true iff the bound input is within `threshold` of the bound setpoint.
    fn at_set_point(&self, threshold: F) -> bool;

    /// Returns the continuous output most recently produced by the controller.
    fn output(&self) -> F;
}

/// A PID controller bound to externally owned input, setpoint and output cells.
///
/// The cells are borrowed for the lifetime `'a` of the controller; the host keeps ownership and
/// may update `input` and `setpoint` between calls to [`AutoPid::run`], which reads them and
/// writes `output`. Time is read from the injected [`Clock`].
///
/// ```rust
/// use core::cell::Cell;
/// use core::time::Duration;
/// use auto_pid::pid::{AutoPid, PidConfig};
/// use auto_pid::time::{Millis, SimClock};
///
/// let clock = SimClock::new(Millis(0));
/// let (temperature, target, heater) = (Cell::new(20.0), Cell::new(70.0), Cell::new(0.0));
///
/// let mut pid = AutoPid::new(
///     &temperature,
///     &target,
///     &heater,
///     PidConfig::new(0.0, 255.0, 2.0, 0.0, 0.0),
///     &clock,
/// );
///
/// pid.run(); // starts the controller
/// clock.advance(Duration::from_millis(1000));
/// pid.run(); // one time step later, the PID output is computed
/// assert_eq!(heater.get(), 100.0);
/// ```
pub struct AutoPid<'a, C: Clock, F> {
    input: &'a Cell<F>,
    setpoint: &'a Cell<F>,
    output: &'a Cell<F>,
    clock: C,
    controller: PidController<C::Instant, F>,
}

impl<'a, C: Clock, F: FloatCore> AutoPid<'a, C, F> {
    /// Binds a stopped controller to its cells and clock.
    pub fn new(
        input: &'a Cell<F>,
        setpoint: &'a Cell<F>,
        output: &'a Cell<F>,
        config: PidConfig<F>,
        clock: C,
    ) -> Self {
        Self {
            input,
            setpoint,
            output,
            clock,
            controller: PidController::new(config),
        }
    }

    /// Returns the unbound controller this one drives.
    pub fn controller(&self) -> &PidController<C::Instant, F> {
        &self.controller
    }

    /// Returns the unbound controller mutably.
    pub fn controller_mut(&mut self) -> &mut PidController<C::Instant, F> {
        &mut self.controller
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        self.controller.config()
    }

    /// Returns the configuration for in-place tuning.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        self.controller.config_mut()
    }

    /// Returns the injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// See [`PidConfig::set_gains`].
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) {
        self.config_mut().set_gains(kp, ki, kd);
    }

    /// See [`PidConfig::set_bang_bang`].
    pub fn set_bang_bang(&mut self, bang_on: F, bang_off: F) {
        self.config_mut().set_bang_bang(bang_on, bang_off);
    }

    /// See [`PidConfig::set_bang_bang_range`].
    pub fn set_bang_bang_range(&mut self, bang_range: F) {
        self.config_mut().set_bang_bang_range(bang_range);
    }

    /// See [`PidConfig::set_output_range`].
    pub fn set_output_range(&mut self, output_min: F, output_max: F) {
        self.config_mut().set_output_range(output_min, output_max);
    }

    /// See [`PidConfig::set_time_step`].
    pub fn set_time_step(&mut self, time_step: Duration) {
        self.config_mut().set_time_step(time_step);
    }

    /// Returns true iff the bound input is within `threshold` of the bound setpoint.
    pub fn at_set_point(&self, threshold: F) -> bool {
        self.controller
            .at_set_point(self.input.get(), self.setpoint.get(), threshold)
    }

    /// Performs one control step and writes the output cell if the output changed.
    pub fn run(&mut self) {
        let now = self.clock.now();
        if let Some(output) = self
            .controller
            .run(self.input.get(), self.setpoint.get(), now)
        {
            self.output.set(output);
        }
    }

    /// Stops the controller. The output cell keeps its last value.
    pub fn stop(&mut self) {
        let now = self.clock.now();
        self.controller.stop(now);
    }

    /// Clears the accumulated state and restarts the time step window now.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.controller.reset(now);
    }

    /// Returns true until the first `run` and after `stop`.
    pub fn is_stopped(&self) -> bool {
        self.controller.is_stopped()
    }

    /// Returns the accumulated integral term.
    pub fn integral(&self) -> F {
        self.controller.integral()
    }

    /// Overrides the accumulated integral term.
    pub fn set_integral(&mut self, integral: F) {
        self.controller.set_integral(integral);
    }
}

impl<C: Clock, F: FloatCore> ControlLoop<F> for AutoPid<'_, C, F> {
    fn run(&mut self) {
        AutoPid::run(self);
    }

    fn stop(&mut self) {
        AutoPid::stop(self);
    }

    fn reset(&mut self) {
        AutoPid::reset(self);
    }

    fn is_stopped(&self) -> bool {
        AutoPid::is_stopped(self)
    }

    fn at_set_point(&self, threshold: F) -> bool {
        AutoPid::at_set_point(self, threshold)
    }

    fn output(&self) -> F {
        self.output.get()
    }
}

impl<C: Clock, F: FloatCore + fmt::Debug> fmt::Debug for AutoPid<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoPid")
            .field("input", &self.input.get())
            .field("setpoint", &self.setpoint.get())
            .field("output", &self.output.get())
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Millis;

    #[test]
    fn test_inverted_limits_resolve_to_max() {
        let mut config = PidConfig::<f64>::default();
        config.set_output_range(10.0, -10.0);
        assert_eq!(config.clamp(0.0), -10.0);
        assert_eq!(config.clamp(20.0), -10.0);
    }

    #[test]
    fn test_zero_time_step_skips_derivative() {
        let mut config = PidConfig::new(-100.0, 100.0, 1.0, 1.0, 1.0);
        config.set_time_step(Duration::ZERO);
        let mut pid = PidController::<Millis, f64>::new(config);

        // dT is zero on the first call: no integral, no derivative, just P
        assert_eq!(pid.run(0.0, 5.0, Millis(0)), Some(5.0));
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.previous_error(), 5.0);

        // Same instant again stays finite
        let output = pid.run(0.0, 6.0, Millis(0));
        assert_eq!(output, Some(6.0));
    }

    #[test]
    fn test_mode_follows_branch() {
        let mut config = PidConfig::new(-100.0, 100.0, 1.0, 0.0, 0.0);
        config.set_bang_bang(10.0, 1.0);
        let mut pid = PidController::<Millis, f64>::new(config);
        assert_eq!(pid.mode(), ControlMode::Stopped);

        pid.run(0.0, 50.0, Millis(0));
        assert_eq!(pid.mode(), ControlMode::BangOn);

        pid.run(0.0, 5.0, Millis(10));
        assert_eq!(pid.mode(), ControlMode::Pid);

        pid.run(0.0, 0.5, Millis(20));
        assert_eq!(pid.mode(), ControlMode::BangOff);

        pid.stop(Millis(30));
        assert_eq!(pid.mode(), ControlMode::Stopped);
    }
}
