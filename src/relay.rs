// Time-proportions the PID output into an on/off relay signal
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

use log::debug;
use num_traits::float::FloatCore;

use crate::pid::{secs, ControlLoop, PidConfig, PidController};
use crate::time::{Clock, InstantLike};

/// A PID controller driving an on/off actuator through software PWM.
///
/// The PID output is a duty fraction in [0, 1]. Each call to [`AutoPidRelay::run`] holds the
/// bound relay cell on for the first `duty * pulse_width` of every pulse cycle and off for the
/// rest. Pulse cycles are aligned to the time the relay controller was constructed.
///
/// ```rust
/// use core::cell::Cell;
/// use core::time::Duration;
/// use auto_pid::pid::PidConfig;
/// use auto_pid::relay::AutoPidRelay;
/// use auto_pid::time::{Millis, SimClock};
///
/// let clock = SimClock::new(Millis(0));
/// let (temperature, target, heater_on) = (Cell::new(60.0), Cell::new(60.5), Cell::new(false));
///
/// let mut relay = AutoPidRelay::new(
///     &temperature,
///     &target,
///     &heater_on,
///     Duration::from_millis(1000),
///     PidConfig::new(0.0, 0.0, 1.0, 0.0, 0.0),
///     &clock,
/// );
///
/// relay.run();
/// clock.advance(Duration::from_millis(1000));
/// relay.run();
/// assert_eq!(relay.pulse_value(), 0.5);
/// assert!(heater_on.get()); // first half of the cycle
///
/// clock.advance(Duration::from_millis(600));
/// relay.run();
/// assert!(!heater_on.get()); // second half of the cycle
/// ```
pub struct AutoPidRelay<'a, C: Clock, F> {
    input: &'a Cell<F>,
    setpoint: &'a Cell<F>,
    relay_state: &'a Cell<bool>,
    clock: C,
    controller: PidController<C::Instant, F>,
    pulse_width: Duration,
    pulse_value: F,
    pulse_origin: C::Instant,
    // Start of the current pulse cycle relative to `pulse_origin`, kept at full `Duration`
    // resolution since a pulse width need not be a whole number of clock ticks
    cycle_offset: Duration,
}

impl<'a, C: Clock, F: FloatCore> AutoPidRelay<'a, C, F> {
    /// Binds a stopped relay controller to its cells and clock.
    ///
    /// The output range of `config` is replaced by [0, 1] so the PID output is a duty fraction.
    /// The first pulse cycle starts now.
    pub fn new(
        input: &'a Cell<F>,
        setpoint: &'a Cell<F>,
        relay_state: &'a Cell<bool>,
        pulse_width: Duration,
        config: PidConfig<F>,
        clock: C,
    ) -> Self {
        let mut config = config;
        config.set_output_range(F::zero(), F::one());
        let pulse_origin = clock.now();
        Self {
            input,
            setpoint,
            relay_state,
            clock,
            controller: PidController::new(config),
            pulse_width,
            pulse_value: F::zero(),
            pulse_origin,
            cycle_offset: Duration::ZERO,
        }
    }

    /// Returns the unbound controller computing the duty fraction.
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

    /// Returns the length of one pulse cycle.
    pub fn pulse_width(&self) -> Duration {
        self.pulse_width
    }

    /// Changes the pulse cycle length. The current cycle keeps its start time.
    pub fn set_pulse_width(&mut self, pulse_width: Duration) {
        self.pulse_width = pulse_width;
    }

    /// Returns the start of the current pulse cycle, rounded to the resolution of the clock.
    pub fn pulse_start(&self) -> C::Instant {
        self.pulse_origin + self.cycle_offset
    }

    /// Returns the duty fraction, or zero while stopped so that "off" is distinguishable from a
    /// running controller asking for 0% duty.
    pub fn pulse_value(&self) -> F {
        if self.is_stopped() {
            F::zero()
        } else {
            self.pulse_value
        }
    }

    /// Replaces the gains, which now map error to duty fraction.
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) {
        self.config_mut().set_gains(kp, ki, kd);
    }

    /// Sets the bang-on and bang-off thresholds; zero disables either.
    pub fn set_bang_bang(&mut self, bang_on: F, bang_off: F) {
        self.config_mut().set_bang_bang(bang_on, bang_off);
    }

    /// Sets a symmetric bang-bang band: bang-on above `bang_range`, bang-off below it.
    pub fn set_bang_bang_range(&mut self, bang_range: F) {
        self.config_mut().set_bang_bang_range(bang_range);
    }

    /// Replaces the output limits, which bound the duty fraction. Limits outside [0, 1] make the
    /// relay saturate on or off for part of the range.
    pub fn set_output_range(&mut self, output_min: F, output_max: F) {
        self.config_mut().set_output_range(output_min, output_max);
    }

    /// Sets the minimum time between PID recalculations.
    pub fn set_time_step(&mut self, time_step: Duration) {
        self.config_mut().set_time_step(time_step);
    }

    /// Returns true iff the bound input is within `threshold` of the bound setpoint.
    pub fn at_set_point(&self, threshold: F) -> bool {
        self.controller
            .at_set_point(self.input.get(), self.setpoint.get(), threshold)
    }

    /// Performs one control step, then updates the relay cell from the position within the
    /// current pulse cycle.
    pub fn run(&mut self) {
        let now = self.clock.now();
        if let Some(duty) = self
            .controller
            .run(self.input.get(), self.setpoint.get(), now)
        {
            self.pulse_value = duty;
        }

        if self.pulse_width.is_zero() {
            self.relay_state.set(false);
            return;
        }

        let phase = self.advance_pulse_cycle(now);
        let on_time = self.pulse_value * secs::<F>(self.pulse_width);
        self.relay_state.set(secs::<F>(phase) < on_time);
    }

    /// Moves the cycle start forward by whole pulse widths until `now` falls inside the cycle,
    /// keeping the cycle phase aligned across long gaps between calls. Returns the phase of `now`
    /// within the current cycle.
    fn advance_pulse_cycle(&mut self, now: C::Instant) -> Duration {
        let phase = now
            .duration_since(self.pulse_origin)
            .saturating_sub(self.cycle_offset);
        if phase < self.pulse_width {
            return phase;
        }

        let width = self.pulse_width.as_nanos();
        let cycles = phase.as_nanos() / width;
        if cycles > 1 {
            debug!("relay skipped {} pulse cycles", cycles - 1);
        }
        let shift = Duration::from_nanos(u64::try_from(cycles * width).unwrap_or(u64::MAX));
        self.cycle_offset = self.cycle_offset.saturating_add(shift);
        phase.saturating_sub(shift)
    }

    /// Stops the controller. The relay cell keeps its last state until the next `run`.
    pub fn stop(&mut self) {
        let now = self.clock.now();
        self.controller.stop(now);
    }

    /// Clears the accumulated PID state. The pulse cycle keeps its phase.
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

impl<C: Clock, F: FloatCore> ControlLoop<F> for AutoPidRelay<'_, C, F> {
    fn run(&mut self) {
        AutoPidRelay::run(self);
    }

    fn stop(&mut self) {
        AutoPidRelay::stop(self);
    }

    fn reset(&mut self) {
        AutoPidRelay::reset(self);
    }

    fn is_stopped(&self) -> bool {
        AutoPidRelay::is_stopped(self)
    }

    fn at_set_point(&self, threshold: F) -> bool {
        AutoPidRelay::at_set_point(self, threshold)
    }

    fn output(&self) -> F {
        self.pulse_value
    }
}

impl<C: Clock, F: FloatCore + fmt::Debug> fmt::Debug for AutoPidRelay<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoPidRelay")
            .field("input", &self.input.get())
            .field("setpoint", &self.setpoint.get())
            .field("relay_state", &self.relay_state.get())
            .field("pulse_width", &self.pulse_width)
            .field("pulse_value", &self.pulse_value)
            .field("pulse_origin", &self.pulse_origin)
            .field("cycle_offset", &self.cycle_offset)
            .field("controller", &self.controller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Millis, SimClock};

    #[test]
    fn test_zero_pulse_width_holds_relay_off() {
        let clock = SimClock::new(Millis(0));
        let (input, setpoint, relay) = (Cell::new(0.0), Cell::new(1.0), Cell::new(true));
        let mut pid = AutoPidRelay::new(
            &input,
            &setpoint,
            &relay,
            Duration::ZERO,
            PidConfig::new(0.0, 1.0, 1.0, 0.0, 0.0),
            &clock,
        );

        pid.run();
        clock.advance(Duration::from_millis(1000));
        pid.run();
        assert_eq!(pid.pulse_value(), 1.0);
        assert!(!relay.get());
        assert_eq!(pid.pulse_start(), Millis(0));
    }

    #[test]
    fn test_cycle_start_catches_up_in_whole_widths() {
        let clock = SimClock::new(Millis(0));
        let (input, setpoint, relay) = (Cell::new(0.0), Cell::new(0.0), Cell::new(false));
        let mut pid = AutoPidRelay::new(
            &input,
            &setpoint,
            &relay,
            Duration::from_millis(300),
            PidConfig::new(0.0, 1.0, 1.0, 0.0, 0.0),
            &clock,
        );

        clock.set(Millis(1000));
        pid.run();
        assert_eq!(pid.pulse_start(), Millis(900));

        clock.set(Millis(1199));
        pid.run();
        assert_eq!(pid.pulse_start(), Millis(900));

        clock.set(Millis(1200));
        pid.run();
        assert_eq!(pid.pulse_start(), Millis(1200));
    }

    #[test]
    fn test_cycle_offset_keeps_sub_tick_widths() {
        let clock = SimClock::new(Millis(0));
        let (input, setpoint, relay) = (Cell::new(0.0), Cell::new(0.0), Cell::new(false));
        let mut pid = AutoPidRelay::new(
            &input,
            &setpoint,
            &relay,
            Duration::from_micros(1500),
            PidConfig::new(0.0, 1.0, 1.0, 0.0, 0.0),
            &clock,
        );

        clock.set(Millis(2));
        pid.run();
        assert_eq!(pid.cycle_offset, Duration::from_micros(1500));
        assert_eq!(pid.pulse_start(), Millis(1));

        clock.set(Millis(3));
        pid.run();
        assert_eq!(pid.cycle_offset, Duration::from_millis(3));

        clock.set(Millis(11));
        pid.run();
        assert_eq!(pid.cycle_offset, Duration::from_micros(10500));
    }
}
