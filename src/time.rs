// Defines traits for time-like objects and time sources, and provides several implementations
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
use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

/// A trait for time-like objects that can be used to measure elapsed time.
///
/// The controllers use this trait to gate PID recalculations on the configured time step and to
/// track the phase of the relay pulse cycle.
pub trait InstantLike:
    Sized + Add<Duration, Output = Self> + Clone + Copy + Debug + PartialEq<Self>
{
    /// Returns the amount of time elapsed from another instant to this one.
    ///
    /// Time sources are expected to be monotonic. If `earlier` is in fact later than `self`, the
    /// result saturates to zero.
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A wrapper around an unsigned 64-bit integer representing milliseconds, the unit of the typical
/// embedded `millis()` tick counter.
///
/// Adding a [`Duration`] truncates it to whole ticks and saturates at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(
            self.0
                .saturating_add(u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX)),
        )
    }
}

/// Like [`Millis`], for microsecond tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Micros(pub u64);

impl InstantLike for Micros {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Micros {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Micros(
            self.0
                .saturating_add(u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX)),
        )
    }
}

/// Floating-point seconds, e.g. from a simulator.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct TimeF64(pub f64); // seconds since an arbitrary epoch

impl InstantLike for TimeF64 {
    fn duration_since(&self, earlier: Self) -> Duration {
        let secs = self.0 - earlier.0;
        if secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO // saturate, also catches NaN
        }
    }
}

impl Add<Duration> for TimeF64 {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        TimeF64(self.0 + rhs.as_secs_f64())
    }
}

impl TimeF64 {
    /// Constructs a new TimeF64 from raw seconds.
    pub fn from_secs(secs: f64) -> Self {
        TimeF64(secs)
    }

    /// Returns the underlying seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }
}

/// A source of monotonic time, injected into the bound controllers.
///
/// Implementations exist for the simulated [`SimClock`], the host's [`StdClock`], shared
/// references to any clock, and any `Fn() -> I` closure through [`FnClock`].
pub trait Clock {
    /// The instant type produced by this clock.
    type Instant: InstantLike;

    /// Reads the current time.
    fn now(&self) -> Self::Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }
}

/// Adapts a closure into a [`Clock`], so an embedded target can pass its tick counter directly:
///
/// ```rust
/// use auto_pid::time::{Clock, FnClock, Millis};
///
/// fn millis() -> u64 {
///     42
/// }
///
/// let clock = FnClock(|| Millis(millis()));
/// assert_eq!(clock.now(), Millis(42));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnClock<F>(pub F);

impl<I, F> Clock for FnClock<F>
where
    I: InstantLike,
    F: Fn() -> I,
{
    type Instant = I;

    fn now(&self) -> I {
        (self.0)()
    }
}

/// A deterministic, manually advanced clock counting milliseconds.
///
/// The clock uses interior mutability, so a test can hand `&SimClock` to a controller and keep
/// advancing time through its own shared reference.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<Millis>,
}

impl SimClock {
    /// Creates a clock reading `start`.
    pub const fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    /// Jumps the clock to `instant`. Jumping backwards is allowed but makes elapsed times
    /// saturate at zero.
    pub fn set(&self, instant: Millis) {
        self.now.set(instant);
    }
}

impl Clock for SimClock {
    type Instant = Millis;

    fn now(&self) -> Millis {
        self.now.get()
    }
}

/// A convenient wrapper around `std::time::Instant` satisfying the `InstantLike` trait.
#[cfg(feature = "std")]
mod std_instant {

    use super::{Add, Clock, Duration, InstantLike};

    /// Wraps `std::time::Instant`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct StdInstant(pub std::time::Instant);

    impl StdInstant {
        /// Reads `std::time::Instant::now()`.
        pub fn now() -> Self {
            StdInstant(std::time::Instant::now())
        }
    }

    impl InstantLike for StdInstant {
        fn duration_since(&self, other: Self) -> Duration {
            self.0.saturating_duration_since(other.0)
        }
    }

    impl Add<Duration> for StdInstant {
        type Output = Self;

        fn add(self, rhs: Duration) -> Self::Output {
            StdInstant(self.0 + rhs)
        }
    }

    /// The wall clock of the host, backed by `std::time::Instant`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdClock;

    impl Clock for StdClock {
        type Instant = StdInstant;

        fn now(&self) -> StdInstant {
            StdInstant::now()
        }
    }

    /// Tests that StdInstant is just one constructor call away from std::time::Instant
    /// and calling duration_since is equivalent to calling the same method on the underlying Instant.
    #[cfg(test)]
    #[test]
    fn test_std_instant_wrapper() {
        let start = StdInstant::now();
        let end = StdClock.now();
        let result = end.duration_since(start);
        let expected = end.0.duration_since(start.0);
        assert_eq!(result, expected);

        // Reversed operands saturate instead of panicking
        assert_eq!(
            start.duration_since(end + Duration::from_secs(1)),
            Duration::ZERO
        );
    }
}

#[cfg(feature = "std")]
pub use std_instant::{StdClock, StdInstant};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counters_saturate() {
        assert_eq!(Millis(5).duration_since(Millis(10)), Duration::ZERO);
        assert_eq!(Micros(5).duration_since(Micros(10)), Duration::ZERO);
        assert_eq!(TimeF64(1.0).duration_since(TimeF64(2.0)), Duration::ZERO);
        assert_eq!(
            Millis(1500).duration_since(Millis(500)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_tick_counters_saturate_on_add() {
        assert_eq!(
            Millis(u64::MAX - 1) + Duration::from_millis(5),
            Millis(u64::MAX)
        );
        assert_eq!(Micros(u64::MAX) + Duration::MAX, Micros(u64::MAX));
        // Sub-tick remainders are dropped
        assert_eq!(Millis(10) + Duration::from_micros(1999), Millis(11));

        let clock = SimClock::new(Millis(u64::MAX - 10));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Millis(u64::MAX));
    }

    #[test]
    fn test_time_f64_measures_seconds() {
        let start = TimeF64::from_secs(1.0);
        let later = TimeF64::from_secs(1.5) + Duration::from_millis(250);
        assert_eq!(later.as_secs_f64(), 1.75);
        assert_eq!(later.duration_since(start), Duration::from_millis(750));
    }

    #[test]
    fn test_fn_clock_reads_closure() {
        let ticks = Cell::new(7u64);
        let clock = FnClock(|| Micros(ticks.get()));
        assert_eq!(clock.now(), Micros(7));
        ticks.set(9);
        assert_eq!(clock.now(), Micros(9));
    }

    #[test]
    fn test_sim_clock_advances_through_shared_reference() {
        let clock = SimClock::new(Millis(100));
        let handle = &clock;
        assert_eq!(handle.now(), Millis(100));

        clock.advance(Duration::from_millis(250));
        assert_eq!(handle.now(), Millis(350));

        clock.set(Millis(0));
        assert_eq!(handle.now(), Millis(0));
    }
}
