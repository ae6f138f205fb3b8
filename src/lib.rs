#![warn(missing_docs)]

//! # Auto PID Controller Library
//!
//! This library provides a time-stepped PID (Proportional-Integral-Derivative) controller with an
//! optional bang-bang override, and a relay variant that turns the PID output into a
//! time-proportioned on/off signal for actuators such as heater relays and solid state relays.
//!
//! ## Features
//!
//! - Bound, embedded-style controllers:
//!   - The controller borrows the host's input, setpoint and output cells and reads them live on
//!     every call to `run`.
//!   - The time source is injected, so tests run on a deterministic simulated clock.
//!
//! - Explicit **discrete-time** behavior:
//!   - Configurable time step: _the PID branch is a no-op if `run` is called before one time
//!     step elapsed_.
//!   - Integral gain folded into the accumulated integral, so retuning `ki` does not bump the
//!     output.
//!
//! - Bang-bang override with hysteresis:
//!   - Far from the setpoint, drive the output to a limit; close to it, drive it to zero.
//!   - Bang-bang branches are evaluated on every call and reset the PID state.
//!
//! - Relay pulse shaping:
//!   - The PID output is a duty fraction of a fixed pulse width.
//!   - Pulse cycles stay phase-aligned across missed calls.
//!
//! ## Usage
//!
//! ### Unbound PID Controller
//!
//! [`pid::PidController`] holds the control state but no bindings: inputs and time are passed
//! in, and the new output, if any, is returned.
//!
//! ```rust
//! use auto_pid::pid::{PidConfigBuilder, PidController};
//! use auto_pid::time::Millis;
//!
//! let config = PidConfigBuilder::default()
//!     .gains(2.0, 0.5, 0.0)
//!     .output_range(-10.0, 10.0)
//!     .build()
//!     .expect("Invalid PID config");
//! let mut pid = PidController::new(config);
//!
//! // The first call starts the controller and opens the first time step window
//! assert_eq!(pid.run(1.0, 2.0, Millis(0)), None);
//! assert_eq!(pid.run(1.0, 2.0, Millis(500)), None);
//!
//! // P = 2 * 1, I = 0.5 * 1 * 1s
//! assert_eq!(pid.run(1.0, 2.0, Millis(1000)), Some(2.5));
//! ```
//!
//! ### Bound PID Controller
//!
//! [`pid::AutoPid`] reads and writes `Cell`s owned by the host, and reads time from a
//! [`time::Clock`].
//!
//! ```rust
//! use core::cell::Cell;
//! use auto_pid::pid::{AutoPid, PidConfig};
//! use auto_pid::time::{FnClock, Millis};
//!
//! let ticks = Cell::new(0u64);
//! let (input, setpoint, output) = (Cell::new(0.0), Cell::new(100.0), Cell::new(0.0));
//!
//! let mut pid = AutoPid::new(
//!     &input,
//!     &setpoint,
//!     &output,
//!     PidConfig::new(0.0, 255.0, 1.0, 0.0, 0.0),
//!     FnClock(|| Millis(ticks.get())),
//! );
//! pid.set_bang_bang(20.0, 0.0);
//!
//! // Far away from the setpoint: full power, regardless of the time step
//! pid.run();
//! assert_eq!(output.get(), 255.0);
//!
//! // Close enough for PID control
//! input.set(90.0);
//! ticks.set(1000);
//! pid.run();
//! assert!(pid.at_set_point(10.0));
//! assert_eq!(output.get(), 10.0);
//! ```
//!
//! ### Relay Controller
//!
//! See [`relay::AutoPidRelay`].
//!
//! ## License
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The main module for the PID controller library.
pub mod pid;

/// Pulse shaping of the PID output for on/off actuators.
pub mod relay;

/// The module containing time-related utilities: instants and injectable clocks.
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
