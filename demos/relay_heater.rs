//! Closed-loop demo of a relay-driven heater
//! This demo requires the `--features simulation` flag to be enabled.
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

use std::cell::Cell;
use std::time::Duration;

use auto_pid::pid::PidConfigBuilder;
use auto_pid::relay::AutoPidRelay;
use auto_pid::sim::{rk4_step, ThermalPlant};
use auto_pid::time::{Clock, SimClock};

const FIXED_STEP_SIZE_MS: u64 = 10;
const FIXED_STEP_SIZE_S: f64 = FIXED_STEP_SIZE_MS as f64 * 0.001;
const LOG_EVERY_STEPS: usize = 1000;

pub fn main() {
    let plant = ThermalPlant::default();
    let mut state = plant.initial_state();

    let cfg = PidConfigBuilder::default()
        .gains(0.1, 0.002, 0.0)
        .bang_bang(10.0, 0.0)
        .build()
        .unwrap();

    let clock = SimClock::default();
    let temperature = Cell::new(plant.h(state));
    let setpoint = Cell::new(60.0);
    let heater_on = Cell::new(false);

    let mut relay = AutoPidRelay::new(
        &temperature,
        &setpoint,
        &heater_on,
        Duration::from_millis(2000),
        cfg,
        &clock,
    );

    println!("time_s,setpoint,temperature,duty,mode");
    for i in 0..360_000usize {
        // Step the setpoint down halfway through
        if i == 180_000 {
            setpoint.set(45.0);
        }

        temperature.set(plant.h(state));
        relay.run();
        let u = if heater_on.get() { 1.0 } else { 0.0 };
        state = rk4_step(|x| plant.f(x, u), state, FIXED_STEP_SIZE_S);

        if i % LOG_EVERY_STEPS == 0 {
            println!(
                "{:.1},{:.1},{:.3},{:.3},{:?}",
                clock.now().0 as f64 / 1000.0,
                setpoint.get(),
                temperature.get(),
                relay.pulse_value(),
                relay.controller().mode(),
            );
        }
        clock.advance(Duration::from_millis(FIXED_STEP_SIZE_MS));
    }
}
