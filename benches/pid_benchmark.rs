//! Benchmark for the PID controllers
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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use auto_pid::{pid, relay, time};

fn make_config() -> pid::PidConfig<f64> {
    pid::PidConfigBuilder::default()
        .kp(1.0)
        .ki(0.5)
        .kd(0.1)
        .output_range(-10.0, 10.0)
        .time_step(Duration::from_millis(10))
        .build()
        .unwrap()
}

/// The unbound controller, recalculating on every call
fn bench_unbound_pid(c: &mut Criterion) {
    let mut pid = pid::PidController::new(make_config());
    let setpoint = 1.0;
    let mut measurement = 0.9;
    let dt = 10;
    let mut now = time::Millis(0);

    c.bench_function("unbound PID", |b| {
        b.iter(|| {
            let output = pid.run(black_box(measurement), black_box(setpoint), now);
            measurement += 0.0001; // prevent constant inputs
            now.0 += dt;
            black_box(output);
        });
    });
}

/// Most calls of an embedded superloop fall within the time step; those should be nearly free
fn bench_rate_limited_pid(c: &mut Criterion) {
    let mut pid = pid::PidController::new(make_config());
    let mut now = time::Millis(0);

    c.bench_function("rate-limited PID", |b| {
        b.iter(|| {
            let output = pid.run(black_box(0.9), black_box(1.0), now);
            now.0 += 1;
            black_box(output);
        });
    });
}

/// The bound relay controller adds cell reads/writes, a clock read and the pulse phase update
fn bench_relay(c: &mut Criterion) {
    let clock = time::SimClock::new(time::Millis(0));
    let (input, setpoint, relay_state) = (Cell::new(0.9), Cell::new(1.0), Cell::new(false));
    let mut relay = relay::AutoPidRelay::new(
        &input,
        &setpoint,
        &relay_state,
        Duration::from_millis(1000),
        make_config(),
        &clock,
    );

    c.bench_function("relay PID", |b| {
        b.iter(|| {
            relay.run();
            input.set(input.get() + 0.0001);
            clock.advance(Duration::from_millis(10));
            black_box(relay_state.get());
        });
    });
}

criterion_group!(benches, bench_unbound_pid, bench_rate_limited_pid, bench_relay);
criterion_main!(benches);
