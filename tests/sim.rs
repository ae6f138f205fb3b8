
#[cfg(feature = "simulation")]
mod test_closed_loop_heater {
    use super::fixtures::test_pid::Host;

    use auto_pid::pid::PidConfig;
    use auto_pid::sim::{rk4_step, ThermalPlant};
    use std::time::Duration;

    const FIXED_STEP_SIZE_MS: u64 = 10;
    const FIXED_STEP_SIZE_S: f64 = FIXED_STEP_SIZE_MS as f64 * 0.001;
    const SIM_STEPS: usize = 180_000; // 30 minutes
    const SETTLED_STEPS: usize = 60_000; // last 10 minutes
    const SETPOINT: f64 = 60.0;

    fn heater_config(bang_on: f64) -> PidConfig<f64> {
        let mut config = PidConfig::new(0.0, 1.0, 0.1, 0.002, 0.0);
        config.set_bang_bang(bang_on, 0.0);
        config
    }

    /// Closes the loop around a PID driving the heater with a continuous duty, returning the body
    /// temperature trace
    fn simulate_analog(config: PidConfig<f64>) -> Vec<f64> {
        let plant = ThermalPlant::default();
        let mut state = plant.initial_state();
        let host = Host::new(plant.h(state), SETPOINT);
        let mut pid = host.auto_pid(config);

        let mut trace = Vec::with_capacity(SIM_STEPS);
        for _ in 0..SIM_STEPS {
            host.input.set(plant.h(state));
            pid.run();
            let u = host.output.get();
            state = rk4_step(|x| plant.f(x, u), state, FIXED_STEP_SIZE_S);
            trace.push(plant.h(state));
            host.advance_ms(FIXED_STEP_SIZE_MS);
        }
        trace
    }

    /// Same loop, but the heater is switched on and off by the relay controller
    fn simulate_relay(config: PidConfig<f64>) -> Vec<f64> {
        let plant = ThermalPlant::default();
        let mut state = plant.initial_state();
        let host = Host::new(plant.h(state), SETPOINT);
        let mut relay = host.relay(Duration::from_millis(2000), config);

        let mut trace = Vec::with_capacity(SIM_STEPS);
        for _ in 0..SIM_STEPS {
            host.input.set(plant.h(state));
            relay.run();
            let u = if host.relay_state.get() { 1.0 } else { 0.0 };
            state = rk4_step(|x| plant.f(x, u), state, FIXED_STEP_SIZE_S);
            trace.push(plant.h(state));
            host.advance_ms(FIXED_STEP_SIZE_MS);
        }
        trace
    }

    fn peak(trace: &[f64]) -> f64 {
        trace.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn assert_settled(trace: &[f64], tolerance: f64) {
        for temperature in &trace[SIM_STEPS - SETTLED_STEPS..] {
            assert!(
                (temperature - SETPOINT).abs() < tolerance,
                "temperature {temperature} not within {tolerance} of {SETPOINT}"
            );
        }
    }

    #[test]
    fn test_analog_heater_settles() {
        let trace = simulate_analog(heater_config(10.0));
        assert!(peak(&trace) < SETPOINT + 3.0);
        assert_settled(&trace, 0.5);
    }

    #[test]
    fn test_relay_heater_settles() {
        let trace = simulate_relay(heater_config(10.0));
        assert!(peak(&trace) < SETPOINT + 3.0);
        assert_settled(&trace, 0.5);
    }

    /// Without bang-bang, the integral winds up during the long heat-up and the body overshoots
    /// far more than when the heat-up runs at full power with the PID state held reset
    #[test]
    fn test_bang_on_limits_overshoot() {
        let with_bang = peak(&simulate_analog(heater_config(10.0)));
        let without_bang = peak(&simulate_analog(heater_config(0.0)));

        assert!(without_bang > SETPOINT + 10.0);
        assert!(with_bang < without_bang);
    }
}
