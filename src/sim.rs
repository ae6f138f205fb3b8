use nalgebra as na;

/// Advances `x' = f(x)` by one step of size `h` with the classic 4th order Runge-Kutta method.
pub fn rk4_step<Fx>(f: Fx, x: na::Vector2<f64>, h: f64) -> na::Vector2<f64>
where
    Fx: Fn(na::Vector2<f64>) -> na::Vector2<f64>,
{
    let k1 = f(x);
    let k2 = f(x + k1 * (0.5 * h));
    let k3 = f(x + k2 * (0.5 * h));
    let k4 = f(x + k3 * h);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

/// A heated body, e.g. a kettle or an oven, with a heating element of its own thermal mass.
///
/// The heater input `u` is the fraction of `heater_power` applied: the duty fraction for an analog
/// drive, or 0/1 for a relay.
pub struct ThermalPlant {
    pub heater_power: f64,
    pub element_capacity: f64,
    pub body_capacity: f64,
    pub element_to_body: f64,
    pub body_to_ambient: f64,
    pub ambient: f64,
}

impl Default for ThermalPlant {
    fn default() -> Self {
        Self {
            heater_power: 50.0,
            element_capacity: 20.0,
            body_capacity: 200.0,
            element_to_body: 5.0,
            body_to_ambient: 0.5,
            ambient: 20.0,
        }
    }
}

impl ThermalPlant {
    /// Implements the state-space realization of the two-mass heater:
    /// ┌     ┐   ┌                        ┐┌    ┐   ┌      ┐     ┌          ┐
    /// │ Tₑ' │ = │ -kₑ/Cₑ    kₑ/Cₑ        ││ Tₑ │ + │ P/Cₑ │ u + │ 0        │
    /// │ Tᵦ' │   │  kₑ/Cᵦ  -(kₑ + kₐ)/Cᵦ  ││ Tᵦ │   │ 0    │     │ kₐTₐ/Cᵦ  │
    /// └     ┘   └                        ┘└    ┘   └      ┘     └          ┘
    ///     ┌      ┐┌    ┐
    /// T = │ 0  1 ││ Tₑ │
    ///     └      ┘│ Tᵦ │
    ///             └    ┘
    pub fn f(&self, x: na::Vector2<f64>, u: f64) -> na::Vector2<f64> {
        let (ce, cb) = (self.element_capacity, self.body_capacity);
        let (ke, ka) = (self.element_to_body, self.body_to_ambient);

        let mat_a = na::Matrix2::new(-ke / ce, ke / ce, ke / cb, -(ke + ka) / cb);
        let mat_b = na::Vector2::new(self.heater_power / ce, 0.0);
        let ambient_load = na::Vector2::new(0.0, ka * self.ambient / cb);

        mat_a * x + mat_b * u + ambient_load
    }

    /// The measured output: the body temperature.
    pub fn h(&self, x: na::Vector2<f64>) -> f64 {
        x[1]
    }

    /// The state with both masses at ambient temperature.
    pub fn initial_state(&self) -> na::Vector2<f64> {
        na::Vector2::new(self.ambient, self.ambient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unheated_plant_stays_at_ambient() {
        let plant = ThermalPlant::default();
        let mut x = plant.initial_state();
        for _ in 0..1000 {
            x = rk4_step(|x| plant.f(x, 0.0), x, 0.01);
        }
        assert_relative_eq!(plant.h(x), plant.ambient, epsilon = 1e-9);
    }

    #[test]
    fn test_full_power_heats_toward_steady_state() {
        let plant = ThermalPlant::default();
        let steady_state = plant.ambient + plant.heater_power / plant.body_to_ambient;
        let mut x = plant.initial_state();
        let mut last = plant.h(x);
        for _ in 0..100 {
            x = rk4_step(|x| plant.f(x, 1.0), x, 0.1);
            assert!(plant.h(x) >= last);
            last = plant.h(x);
        }
        assert!(last < steady_state);
    }
}
