//! Discretized real-time paths between two pinned endpoints.
//!
//! A path is the straight line from `start` to `end` with every interior
//! point perturbed independently, and its weight in the path integral is the
//! phase factor exp(-iS/ħ) of the discretized action
//!
//!   S = Σₜ [ m (xₜ - xₜ₋₁)² / (2Δt²) - V(xₜ) ] Δt
//!
//! No proposal distribution or acceptance step is involved.

use nalgebra::Complex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::noise::PathNoise;
use super::traits::Potential;
use crate::params::SimulationParameters;

/// One sampled trajectory with its action and complex amplitude.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Path {
    /// Positions at t = 0..=time_steps, first and last pinned
    pub positions: Vec<f64>,
    /// Discretized classical action S
    pub action: f64,
    /// Phase -S/ħ before normalization
    pub phase: f64,
    /// exp(i·phase), divided component-wise by the ensemble sums once normalized
    pub amplitude: Complex<f64>,
}

impl Path {
    /// Sample a path and attach its action and unit-circle amplitude.
    pub fn sample<R, P>(
        params: &SimulationParameters,
        noise: &PathNoise,
        potential: &P,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
        P: Potential + ?Sized,
    {
        let positions =
            generate_random_path(params.start_pos, params.end_pos, params.time_steps, noise, rng);
        let action = calculate_action(&positions, params.mass, params.dt, potential);
        Self::from_action(positions, action, params.hbar)
    }

    pub fn from_action(positions: Vec<f64>, action: f64, hbar: f64) -> Self {
        let phase = -action / hbar;
        Self {
            positions,
            action,
            phase,
            amplitude: Complex::new(phase.cos(), phase.sin()),
        }
    }

    /// The amplitude as it was before normalization.
    pub fn unit_amplitude(&self) -> Complex<f64> {
        Complex::new(self.phase.cos(), self.phase.sin())
    }

    /// |amplitude| of the (possibly normalized) amplitude.
    pub fn magnitude(&self) -> f64 {
        self.amplitude.norm()
    }

    /// atan2(im, re) of the (possibly normalized) amplitude.
    pub fn phase_angle(&self) -> f64 {
        self.amplitude.arg()
    }

    pub fn time_steps(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

/// Straight line from `start` to `end` over `time_steps` intervals with
/// independent noise on every interior point. Requires `time_steps >= 1`.
pub fn generate_random_path<R: Rng + ?Sized>(
    start: f64,
    end: f64,
    time_steps: usize,
    noise: &PathNoise,
    rng: &mut R,
) -> Vec<f64> {
    debug_assert!(time_steps >= 1);
    let n = time_steps as f64;
    let mut path = Vec::with_capacity(time_steps + 1);
    path.push(start);
    for t in 1..time_steps {
        let alpha = t as f64 / n;
        let x = (1.0 - alpha) * start + alpha * end;
        path.push(x + noise.sample(rng));
    }
    path.push(end);
    path
}

/// Discretized Lagrangian action with a backward-difference velocity.
/// Terms are accumulated left to right.
pub fn calculate_action<P: Potential + ?Sized>(
    positions: &[f64],
    mass: f64,
    dt: f64,
    potential: &P,
) -> f64 {
    let mut action = 0.0;
    for w in positions.windows(2) {
        let dx = w[1] - w[0];
        let kinetic = 0.5 * mass * dx * dx / (dt * dt);
        action += (kinetic - potential.value(w[1])) * dt;
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::noise::NoiseGenerator;
    use crate::sampling::traits::HarmonicPotential;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints_pinned() {
        let mut gen = NoiseGenerator::new(42);
        for &steps in &[1usize, 2, 7, 30, 100] {
            let path = generate_random_path(-2.0, 2.0, steps, &PathNoise::default(), gen.rng());
            assert_eq!(path.len(), steps + 1);
            assert_eq!(path[0], -2.0);
            assert_eq!(path[steps], 2.0);
        }
    }

    #[test]
    fn test_interior_stays_near_line() {
        let mut gen = NoiseGenerator::new(9);
        let path = generate_random_path(-2.0, 2.0, 40, &PathNoise::default(), gen.rng());
        for (t, &x) in path.iter().enumerate() {
            let line = -2.0 + 4.0 * t as f64 / 40.0;
            assert!((x - line).abs() <= 0.5 + 1e-12, "t = {}: {} vs {}", t, x, line);
        }
    }

    #[test]
    fn test_noise_free_path_is_straight() {
        let mut gen = NoiseGenerator::new(0);
        let path = generate_random_path(1.0, 3.0, 4, &PathNoise::None, gen.rng());
        let expected = [1.0, 1.5, 2.0, 2.5, 3.0];
        for (x, e) in path.iter().zip(expected.iter()) {
            assert_relative_eq!(*x, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_action_golden_at_rest() {
        // x = [0, 0, 0]: no kinetic term, V(0) = 0
        let mut gen = NoiseGenerator::new(0);
        let path = generate_random_path(0.0, 0.0, 2, &PathNoise::None, gen.rng());
        let action = calculate_action(&path, 1.0, 1.0, &HarmonicPotential);
        assert_eq!(action, 0.0);
    }

    #[test]
    fn test_action_golden_kink() {
        // (0.5 - V(1)) + (0.5 - V(0)) = 0 + 0.5
        let action = calculate_action(&[0.0, 1.0, 0.0], 1.0, 1.0, &HarmonicPotential);
        assert_relative_eq!(action, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_action_golden_straight_line() {
        // x = [-2, 0, 2], m = 1, dt = 0.1: (200 - 0)·0.1 + (200 - 2)·0.1
        let mut gen = NoiseGenerator::new(0);
        let path = generate_random_path(-2.0, 2.0, 2, &PathNoise::None, gen.rng());
        let action = calculate_action(&path, 1.0, 0.1, &HarmonicPotential);
        assert_relative_eq!(action, 39.8, epsilon = 1e-9);
    }

    #[test]
    fn test_single_step_action_is_one_term() {
        let action = calculate_action(&[-1.0, 2.0], 2.0, 0.5, &HarmonicPotential);
        // 0.5·2·9/0.25 = 36, V(2) = 2, (36 - 2)·0.5
        assert_relative_eq!(action, 17.0, epsilon = 1e-12);
    }

    #[test]
    fn test_action_uses_given_potential() {
        let free = calculate_action(&[0.0, 1.0, 2.0], 1.0, 1.0, &|_x: f64| 0.0);
        assert_relative_eq!(free, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_unit_amplitude_before_normalization() {
        let params = SimulationParameters::default();
        let mut gen = NoiseGenerator::new(5);
        let path = Path::sample(&params, &PathNoise::default(), &HarmonicPotential, gen.rng());
        assert_relative_eq!(path.magnitude(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(path.phase, -path.action / params.hbar, epsilon = 1e-15);
        assert_eq!(path.unit_amplitude(), path.amplitude);
        assert_eq!(path.time_steps(), params.time_steps);
    }
}
