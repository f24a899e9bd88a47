//! Core calculators
//!
//! Every calculator here is a pure function of its input plus, where noted,
//! an injected random source or clock reading. Nothing in this module
//! touches storage.

pub mod audit;
pub mod city;
pub mod health;
pub mod realtime;
pub mod traffic;

use rand::Rng;
use std::f64::consts::PI;

pub use audit::AuditHasher;
pub use city::CityGenerator;
pub use health::{HealthModel, RiskModel, WeightedModel};
pub use traffic::{DensityPolicy, ProportionalPolicy, SignalPolicy};

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Normally distributed noise, clipped to three standard deviations
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // Box-Muller; u1 stays away from 0 so ln() is finite
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z.clamp(-3.0, 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 1), 1.2);
        assert_eq!(round_to(-2.75, 1), -2.8);
    }

    #[test]
    fn test_gaussian_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let sample = gaussian(&mut rng, 0.0, 0.1);
            assert!(sample.abs() <= 0.3 + 1e-12);
        }
    }

    #[test]
    fn test_gaussian_mean_is_close() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| gaussian(&mut rng, 5.0, 1.0)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.05, "mean was {mean}");
    }
}
