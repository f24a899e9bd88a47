//! Traffic signal policies
//!
//! Two independent policies share the [`SignalPolicy`] interface. The request
//! body shape decides which one runs, see [`optimize`].

use rand::Rng;
use shared::{
    DensityInput, DensityPlan, ProportionalInput, ProportionalPlan, SignalTiming, TrafficPlan,
    TrafficPolicyKind, TrafficPrediction, TrafficRequest, ValidationResult,
};
use std::f64::consts::PI;

use super::{gaussian, round_to};

/// A signal-timing policy
pub trait SignalPolicy {
    type Input;

    fn kind(&self) -> TrafficPolicyKind;

    /// Validate `input` and produce a plan.
    ///
    /// `hour` is the local hour of day (0-23); `rng` feeds any forecast noise.
    fn optimize<R: Rng + ?Sized>(&self, input: &Self::Input, hour: u32, rng: &mut R) -> ValidationResult<TrafficPlan>;
}

/// Buckets vehicle density into low/medium/high and splits one signal cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityPolicy;

impl DensityPolicy {
    const HIGH_DENSITY: f64 = 50.0;
    const MEDIUM_DENSITY: f64 = 25.0;
    const MAX_GREEN_SECONDS: f64 = 90.0;
    const PEAK_HOURS: &'static str = "17:30-19:00";

    /// Green fraction of the cycle and efficiency gain for a density bucket
    fn bucket(density: f64) -> (f64, u32) {
        if density > Self::HIGH_DENSITY {
            (0.7, 35)
        } else if density > Self::MEDIUM_DENSITY {
            (0.6, 25)
        } else {
            (0.5, 15)
        }
    }
}

impl SignalPolicy for DensityPolicy {
    type Input = DensityInput;

    fn kind(&self) -> TrafficPolicyKind {
        TrafficPolicyKind::Density
    }

    fn optimize<R: Rng + ?Sized>(&self, input: &DensityInput, hour: u32, rng: &mut R) -> ValidationResult<TrafficPlan> {
        input.validate()?;

        let density = input.vehicle_count as f64 / input.avg_speed.max(1.0);
        let (green_fraction, efficiency_improvement) = Self::bucket(density);

        let cycle = input.signal_cycle as u32;
        let mut green = cycle as f64 * green_fraction;
        if density > Self::HIGH_DENSITY {
            green = green.min(Self::MAX_GREEN_SECONDS);
        }
        let green_time = green.floor() as u32;
        let red_time = cycle - green_time;

        let time_factor = (hour as f64 * PI / 12.0).sin() * 0.3 + 1.0;
        let noise = gaussian(rng, 0.0, 0.1);
        let next_hour_vehicles = (input.vehicle_count as f64 * time_factor * (1.0 + noise)) as i64;

        let congestion_probability = ((density - 20.0) * 2.0).clamp(0.0, 100.0) as u32;

        Ok(TrafficPlan::Density(DensityPlan {
            signal_optimization: SignalTiming {
                green_time,
                red_time,
                efficiency_improvement,
            },
            traffic_prediction: TrafficPrediction {
                next_hour_vehicles,
                peak_hours: Self::PEAK_HOURS.to_string(),
                congestion_probability,
            },
            optimization_score: (60 + efficiency_improvement).min(100),
        }))
    }
}

/// Fixed 90s cycle split across approaches in proportion to demand
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalPolicy;

impl ProportionalPolicy {
    pub const CYCLE_SECONDS: u32 = 90;
    pub const MIN_GREEN_SECONDS: f64 = 5.0;
    const LOST_TIME_PER_APPROACH: f64 = 2.0;
    const MIN_AVAILABLE_SECONDS: f64 = 10.0;
    const ZERO_DEMAND_SCORE: f64 = 0.5;
}

impl SignalPolicy for ProportionalPolicy {
    type Input = ProportionalInput;

    fn kind(&self) -> TrafficPolicyKind {
        TrafficPolicyKind::Proportional
    }

    fn optimize<R: Rng + ?Sized>(&self, input: &ProportionalInput, _hour: u32, _rng: &mut R) -> ValidationResult<TrafficPlan> {
        input.validate()?;

        let approaches = input.demand.len() as f64;
        let cycle = Self::CYCLE_SECONDS as f64;
        let lost_time = approaches * Self::LOST_TIME_PER_APPROACH;
        let available = (cycle - lost_time - approaches * Self::MIN_GREEN_SECONDS).max(Self::MIN_AVAILABLE_SECONDS);

        let total_demand: f64 = input.demand.iter().map(|&d| d as f64).sum();
        if total_demand == 0.0 {
            return Ok(TrafficPlan::Proportional(ProportionalPlan {
                cycle_seconds: Self::CYCLE_SECONDS,
                green_times: vec![cycle / approaches; input.demand.len()],
                efficiency_score: Self::ZERO_DEMAND_SCORE,
                notes: "No demand; equal split.".to_string(),
            }));
        }

        let shares: Vec<f64> = input.demand.iter().map(|&d| d as f64 / total_demand).collect();
        let raw: Vec<f64> = shares
            .iter()
            .map(|share| Self::MIN_GREEN_SECONDS + share * available)
            .collect();

        // Rescale so the greens fill the whole cycle
        let factor = cycle / raw.iter().sum::<f64>();
        let green_times = raw.iter().map(|g| round_to(g * factor, 2)).collect();

        let even_share = 1.0 / approaches;
        let balance_penalty = shares.iter().map(|share| (share - even_share).abs()).sum::<f64>() / approaches;
        let utilization = available / cycle;
        let score = (0.6 * utilization + 0.4 * (1.0 - balance_penalty)).clamp(0.0, 1.0);

        Ok(TrafficPlan::Proportional(ProportionalPlan {
            cycle_seconds: Self::CYCLE_SECONDS,
            green_times,
            efficiency_score: round_to(score, 3),
            notes: "Proportional green split with fixed cycle and minimum greens.".to_string(),
        }))
    }
}

/// Run whichever policy the request shape selects
pub fn optimize<R: Rng + ?Sized>(request: &TrafficRequest, hour: u32, rng: &mut R) -> ValidationResult<TrafficPlan> {
    match request {
        TrafficRequest::Density(input) => DensityPolicy.optimize(input, hour, rng),
        TrafficRequest::Proportional(input) => ProportionalPolicy.optimize(input, hour, rng),
    }
}
