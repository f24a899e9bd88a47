//! Traffic signal request and plan types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult, ensure_finite, ensure_in_range};

/// Longest signal cycle the density policy accepts, in seconds
pub const MAX_SIGNAL_CYCLE: i64 = 3600;

/// Signal-timing policy selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficPolicyKind {
    Density,
    Proportional,
}

impl TrafficPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficPolicyKind::Density => "density",
            TrafficPolicyKind::Proportional => "proportional",
        }
    }
}

/// Input for the density policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityInput {
    pub vehicle_count: i64,
    pub avg_speed: f64,
    pub signal_cycle: i64,
}

impl DensityInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.vehicle_count < 0 {
            return Err(ValidationError::Negative { field: "vehicle_count" });
        }
        ensure_finite("avg_speed", self.avg_speed)?;
        if self.avg_speed < 0.0 {
            return Err(ValidationError::Negative { field: "avg_speed" });
        }
        if self.signal_cycle <= 0 {
            return Err(ValidationError::NotPositive { field: "signal_cycle" });
        }
        ensure_in_range("signal_cycle", self.signal_cycle, 1..=MAX_SIGNAL_CYCLE)
    }
}

fn default_intersections() -> i64 {
    1
}

fn default_approaches() -> i64 {
    4
}

/// Input for the proportional-split policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProportionalInput {
    #[serde(default = "default_intersections")]
    pub intersections: i64,
    #[serde(default = "default_approaches")]
    pub approaches: i64,
    /// Vehicles per minute per approach
    pub demand: Vec<i64>,
}

impl ProportionalInput {
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_in_range("intersections", self.intersections, 1..=50)?;
        ensure_in_range("approaches", self.approaches, 3..=8)?;
        if self.demand.len() as i64 != self.approaches {
            return Err(ValidationError::LengthMismatch {
                field: "demand",
                expected_field: "approaches",
                expected: self.approaches as usize,
                actual: self.demand.len(),
            });
        }
        if self.demand.iter().any(|&d| d < 0) {
            return Err(ValidationError::Negative { field: "demand" });
        }
        Ok(())
    }
}

/// Body of `POST /api/traffic/optimize`; a `demand` key picks the proportional policy
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrafficRequest {
    Proportional(ProportionalInput),
    Density(DensityInput),
}

impl<'de> Deserialize<'de> for TrafficRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Value::deserialize(deserializer)?;
        let request = match TrafficRequest::policy_for(&body) {
            TrafficPolicyKind::Proportional => ProportionalInput::deserialize(body).map(TrafficRequest::Proportional),
            TrafficPolicyKind::Density => DensityInput::deserialize(body).map(TrafficRequest::Density),
        };
        request.map_err(serde::de::Error::custom)
    }
}

impl TrafficRequest {
    /// Policy a raw request body asks for, decided by key presence alone
    pub fn policy_for(body: &Value) -> TrafficPolicyKind {
        if body.get("demand").is_some() {
            TrafficPolicyKind::Proportional
        } else {
            TrafficPolicyKind::Density
        }
    }

    pub fn policy(&self) -> TrafficPolicyKind {
        match self {
            TrafficRequest::Proportional(_) => TrafficPolicyKind::Proportional,
            TrafficRequest::Density(_) => TrafficPolicyKind::Density,
        }
    }

    /// Check an explicitly requested policy against the body shape
    pub fn ensure_policy(&self, requested: Option<TrafficPolicyKind>) -> ValidationResult<()> {
        match requested {
            Some(kind) if kind != self.policy() => Err(ValidationError::PolicyMismatch {
                field: "policy",
                expected: kind.as_str().to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            TrafficRequest::Proportional(input) => input.validate(),
            TrafficRequest::Density(input) => input.validate(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalTiming {
    pub green_time: u32,
    pub red_time: u32,
    pub efficiency_improvement: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficPrediction {
    pub next_hour_vehicles: i64,
    pub peak_hours: String,
    pub congestion_probability: u32,
}

/// Density policy output; `optimization_score` is on a 0-100 scale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityPlan {
    pub signal_optimization: SignalTiming,
    pub traffic_prediction: TrafficPrediction,
    pub optimization_score: u32,
}

/// Proportional policy output; `efficiency_score` is on a 0-1 scale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProportionalPlan {
    pub cycle_seconds: u32,
    pub green_times: Vec<f64>,
    pub efficiency_score: f64,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TrafficPlan {
    Density(DensityPlan),
    Proportional(ProportionalPlan),
}

impl TrafficPlan {
    pub fn policy(&self) -> TrafficPolicyKind {
        match self {
            TrafficPlan::Density(_) => TrafficPolicyKind::Density,
            TrafficPlan::Proportional(_) => TrafficPolicyKind::Proportional,
        }
    }

    /// Score normalised to 0-100 regardless of policy
    pub fn score_percent(&self) -> f64 {
        match self {
            TrafficPlan::Density(plan) => plan.optimization_score as f64,
            TrafficPlan::Proportional(plan) => plan.efficiency_score * 100.0,
        }
    }
}
