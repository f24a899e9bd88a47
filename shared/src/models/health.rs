//! Health analysis request and report types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult, ensure_finite, ensure_in_range};

/// Health model selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthModelKind {
    Weighted,
    Risk,
}

impl HealthModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthModelKind::Weighted => "weighted",
            HealthModelKind::Risk => "risk",
        }
    }
}

/// Vitals for the weighted-score model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalsInput {
    pub heart_rate: i64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub exercise_minutes: i64,
    pub sleep_hours: f64,
}

impl VitalsInput {
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_in_range("heart_rate", self.heart_rate, 30..=220)?;
        ensure_in_range("systolic_bp", self.systolic_bp, 50..=260)?;
        ensure_in_range("diastolic_bp", self.diastolic_bp, 30..=180)?;
        ensure_in_range("exercise_minutes", self.exercise_minutes, 0..=1440)?;
        ensure_finite("sleep_hours", self.sleep_hours)?;
        ensure_in_range("sleep_hours", self.sleep_hours, 0.0..=24.0)
    }
}

/// Lifestyle profile for the risk-accumulation model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    pub hr_rest: i64,
    pub sleep_hours: f64,
    pub steps: i64,
    pub age: i64,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl RiskInput {
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_in_range("hr_rest", self.hr_rest, 30..=220)?;
        ensure_finite("sleep_hours", self.sleep_hours)?;
        ensure_in_range("sleep_hours", self.sleep_hours, 0.0..=24.0)?;
        ensure_in_range("steps", self.steps, 0..=200_000)?;
        ensure_in_range("age", self.age, 0..=120)
    }
}

/// Body of `POST /api/health/analyze`; an `hr_rest` key picks the risk model
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HealthRequest {
    Weighted(VitalsInput),
    Risk(RiskInput),
}

impl<'de> Deserialize<'de> for HealthRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Value::deserialize(deserializer)?;
        let request = match HealthRequest::model_for(&body) {
            HealthModelKind::Weighted => VitalsInput::deserialize(body).map(HealthRequest::Weighted),
            HealthModelKind::Risk => RiskInput::deserialize(body).map(HealthRequest::Risk),
        };
        request.map_err(serde::de::Error::custom)
    }
}

impl HealthRequest {
    /// Model a raw request body asks for, decided by key presence alone
    pub fn model_for(body: &Value) -> HealthModelKind {
        if body.get("hr_rest").is_some() {
            HealthModelKind::Risk
        } else {
            HealthModelKind::Weighted
        }
    }

    pub fn model(&self) -> HealthModelKind {
        match self {
            HealthRequest::Weighted(_) => HealthModelKind::Weighted,
            HealthRequest::Risk(_) => HealthModelKind::Risk,
        }
    }

    pub fn ensure_model(&self, requested: Option<HealthModelKind>) -> ValidationResult<()> {
        match requested {
            Some(kind) if kind != self.model() => Err(ValidationError::PolicyMismatch {
                field: "model",
                expected: kind.as_str().to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            HealthRequest::Weighted(input) => input.validate(),
            HealthRequest::Risk(input) => input.validate(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub cardiovascular: String,
    pub exercise_level: String,
    pub sleep_quality: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub hypertension_risk: String,
    pub cardiovascular_risk: String,
}

/// Weighted model output; `health_score` is 0-100, higher is healthier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalsReport {
    pub health_assessment: HealthAssessment,
    pub recommendations: Vec<String>,
    pub health_score: u32,
    pub risk_factors: RiskFactors,
}

/// Risk model output; `risk_score` is 0-100, higher is riskier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_score: u32,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum HealthReport {
    Weighted(VitalsReport),
    Risk(RiskReport),
}

impl HealthReport {
    pub fn model(&self) -> HealthModelKind {
        match self {
            HealthReport::Weighted(_) => HealthModelKind::Weighted,
            HealthReport::Risk(_) => HealthModelKind::Risk,
        }
    }

    /// Health-oriented 0-100 score; risk reports are inverted
    pub fn health_score(&self) -> f64 {
        match self {
            HealthReport::Weighted(report) => report.health_score as f64,
            HealthReport::Risk(report) => 100.0 - report.risk_score as f64,
        }
    }
}
