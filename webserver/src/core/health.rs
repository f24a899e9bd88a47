//! Health heuristics
//!
//! [`WeightedModel`] scores vitals into a 0-100 composite; [`RiskModel`]
//! accumulates fixed penalties from a lifestyle profile.

use shared::{
    HealthAssessment, HealthModelKind, HealthReport, HealthRequest, RiskFactors, RiskInput, RiskReport,
    ValidationResult, VitalsInput, VitalsReport,
};

/// A health analysis model
pub trait HealthModel {
    type Input;

    fn kind(&self) -> HealthModelKind;

    /// Validate `input` and produce a report
    fn analyze(&self, input: &Self::Input) -> ValidationResult<HealthReport>;
}

/// Cardiovascular, exercise and sleep sub-scores weighted 40/30/30
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedModel;

impl WeightedModel {
    const MAX_RECOMMENDATIONS: usize = 3;

    fn cardiovascular_score(input: &VitalsInput) -> i64 {
        let mut score = 100;
        if input.heart_rate < 60 || input.heart_rate > 100 {
            score -= 20;
        }
        if input.systolic_bp > 140 || input.diastolic_bp > 90 {
            score -= 30;
        } else if input.systolic_bp > 120 || input.diastolic_bp > 80 {
            score -= 10;
        }
        score
    }

    fn sleep_score(hours: f64) -> i64 {
        if !(6.0..=9.0).contains(&hours) {
            70
        } else if !(7.0..=8.0).contains(&hours) {
            90
        } else {
            100
        }
    }

    fn recommendations(input: &VitalsInput) -> Vec<String> {
        let mut recommendations = Vec::new();
        if input.heart_rate > 100 {
            recommendations.push("Try relaxation training to bring your resting heart rate down".to_string());
        }
        if input.systolic_bp > 120 {
            recommendations.push("Limit salt intake to keep blood pressure healthy".to_string());
        }
        if input.exercise_minutes < 30 {
            recommendations.push("Increase daily activity to at least 30 minutes".to_string());
        }
        if input.sleep_hours < 7.0 {
            recommendations.push("Aim for 7-8 hours of sleep each night".to_string());
        }

        if recommendations.is_empty() {
            recommendations = vec![
                "Keep up your current healthy lifestyle".to_string(),
                "Stay consistent with exercise and sleep routines".to_string(),
                "Schedule regular health check-ups".to_string(),
            ];
        }
        recommendations.truncate(Self::MAX_RECOMMENDATIONS);
        recommendations
    }
}

impl HealthModel for WeightedModel {
    type Input = VitalsInput;

    fn kind(&self) -> HealthModelKind {
        HealthModelKind::Weighted
    }

    fn analyze(&self, input: &VitalsInput) -> ValidationResult<HealthReport> {
        input.validate()?;

        let cardiovascular = Self::cardiovascular_score(input);
        let exercise = (input.exercise_minutes * 2).min(100);
        let sleep = Self::sleep_score(input.sleep_hours);

        let exercise_level = match input.exercise_minutes {
            m if m >= 60 => "excellent",
            m if m >= 30 => "adequate",
            _ => "insufficient",
        };
        let sleep_quality = match sleep {
            s if s >= 90 => "excellent",
            s if s >= 70 => "good",
            _ => "needs improvement",
        };

        let composite = cardiovascular as f64 * 0.4 + exercise as f64 * 0.3 + sleep as f64 * 0.3;

        Ok(HealthReport::Weighted(VitalsReport {
            health_assessment: HealthAssessment {
                cardiovascular: if cardiovascular >= 80 { "good" } else { "needs attention" }.to_string(),
                exercise_level: exercise_level.to_string(),
                sleep_quality: sleep_quality.to_string(),
            },
            recommendations: Self::recommendations(input),
            health_score: composite.clamp(0.0, 100.0) as u32,
            risk_factors: RiskFactors {
                hypertension_risk: if input.systolic_bp > 140 { "high" } else { "low" }.to_string(),
                cardiovascular_risk: if input.heart_rate > 90 { "medium" } else { "low" }.to_string(),
            },
        }))
    }
}

/// Adds fixed penalties per triggered rule, clamped to 0-100
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskModel;

impl RiskModel {
    const HYPERTENSION: [&'static str; 2] = ["hypertension", "高血压"];
    const DIABETES: [&'static str; 2] = ["diabetes", "糖尿病"];

    fn has_condition(conditions: &[String], keywords: &[&str]) -> bool {
        conditions
            .iter()
            .map(|c| c.trim().to_lowercase())
            .any(|c| keywords.contains(&c.as_str()))
    }
}

impl HealthModel for RiskModel {
    type Input = RiskInput;

    fn kind(&self) -> HealthModelKind {
        HealthModelKind::Risk
    }

    fn analyze(&self, input: &RiskInput) -> ValidationResult<HealthReport> {
        input.validate()?;

        let mut risk: i64 = 0;
        let mut insights = Vec::new();
        let mut recommendations = Vec::new();
        let mut note = |insight: &str, recommendation: &str| {
            insights.push(insight.to_string());
            recommendations.push(recommendation.to_string());
        };

        if input.hr_rest > 90 {
            risk += 20;
            note(
                "Resting heart rate is elevated",
                "Consider low-intensity aerobic training and monitor blood pressure",
            );
        } else if input.hr_rest < 50 && input.age > 30 {
            note(
                "Resting heart rate is low",
                "See a doctor if it comes with dizziness or fatigue",
            );
        }

        if input.sleep_hours < 6.0 {
            risk += 20;
            note("Not enough sleep", "Keep a steady 7-8 hours of sleep");
        } else if input.sleep_hours > 9.0 {
            note("Sleeping longer than usual", "Keep a regular schedule and add daytime activity");
        }

        if input.steps < 5000 {
            risk += 15;
            note("Daily activity is low", "Build up gradually to 8000-10000 steps a day");
        } else if input.steps > 15000 {
            note("Daily activity is high", "Stay hydrated and stretch to avoid overtraining");
        }

        if Self::has_condition(&input.conditions, &Self::HYPERTENSION) {
            risk += 15;
            note(
                "Existing hypertension risk factor",
                "Reduce salt, monitor blood pressure and follow prescribed medication",
            );
        }
        if Self::has_condition(&input.conditions, &Self::DIABETES) {
            risk += 15;
            note(
                "Existing glucose metabolism risk factor",
                "Control carbohydrate intake and exercise regularly",
            );
        }

        // Age adds risk without its own insight
        if input.age >= 55 {
            risk += 10;
        }

        if insights.is_empty() {
            insights.push("Overall indicators are within acceptable range".to_string());
            recommendations.push("Keep a balanced diet, regular routine and moderate exercise".to_string());
        }

        Ok(HealthReport::Risk(RiskReport {
            risk_score: risk.clamp(0, 100) as u32,
            insights,
            recommendations,
        }))
    }
}

/// Run whichever model the request shape selects
pub fn analyze(request: &HealthRequest) -> ValidationResult<HealthReport> {
    match request {
        HealthRequest::Weighted(input) => WeightedModel.analyze(input),
        HealthRequest::Risk(input) => RiskModel.analyze(input),
    }
}
