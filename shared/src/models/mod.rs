//! Request and result types for every calculator
//!
//! Each calculator has its own module: the request body (with validation),
//! the result it produces, and any selector enum for its policy variants.

pub mod audit;
pub mod city;
pub mod health;
pub mod realtime;
pub mod stats;
pub mod traffic;

pub use audit::{AuditDigests, AuditReceipt, AuditRequest};
pub use city::{Building, BuildingKind, CityLayout, CityParams, CityStatistics, SustainableFeatures, MAX_BUILDING_HEIGHT};
pub use health::{
    HealthAssessment, HealthModelKind, HealthReport, HealthRequest, RiskFactors, RiskInput, RiskReport,
    VitalsInput, VitalsReport,
};
pub use realtime::{NetworkSnapshot, TrafficSnapshot, VitalsSnapshot};
pub use stats::{AuditStats, CityStats, HealthStats, ModuleStats, StatsOverview, TrafficStats};
pub use traffic::{
    DensityInput, DensityPlan, ProportionalInput, ProportionalPlan, SignalTiming, TrafficPlan,
    TrafficPolicyKind, TrafficPrediction, TrafficRequest,
};
