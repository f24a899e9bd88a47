//! Type definitions for webserver
//!
//! Records are what the handlers hand to the repositories: the validated
//! request together with the result computed from it.

use serde::Deserialize;
use shared::{
    AuditDigests, AuditRequest, CityParams, CityStatistics, HealthModelKind, HealthReport, HealthRequest,
    SustainableFeatures, TrafficPlan, TrafficPolicyKind, TrafficRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficRecord {
    pub request: TrafficRequest,
    pub plan: TrafficPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecord {
    pub request: HealthRequest,
    pub report: HealthReport,
}

/// City rows keep the aggregates, not the building list
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub params: CityParams,
    pub statistics: CityStatistics,
    pub features: SustainableFeatures,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub request: AuditRequest,
    pub digests: AuditDigests,
}

/// `?policy=` on the traffic endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PolicyQuery {
    pub policy: Option<TrafficPolicyKind>,
}

/// `?model=` on the health endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ModelQuery {
    pub model: Option<HealthModelKind>,
}
