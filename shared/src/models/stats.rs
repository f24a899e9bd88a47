//! System overview returned by `GET /api/stats/overview`

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub total_optimizations: u64,
    pub avg_efficiency_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStats {
    pub total_analyses: u64,
    pub avg_health_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityStats {
    pub total_cities: u64,
    pub avg_sustainability: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_transactions: u64,
    /// Rows stored within the stats window
    pub recent_transactions: u64,
    pub success_rate: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    pub traffic_optimization: TrafficStats,
    pub health_analysis: HealthStats,
    pub city_generation: CityStats,
    pub blockchain_storage: AuditStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsOverview {
    pub system_status: String,
    pub total_records: u64,
    pub module_stats: ModuleStats,
    pub timestamp: String,
}
