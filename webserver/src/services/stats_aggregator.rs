//! Read-only aggregation over the result repositories

use chrono::Local;
use std::time::Duration;

use shared::{
    component_debug, AuditStats, CityStats, Component, HealthStats, ModuleStats, StatsOverview, TrafficStats,
};

use crate::core::round_to;
use crate::error::WebServerResult;
use crate::traits::Repository;
use crate::types::{AuditRecord, CityRecord, HealthRecord, TrafficRecord};

/// Window used for score averages and recent counts
pub const STATS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Reported audit success rate; the ledger is simulated
const AUDIT_SUCCESS_RATE: &str = "99.9%";

#[derive(Clone)]
pub struct StatsAggregator<T, H, C, A> {
    traffic: T,
    health: H,
    city: C,
    audit: A,
}

impl<T, H, C, A> StatsAggregator<T, H, C, A>
where
    T: Repository<TrafficRecord>,
    H: Repository<HealthRecord>,
    C: Repository<CityRecord>,
    A: Repository<AuditRecord>,
{
    pub fn new(traffic: T, health: H, city: C, audit: A) -> Self {
        Self {
            traffic,
            health,
            city,
            audit,
        }
    }

    pub fn traffic(&self) -> &T {
        &self.traffic
    }

    pub fn health(&self) -> &H {
        &self.health
    }

    pub fn city(&self) -> &C {
        &self.city
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Total row counts plus averages and recent counts over the window
    pub async fn overview(&self) -> WebServerResult<StatsOverview> {
        let module_stats = ModuleStats {
            traffic_optimization: TrafficStats {
                total_optimizations: self.traffic.count().await?,
                avg_efficiency_score: round_to(self.traffic.average_score_since(STATS_WINDOW).await?, 1),
            },
            health_analysis: HealthStats {
                total_analyses: self.health.count().await?,
                avg_health_score: round_to(self.health.average_score_since(STATS_WINDOW).await?, 1),
            },
            city_generation: CityStats {
                total_cities: self.city.count().await?,
                avg_sustainability: round_to(self.city.average_score_since(STATS_WINDOW).await?, 1),
            },
            blockchain_storage: AuditStats {
                total_transactions: self.audit.count().await?,
                recent_transactions: self.audit.count_since(STATS_WINDOW).await?,
                success_rate: AUDIT_SUCCESS_RATE.to_string(),
            },
        };

        let total_records = module_stats.traffic_optimization.total_optimizations
            + module_stats.health_analysis.total_analyses
            + module_stats.city_generation.total_cities
            + module_stats.blockchain_storage.total_transactions;

        component_debug!(Component::Stats, total_records, "Aggregated module stats");

        Ok(StatsOverview {
            system_status: "operational".to_string(),
            total_records,
            module_stats,
            timestamp: Local::now().to_rfc3339(),
        })
    }
}
