//! Main webserver implementation
//!
//! The WebServer struct owns the repositories (through the stats aggregator)
//! and the stateless calculators, and wires them into an axum router.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Local, Timelike, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shared::{
    component_debug, component_info, AuditRequest, CityParams, Component, HealthRequest, ServerConfig,
    TrafficRequest,
};

use crate::core::{self, AuditHasher, CityGenerator};
use crate::error::{WebServerError, WebServerResult};
use crate::extract::ApiJson;
use crate::services::StatsAggregator;
use crate::state::WebServerState;
use crate::traits::Repository;
use crate::types::{AuditRecord, CityRecord, HealthRecord, ModelQuery, PolicyQuery, TrafficRecord};

/// Routes listed by the index endpoint
const ENDPOINTS: [&str; 10] = [
    "POST /api/traffic/optimize",
    "GET /api/traffic/realtime",
    "POST /api/health/analyze",
    "GET /api/health/realtime",
    "POST /api/city/generate",
    "POST /api/blockchain/store",
    "GET /api/blockchain/stats",
    "GET /api/stats/overview",
    "GET /healthz",
    "GET /",
];

/// Main webserver struct with dependency injection
#[derive(Clone)]
pub struct WebServer<T, H, C, A> {
    state: Arc<WebServerState>,
    stats: StatsAggregator<T, H, C, A>,
    cities: CityGenerator,
    hasher: AuditHasher,
}

impl<T, H, C, A> WebServer<T, H, C, A>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    /// Create a new webserver with dependency injection
    pub fn new(config: &ServerConfig, traffic: T, health: H, city: C, audit: A) -> Self {
        Self {
            state: Arc::new(WebServerState::new(config.bind_address(), config.max_grid_size)),
            stats: StatsAggregator::new(traffic, health, city, audit),
            cities: CityGenerator::new(config.max_grid_size),
            hasher: AuditHasher,
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(index::<T, H, C, A>))
            .route("/healthz", get(health_check::<T, H, C, A>))
            .route("/api/traffic/optimize", post(optimize_traffic::<T, H, C, A>))
            .route("/api/traffic/realtime", get(traffic_realtime::<T, H, C, A>))
            .route("/api/health/analyze", post(analyze_health::<T, H, C, A>))
            .route("/api/health/realtime", get(health_realtime::<T, H, C, A>))
            .route("/api/city/generate", post(generate_city::<T, H, C, A>))
            .route("/api/blockchain/store", post(store_audit::<T, H, C, A>))
            .route("/api/blockchain/stats", get(network_stats::<T, H, C, A>))
            .route("/api/stats/overview", get(stats_overview::<T, H, C, A>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.clone())
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> WebServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let address = self.state.bind_address.clone();

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {address}: {e}")))?;

        self.state.set_running(true);
        component_info!(Component::Server, address = %address, "Listening on http://{}", address);

        let result = axum::serve(listener, router).with_graceful_shutdown(shutdown).await;
        self.state.set_running(false);

        result.map_err(|e| WebServerError::ServerStartup(format!("Server error: {e}")))
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<WebServerState> {
        &self.state
    }
}

fn stored(id: i64, data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "id": id, "data": data }))
}

fn snapshot(data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

// HTTP Handlers

/// Service info and endpoint list
async fn index<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> Json<Value>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    Json(json!({
        "service": "solarpunk-smart-city",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": server.state.started_at.to_rfc3339(),
        "max_grid_size": server.state.max_grid_size,
        "endpoints": ENDPOINTS,
    }))
}

/// Liveness check
async fn health_check<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> Json<Value>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    Json(json!({
        "ok": true,
        "uptime_seconds": server.state.get_uptime_seconds(),
        "requests": server.state.get_request_count(),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

async fn optimize_traffic<T, H, C, A>(
    State(server): State<WebServer<T, H, C, A>>,
    Query(query): Query<PolicyQuery>,
    ApiJson(request): ApiJson<TrafficRequest>,
) -> WebServerResult<Json<Value>>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    request.ensure_policy(query.policy)?;

    let plan = {
        let mut rng = StdRng::from_entropy();
        core::traffic::optimize(&request, Local::now().hour(), &mut rng)?
    };
    let policy = plan.policy();

    let id = server
        .stats
        .traffic()
        .save(TrafficRecord {
            request,
            plan: plan.clone(),
        })
        .await?;

    component_info!(
        Component::Traffic,
        id,
        policy = policy.as_str(),
        score = plan.score_percent(),
        "Stored traffic plan"
    );
    Ok(stored(id, plan))
}

async fn traffic_realtime<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> Json<Value>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    let reading = core::realtime::traffic_snapshot(&Local::now(), &mut StdRng::from_entropy());
    snapshot(reading)
}

async fn analyze_health<T, H, C, A>(
    State(server): State<WebServer<T, H, C, A>>,
    Query(query): Query<ModelQuery>,
    ApiJson(request): ApiJson<HealthRequest>,
) -> WebServerResult<Json<Value>>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    request.ensure_model(query.model)?;

    let report = core::health::analyze(&request)?;
    let model = report.model();

    let id = server
        .stats
        .health()
        .save(HealthRecord {
            request,
            report: report.clone(),
        })
        .await?;

    component_info!(
        Component::Health,
        id,
        model = model.as_str(),
        score = report.health_score(),
        "Stored health analysis"
    );
    Ok(stored(id, report))
}

async fn health_realtime<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> Json<Value>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    let reading = core::realtime::vitals_snapshot(&Local::now(), &mut StdRng::from_entropy());
    snapshot(reading)
}

async fn generate_city<T, H, C, A>(
    State(server): State<WebServer<T, H, C, A>>,
    ApiJson(params): ApiJson<CityParams>,
) -> WebServerResult<Json<Value>>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();

    let layout = server.cities.generate(&params)?;
    component_debug!(
        Component::City,
        seed = params.seed,
        grid_size = params.grid_size,
        buildings = layout.buildings.len(),
        "Generated city layout"
    );

    let id = server
        .stats
        .city()
        .save(CityRecord {
            params,
            statistics: layout.statistics.clone(),
            features: layout.sustainable_features.clone(),
        })
        .await?;

    component_info!(
        Component::City,
        id,
        score = layout.statistics.sustainability_score,
        "Stored city layout"
    );
    Ok(stored(id, layout))
}

async fn store_audit<T, H, C, A>(
    State(server): State<WebServer<T, H, C, A>>,
    ApiJson(request): ApiJson<AuditRequest>,
) -> WebServerResult<Json<Value>>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    request.validate()?;

    let digests = server
        .hasher
        .digest(&request.data_content, &request.wallet_address, &Utc::now());
    let receipt = server.hasher.receipt(digests.clone(), &mut StdRng::from_entropy());

    let id = server.stats.audit().save(AuditRecord { request, digests }).await?;

    component_info!(
        Component::Audit,
        id,
        transaction_hash = %receipt.digests.transaction_hash,
        "Stored audit digest"
    );
    Ok(stored(id, receipt))
}

async fn network_stats<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> Json<Value>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    let reading = core::realtime::network_snapshot(&Local::now(), &mut StdRng::from_entropy());
    snapshot(reading)
}

async fn stats_overview<T, H, C, A>(State(server): State<WebServer<T, H, C, A>>) -> WebServerResult<Json<Value>>
where
    T: Repository<TrafficRecord> + Clone + 'static,
    H: Repository<HealthRecord> + Clone + 'static,
    C: Repository<CityRecord> + Clone + 'static,
    A: Repository<AuditRecord> + Clone + 'static,
{
    server.state.record_request();
    let overview = server.stats.overview().await?;
    Ok(snapshot(overview))
}
