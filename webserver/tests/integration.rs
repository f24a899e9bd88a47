//! Integration tests for webserver
//!
//! These drive the full router (handlers, calculators and in-memory SQLite)
//! through `tower::ServiceExt::oneshot`.

mod helpers;

use axum::http::StatusCode;
use std::sync::Arc;

use fixtures::*;
use helpers::*;
use webserver::{MockRepository, TrafficRecord, WebServerError};

#[tokio::test]
async fn test_index_lists_endpoints() {
    let router = sqlite_server().build_router();

    let (status, body) = get_json(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /api/city/generate"));
    assert_eq!(body["max_grid_size"], TEST_MAX_GRID_SIZE);
}

#[tokio::test]
async fn test_healthz_reports_liveness() {
    let server = sqlite_server();
    let router = server.build_router();

    get_json(&router, "/api/traffic/realtime").await;
    let (status, body) = get_json(&router, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["requests"], 1);
    assert_eq!(server.state().get_request_count(), 1);
}

#[tokio::test]
async fn test_proportional_equal_demand() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/traffic/optimize", &proportional_body(&[10, 10, 10, 10])).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], 1);
    let data = &body["data"];
    assert_eq!(data["policy"], "proportional");
    assert_eq!(data["cycle_seconds"], 90);
    let greens: Vec<f64> = data["green_times"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_f64().unwrap())
        .collect();
    assert_eq!(greens.len(), 4);
    assert!(greens.iter().all(|g| (g - 22.5).abs() < 0.01));
}

#[tokio::test]
async fn test_density_plan_fills_cycle() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/traffic/optimize?policy=density", &density_body()).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let timing = &body["data"]["signal_optimization"];
    assert_eq!(body["data"]["policy"], "density");
    let green = timing["green_time"].as_i64().unwrap();
    let red = timing["red_time"].as_i64().unwrap();
    assert_eq!(green + red, 90);
}

#[tokio::test]
async fn test_demand_length_mismatch_is_rejected() {
    let router = sqlite_server().build_router();
    let body = serde_json::json!({ "intersections": 1, "approaches": 4, "demand": [10, 10, 10] });

    let (status, body) = post_json(&router, "/api/traffic/optimize", &body).await;

    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["kind"], "validation");
    assert_eq!(error["field"], "demand");
}

#[tokio::test]
async fn test_policy_override_must_match_body() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(
        &router,
        "/api/traffic/optimize?policy=density",
        &proportional_body(&[5, 5, 5, 5]),
    )
    .await;

    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "policy");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let router = sqlite_server().build_router();

    let (status, body) = post_raw(&router, "/api/traffic/optimize", "{not json".to_string()).await;

    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["kind"], "malformed");
    assert!(error["field"].is_null());
}

#[tokio::test]
async fn test_wrongly_typed_demand_names_the_element() {
    let router = sqlite_server().build_router();
    let body = serde_json::json!({ "approaches": 4, "demand": [1, 2, "x", 4] });

    let (status, body) = post_json(&router, "/api/traffic/optimize", &body).await;

    let error = expect_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["kind"], "validation");
    assert_eq!(error["field"], "demand[2]");
}

#[tokio::test]
async fn test_wrongly_typed_steps_names_the_field() {
    let router = sqlite_server().build_router();
    let mut body = risk_body();
    body["steps"] = serde_json::json!("many");

    let (status, body) = post_json(&router, "/api/health/analyze", &body).await;

    let error = expect_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["kind"], "validation");
    assert_eq!(error["field"], "steps");
}

#[tokio::test]
async fn test_health_models() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/health/analyze", &vitals_body()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["model"], "weighted");
    let score = body["data"]["health_score"].as_u64().unwrap();
    assert!(score <= 100);

    let (status, body) = post_json(&router, "/api/health/analyze?model=risk", &risk_body()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["model"], "risk");
    assert_eq!(body["id"], 2);
    let risk = body["data"]["risk_score"].as_u64().unwrap();
    assert!(risk <= 100);
}

#[tokio::test]
async fn test_health_model_override_must_match_body() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/health/analyze?model=risk", &vitals_body()).await;

    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "model");
}

#[tokio::test]
async fn test_city_generation_is_deterministic() {
    let router = sqlite_server().build_router();

    let (status, first) = post_json(&router, "/api/city/generate", &city_body(42, 2, 10)).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    let (_, second) = post_json(&router, "/api/city/generate", &city_body(42, 2, 10)).await;

    assert_eq!(first["data"], second["data"]);
    assert_ne!(first["id"], second["id"]);

    let buildings = first["data"]["buildings"].as_array().unwrap();
    assert_eq!(buildings.len(), 4);
    for building in buildings {
        let height = building["height"].as_u64().unwrap();
        assert!((2..=10).contains(&height));
    }
}

#[tokio::test]
async fn test_city_accepts_negative_seed() {
    let router = sqlite_server().build_router();

    let (status, first) = post_json(&router, "/api/city/generate", &city_body(-1, 3, 10)).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    let (_, second) = post_json(&router, "/api/city/generate", &city_body(-1, 3, 10)).await;

    assert_eq!(first["data"]["buildings"].as_array().unwrap().len(), 9);
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_city_grid_bounds() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/city/generate", &city_body(1, 0, 10)).await;
    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "grid_size");

    let too_big = TEST_MAX_GRID_SIZE as i64 + 1;
    let (status, body) = post_json(&router, "/api/city/generate", &city_body(1, too_big, 10)).await;
    expect_error(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&router, "/api/city/generate", &city_body(1, 1, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["buildings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_blockchain_store_returns_receipt() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/blockchain/store", &audit_body("meter reading 42 kWh")).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["data_hash"].as_str().unwrap().len(), 64);
    let tx = data["transaction_hash"].as_str().unwrap();
    assert!(tx.starts_with("0x"));
    assert_eq!(tx.len(), 42);
    assert!(data["hashed_at"].is_string());
    assert_eq!(data["confirmation_time"], "~15s");
}

#[tokio::test]
async fn test_blockchain_store_requires_content() {
    let router = sqlite_server().build_router();

    let (status, body) = post_json(&router, "/api/blockchain/store", &audit_body("   ")).await;

    let error = expect_error(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "data_content");
}

#[tokio::test]
async fn test_realtime_snapshots() {
    let router = sqlite_server().build_router();

    let (status, body) = get_json(&router, "/api/traffic/realtime").await;
    assert_eq!(status, StatusCode::OK);
    let signal = body["data"]["signal_status"].as_str().unwrap();
    assert!(signal == "operational" || signal == "maintenance");

    let (status, body) = get_json(&router, "/api/health/realtime").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["heart_rate"].is_i64());

    let (status, body) = get_json(&router, "/api/blockchain/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["gas_price"].as_str().unwrap().ends_with("Gwei"));
}

#[tokio::test]
async fn test_stats_overview_counts_stored_results() {
    let router = sqlite_server().build_router();

    post_json(&router, "/api/traffic/optimize", &proportional_body(&[10, 10, 10, 10])).await;
    post_json(&router, "/api/traffic/optimize", &density_body()).await;
    post_json(&router, "/api/health/analyze", &vitals_body()).await;
    post_json(&router, "/api/city/generate", &city_body(7, 3, 30)).await;
    post_json(&router, "/api/blockchain/store", &audit_body("batch")).await;
    // Rejected requests are not stored
    post_json(&router, "/api/city/generate", &city_body(7, 0, 30)).await;

    let (status, body) = get_json(&router, "/api/stats/overview").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["system_status"], "operational");
    assert_eq!(data["total_records"], 5);
    assert_eq!(data["module_stats"]["traffic_optimization"]["total_optimizations"], 2);
    assert_eq!(data["module_stats"]["health_analysis"]["total_analyses"], 1);
    assert_eq!(data["module_stats"]["city_generation"]["total_cities"], 1);
    assert_eq!(data["module_stats"]["blockchain_storage"]["total_transactions"], 1);
    assert_eq!(data["module_stats"]["blockchain_storage"]["recent_transactions"], 1);
    assert_eq!(data["module_stats"]["blockchain_storage"]["success_rate"], "99.9%");
    let avg = data["module_stats"]["traffic_optimization"]["avg_efficiency_score"].as_f64().unwrap();
    assert!(avg > 0.0 && avg <= 100.0);
}

#[tokio::test]
async fn test_storage_failure_maps_to_server_error() {
    let mut failing = MockRepository::<TrafficRecord>::new();
    failing
        .expect_save()
        .times(1)
        .returning(|_| Err(WebServerError::StoragePoisoned));
    let router = server_with_traffic(Arc::new(failing));

    let (status, body) = post_json(&router, "/api/traffic/optimize", &proportional_body(&[1, 2, 3, 4])).await;

    let error = expect_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["kind"], "storage");
    assert!(error["field"].is_null());
}
