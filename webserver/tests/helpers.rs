//! Test helper utilities for webserver integration tests

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use shared::ServerConfig;
use webserver::{
    AuditRecord, CityRecord, HealthRecord, Repository, SqliteRepository, Storage, TrafficRecord, WebServer,
};

/// Grid limit used by the test servers
pub const TEST_MAX_GRID_SIZE: u32 = 20;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        database_path: ServerConfig::IN_MEMORY.to_string(),
        max_grid_size: TEST_MAX_GRID_SIZE,
        ..ServerConfig::default()
    }
}

pub type SqliteServer = WebServer<
    SqliteRepository<TrafficRecord>,
    SqliteRepository<HealthRecord>,
    SqliteRepository<CityRecord>,
    SqliteRepository<AuditRecord>,
>;

/// Server backed by a fresh in-memory database
pub fn sqlite_server() -> SqliteServer {
    let config = test_config();
    let storage = Storage::from_config(&config).expect("in-memory storage");
    WebServer::new(
        &config,
        storage.repository(),
        storage.repository(),
        storage.repository(),
        storage.repository(),
    )
}

/// Server with a custom traffic repository and in-memory storage for the rest
pub fn server_with_traffic<T>(traffic: T) -> Router
where
    T: Repository<TrafficRecord> + Clone + 'static,
{
    let config = test_config();
    let storage = Storage::from_config(&config).expect("in-memory storage");
    WebServer::new(
        &config,
        traffic,
        storage.repository::<HealthRecord>(),
        storage.repository::<CityRecord>(),
        storage.repository::<AuditRecord>(),
    )
    .build_router()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(router, uri, body.to_string()).await
}

pub async fn post_raw(router: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(router, request).await
}

/// Assert the error envelope and return its `error` object
pub fn expect_error(status: StatusCode, body: &Value, expected: StatusCode) -> &Value {
    assert_eq!(status, expected, "unexpected body: {body}");
    assert_eq!(body["success"], false);
    &body["error"]
}
