//! JSON body extraction
//!
//! Bodies are parsed to a `Value` first and then deserialized into the
//! request type, so both syntax errors and type errors are answered with
//! the usual error envelope instead of axum's plain-text rejection.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use shared::{AuditRequest, CityParams, HealthModelKind, HealthRequest, TrafficPolicyKind, TrafficRequest};

use crate::error::{WebServerError, WebServerResult};

/// Request body types that can be built from parsed JSON
pub trait JsonBody: Sized {
    fn from_json(body: Value) -> WebServerResult<Self>;
}

/// `Json` extractor whose rejection is a `WebServerError`
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: JsonBody,
    S: Send + Sync,
{
    type Rejection = WebServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        T::from_json(body).map(ApiJson)
    }
}

fn deserialize_at<T: DeserializeOwned>(body: Value) -> WebServerResult<T> {
    Ok(serde_path_to_error::deserialize(body)?)
}

impl JsonBody for TrafficRequest {
    fn from_json(body: Value) -> WebServerResult<Self> {
        match TrafficRequest::policy_for(&body) {
            TrafficPolicyKind::Proportional => deserialize_at(body).map(TrafficRequest::Proportional),
            TrafficPolicyKind::Density => deserialize_at(body).map(TrafficRequest::Density),
        }
    }
}

impl JsonBody for HealthRequest {
    fn from_json(body: Value) -> WebServerResult<Self> {
        match HealthRequest::model_for(&body) {
            HealthModelKind::Risk => deserialize_at(body).map(HealthRequest::Risk),
            HealthModelKind::Weighted => deserialize_at(body).map(HealthRequest::Weighted),
        }
    }
}

impl JsonBody for CityParams {
    fn from_json(body: Value) -> WebServerResult<Self> {
        deserialize_at(body)
    }
}

impl JsonBody for AuditRequest {
    fn from_json(body: Value) -> WebServerResult<Self> {
        deserialize_at(body)
    }
}
