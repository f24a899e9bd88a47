//! WebServer-specific error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use shared::{component_error, Component, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("Invalid request body: {message}")]
    InvalidBody { field: Option<String>, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage connection lock poisoned")]
    StoragePoisoned,

    #[error("Background task failed: {0}")]
    TaskJoin(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebServerError {
    pub fn config(message: impl Into<String>) -> Self {
        WebServerError::Config(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::Validation(_) => StatusCode::BAD_REQUEST,
            WebServerError::MalformedBody(rejection) => rejection.status(),
            WebServerError::InvalidBody { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable category for the error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            WebServerError::Validation(_) | WebServerError::InvalidBody { .. } => "validation",
            WebServerError::MalformedBody(_) => "malformed",
            WebServerError::Storage(_) | WebServerError::StoragePoisoned | WebServerError::TaskJoin(_) => "storage",
            _ => "internal",
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            component_error!(Component::Server, error = %self, "Request failed");
        }

        let field = match &self {
            WebServerError::Validation(err) => Some(err.field()),
            WebServerError::InvalidBody { field, .. } => field.as_deref(),
            _ => None,
        };
        let body = json!({
            "success": false,
            "error": {
                "kind": self.kind(),
                "field": field,
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for WebServerError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        // an empty path means the body itself had the wrong shape
        let field = err.path().iter().next().map(|_| err.path().to_string());
        WebServerError::InvalidBody {
            field,
            message: err.inner().to_string(),
        }
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = WebServerError::from(ValidationError::Negative { field: "demand" });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_body_type_error_keeps_field_path() {
        let body = json!({ "approaches": 4, "demand": [1, 2, "x", 4] });
        let err = serde_path_to_error::deserialize::<_, shared::ProportionalInput>(body).unwrap_err();

        let err = WebServerError::from(err);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "validation");
        match err {
            WebServerError::InvalidBody { field, .. } => assert_eq!(field.as_deref(), Some("demand[2]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_body_shape_error_has_no_field() {
        let err = serde_path_to_error::deserialize::<_, shared::CityParams>(json!("city")).unwrap_err();

        match WebServerError::from(err) {
            WebServerError::InvalidBody { field, .. } => assert!(field.is_none()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_storage_maps_to_server_error() {
        let err = WebServerError::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "storage");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
