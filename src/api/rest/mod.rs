//! REST API module for HTTP endpoints
//!
//! - `GET /configs` - List keys
//! - `GET /configs/:key` - Latest (or a specific) version
//! - `GET /configs/:key/versions` - Version history
//! - `POST /configs/:key` - Write a new version
//! - `DELETE /configs/:key` - Delete one environment or the whole key
//! - `GET /audit`, `GET /audit/:key` - Audit trail

pub mod audit;
pub mod configs;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::RegistryError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        match self {
            RegistryError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(ApiError::not_found("Config not found"))).into_response()
            }
            RegistryError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message))).into_response()
            }
        }
    }
}
