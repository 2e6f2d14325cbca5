//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{audit, configs};
use super::sse::reload_handler;
use crate::audit::AuditStats;
use crate::registry::ConfigRegistry;

/// Create the Axum router with all endpoints
pub fn create_router(registry: Arc<ConfigRegistry>) -> Router {
    // CORS configuration - allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Live reload stream
        .route("/reload", get(reload_handler))
        // Health check
        .route("/health", get(health_check))
        // Config endpoints
        .route("/configs", get(configs::list_configs))
        .route(
            "/configs/:key",
            get(configs::get_config)
                .post(configs::put_config)
                .delete(configs::delete_config),
        )
        .route("/configs/:key/versions", get(configs::get_versions))
        // Audit endpoints
        .route("/audit", get(audit::list_audit))
        .route("/audit/:key", get(audit::key_audit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(registry)
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub keys: usize,
    pub subscribers: usize,
    pub audit: AuditStats,
}

/// Health check endpoint
async fn health_check(State(registry): State<Arc<ConfigRegistry>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        keys: registry.store().len(),
        subscribers: registry.hub().count(),
        audit: registry.audit_stats(),
    })
}
