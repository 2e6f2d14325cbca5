//! Audit endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::registry::ConfigRegistry;
use crate::types::AuditEntry;

#[derive(Debug, Serialize)]
pub struct AuditLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub logs: Vec<AuditEntry>,
}

/// GET /audit - Every audit entry, oldest first
pub async fn list_audit(State(registry): State<Arc<ConfigRegistry>>) -> Json<AuditLog> {
    Json(AuditLog {
        key: None,
        logs: registry.audit_log(None),
    })
}

/// GET /audit/:key - Audit entries for one key
pub async fn key_audit(
    State(registry): State<Arc<ConfigRegistry>>,
    Path(key): Path<String>,
) -> Json<AuditLog> {
    let logs = registry.audit_log(Some(&key));
    Json(AuditLog {
        key: Some(key),
        logs,
    })
}
