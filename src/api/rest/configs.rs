//! Config endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::registry::ConfigRegistry;
use crate::types::{ConfigVersion, RegistryError, RegistryResult};
use crate::validation::WriteRequest;

/// Query parameters for reading one version
#[derive(Debug, Deserialize)]
pub struct GetConfigParams {
    pub env: Option<String>,
    /// Kept as text so a malformed number becomes a registry error
    pub version: Option<String>,
}

/// Query parameters for version history
#[derive(Debug, Deserialize)]
pub struct VersionsParams {
    pub env: Option<String>,
}

/// Query parameters for deletes
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub env: Option<String>,
    pub actor: Option<String>,
}

/// A version tagged with its key
#[derive(Debug, Serialize)]
pub struct KeyedVersion {
    pub key: String,
    #[serde(flatten)]
    pub version: ConfigVersion,
}

#[derive(Debug, Serialize)]
pub struct VersionHistory {
    pub key: String,
    pub versions: Vec<ConfigVersion>,
}

fn parse_version(raw: Option<&str>) -> RegistryResult<Option<u64>> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| RegistryError::invalid(format!("version must be a positive integer, got '{}'", raw))),
    }
}

/// GET /configs - List all keys
pub async fn list_configs(State(registry): State<Arc<ConfigRegistry>>) -> impl IntoResponse {
    Json(json!({ "keys": registry.list_keys() }))
}

/// GET /configs/:key - Latest version for an environment, or a specific one
pub async fn get_config(
    State(registry): State<Arc<ConfigRegistry>>,
    Path(key): Path<String>,
    Query(params): Query<GetConfigParams>,
) -> Result<Json<KeyedVersion>, RegistryError> {
    let version = parse_version(params.version.as_deref())?;
    let found = registry.get(&key, params.env.as_deref(), version)?;
    Ok(Json(KeyedVersion {
        key,
        version: found,
    }))
}

/// GET /configs/:key/versions - Version history, optionally for one environment
pub async fn get_versions(
    State(registry): State<Arc<ConfigRegistry>>,
    Path(key): Path<String>,
    Query(params): Query<VersionsParams>,
) -> Json<VersionHistory> {
    let versions = registry.versions(&key, params.env.as_deref());
    Json(VersionHistory { key, versions })
}

/// POST /configs/:key - Write a new version
pub async fn put_config(
    State(registry): State<Arc<ConfigRegistry>>,
    Path(key): Path<String>,
    Json(request): Json<WriteRequest>,
) -> Result<(StatusCode, Json<KeyedVersion>), RegistryError> {
    let version = registry.set(&key, request)?;
    Ok((StatusCode::CREATED, Json(KeyedVersion { key, version })))
}

/// DELETE /configs/:key - Delete one environment or the whole key
pub async fn delete_config(
    State(registry): State<Arc<ConfigRegistry>>,
    Path(key): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, RegistryError> {
    if registry.delete(&key, params.env.as_deref(), params.actor.as_deref()) {
        Ok(Json(json!({ "deleted": true })))
    } else {
        Err(RegistryError::not_found(
            &key,
            params.env.as_deref().unwrap_or(crate::types::ALL_ENVIRONMENTS),
            None,
        ))
    }
}
