//! Read-only queries for the version store

use crate::types::{ConfigVersion, RegistryError, RegistryResult};

use super::VersionStore;

/// Fetch one version; the latest of `environment` when `version` is `None`
pub fn get(
    store: &VersionStore,
    key: &str,
    environment: &str,
    version: Option<u64>,
) -> RegistryResult<ConfigVersion> {
    let configs = store.configs.read();
    let config = configs
        .get(key)
        .ok_or_else(|| RegistryError::not_found(key, environment, version))?;

    let found = match version {
        Some(wanted) => config.in_environment(environment).find(|v| v.version == wanted),
        None => config.latest(environment),
    };

    found
        .cloned()
        .ok_or_else(|| RegistryError::not_found(key, environment, version))
}

/// Versions of `key` in storage order, optionally filtered to one environment
pub fn get_all_versions(
    store: &VersionStore,
    key: &str,
    environment: Option<&str>,
) -> Vec<ConfigVersion> {
    let configs = store.configs.read();
    let Some(config) = configs.get(key) else {
        return Vec::new();
    };

    match environment {
        Some(env) => config.in_environment(env).cloned().collect(),
        None => config.versions.clone(),
    }
}

/// Keys with at least one version, sorted
pub fn list_keys(store: &VersionStore) -> Vec<String> {
    let mut keys: Vec<String> = store.configs.read().keys().cloned().collect();
    keys.sort();
    keys
}
