//! Version Store - authoritative holder of configuration history
//!
//! The store owns version-number assignment. Every mutation runs under a
//! single write lock, and callers may pass a commit hook that runs before
//! the lock is released. The registry uses that hook to append the audit
//! entry and broadcast the change, so both observe mutations in the exact
//! order they took effect.

mod crud;
mod query;

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::types::{AuditAction, Config, ConfigVersion, RegistryResult};

/// Result of a successful write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub key: String,
    /// The version that was just appended
    pub version: ConfigVersion,
    /// `Created` for the first version of the pair, `Updated` otherwise
    pub action: AuditAction,
    /// Value of the version this one supersedes
    pub previous: Option<Value>,
}

/// Result of a successful delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub key: String,
    /// `None` when the whole key was deleted
    pub environment: Option<String>,
    /// Versions removed, in storage order
    pub removed: Vec<ConfigVersion>,
    /// Whether the key left the registry
    pub key_removed: bool,
}

/// In-memory versioned store (thread-safe)
pub struct VersionStore {
    pub(crate) configs: RwLock<HashMap<String, Config>>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore {
    // Mutations (from crud.rs)
    pub fn set(&self, key: &str, value: Value, environment: &str, actor: &str) -> WriteOutcome {
        crud::set(self, key, value, environment, actor, |_| ())
    }

    /// Like [`VersionStore::set`], running `on_commit` before the lock is released
    pub fn set_with<F>(
        &self,
        key: &str,
        value: Value,
        environment: &str,
        actor: &str,
        on_commit: F,
    ) -> WriteOutcome
    where
        F: FnOnce(&WriteOutcome),
    {
        crud::set(self, key, value, environment, actor, on_commit)
    }

    pub fn delete(&self, key: &str, environment: Option<&str>) -> Option<DeleteOutcome> {
        crud::delete(self, key, environment, |_| ())
    }

    /// Like [`VersionStore::delete`], running `on_commit` before the lock is released.
    /// The hook is not called when nothing was deleted.
    pub fn delete_with<F>(
        &self,
        key: &str,
        environment: Option<&str>,
        on_commit: F,
    ) -> Option<DeleteOutcome>
    where
        F: FnOnce(&DeleteOutcome),
    {
        crud::delete(self, key, environment, on_commit)
    }

    // Query operations (from query.rs)
    pub fn get(
        &self,
        key: &str,
        environment: &str,
        version: Option<u64>,
    ) -> RegistryResult<ConfigVersion> {
        query::get(self, key, environment, version)
    }

    pub fn get_all_versions(&self, key: &str, environment: Option<&str>) -> Vec<ConfigVersion> {
        query::get_all_versions(self, key, environment)
    }

    pub fn list_keys(&self) -> Vec<String> {
        query::list_keys(self)
    }
}
