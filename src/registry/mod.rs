//! Config Registry - sequences store, audit trail and notification hub
//!
//! One `ConfigRegistry` is built at startup and shared behind an `Arc`.
//! Tests build a fresh instance per case instead of resetting globals.

use std::sync::Arc;

use crate::audit::{AuditSink, AuditStats, MemoryAuditLog};
use crate::hub::{NotificationHub, Subscription};
use crate::settings::Settings;
use crate::store::{DeleteOutcome, VersionStore, WriteOutcome};
use crate::types::{
    AuditAction, AuditChange, AuditDiff, AuditEntry, AuditSnapshot, ConfigVersion,
    RegistryError, RegistryResult, ReloadEvent, ALL_ENVIRONMENTS,
};
use crate::validation::{resolve_label, validate_key, WriteRequest};

/// The registry: versioned store + audit trail + live notifications
pub struct ConfigRegistry {
    store: VersionStore,
    audit: Arc<dyn AuditSink>,
    hub: NotificationHub,
    settings: Settings,
}

impl ConfigRegistry {
    /// Create a registry with default settings and an in-memory audit log
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::with_audit_sink(settings, Arc::new(MemoryAuditLog::new()))
    }

    /// Create a registry that records audit entries into `audit`
    pub fn with_audit_sink(settings: Settings, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store: VersionStore::new(),
            audit,
            hub: NotificationHub::new(settings.subscriber_buffer),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Read one version; the latest when `version` is `None`
    pub fn get(
        &self,
        key: &str,
        environment: Option<&str>,
        version: Option<u64>,
    ) -> RegistryResult<ConfigVersion> {
        let environment = resolve_label(environment, &self.settings.default_environment);
        self.store.get(key, &environment, version)
    }

    /// Version history of `key`, across all environments when none is given
    pub fn versions(&self, key: &str, environment: Option<&str>) -> Vec<ConfigVersion> {
        let environment = environment.filter(|e| !e.is_empty());
        self.store.get_all_versions(key, environment)
    }

    /// Write a new version.
    ///
    /// The audit entry and the reload broadcast happen before this returns,
    /// in the same critical section as the version assignment.
    pub fn set(&self, key: &str, request: WriteRequest) -> RegistryResult<ConfigVersion> {
        validate_key(key)?;
        let value = request
            .value
            .ok_or_else(|| RegistryError::invalid("value is required"))?;
        let environment = resolve_label(
            request.environment.as_deref(),
            &self.settings.default_environment,
        );
        let actor = resolve_label(request.actor.as_deref(), &self.settings.default_actor);

        let outcome = self
            .store
            .set_with(key, value, &environment, &actor, |outcome| self.on_write(outcome));

        tracing::info!(
            key = %outcome.key,
            environment = %outcome.version.environment,
            version = outcome.version.version,
            actor = %outcome.version.created_by,
            action = %outcome.action,
            "config written"
        );
        Ok(outcome.version)
    }

    /// Delete one environment of `key`, or the whole key when `environment` is `None`.
    ///
    /// Returns `false` (and records nothing) when there was nothing to delete.
    pub fn delete(&self, key: &str, environment: Option<&str>, actor: Option<&str>) -> bool {
        let environment = environment.filter(|e| !e.is_empty());
        let actor = resolve_label(actor, &self.settings.default_actor);

        let outcome = self
            .store
            .delete_with(key, environment, |outcome| self.on_delete(outcome, &actor));

        match outcome {
            Some(outcome) => {
                tracing::info!(
                    key = %outcome.key,
                    environment = outcome.environment.as_deref().unwrap_or(ALL_ENVIRONMENTS),
                    removed = outcome.removed.len(),
                    key_removed = outcome.key_removed,
                    actor = %actor,
                    "config deleted"
                );
                true
            }
            None => {
                tracing::debug!(key, environment = ?environment, "delete found nothing");
                false
            }
        }
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.store.list_keys()
    }

    /// Audit entries for `key` (or all), oldest first
    pub fn audit_log(&self, key: Option<&str>) -> Vec<AuditEntry> {
        self.audit.query(key)
    }

    pub fn audit_stats(&self) -> AuditStats {
        self.audit.stats()
    }

    /// Register for live reload notifications
    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Close every live subscription
    pub fn shutdown(&self) {
        self.hub.close();
    }

    // Runs under the store write lock
    fn on_write(&self, outcome: &WriteOutcome) {
        let version = &outcome.version;
        self.audit.record(AuditChange {
            action: outcome.action,
            key: outcome.key.clone(),
            environment: version.environment.clone(),
            version: Some(version.version),
            actor: version.created_by.clone(),
            diff: AuditDiff {
                before: outcome.previous.clone().map(AuditSnapshot::Value),
                after: Some(version.value.clone()),
            },
        });

        self.hub.broadcast(ReloadEvent {
            key: outcome.key.clone(),
            environment: version.environment.clone(),
            version: version.version,
        });
    }

    // Runs under the store write lock
    fn on_delete(&self, outcome: &DeleteOutcome, actor: &str) {
        self.audit.record(AuditChange {
            action: AuditAction::Deleted,
            key: outcome.key.clone(),
            environment: outcome
                .environment
                .clone()
                .unwrap_or_else(|| ALL_ENVIRONMENTS.to_string()),
            version: None,
            actor: actor.to_string(),
            diff: AuditDiff {
                before: Some(AuditSnapshot::Versions(outcome.removed.clone())),
                after: None,
            },
        });
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}
