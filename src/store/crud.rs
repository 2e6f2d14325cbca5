//! Mutations for the version store

use serde_json::Value;

use crate::types::{AuditAction, Config, ConfigVersion};

use super::{DeleteOutcome, VersionStore, WriteOutcome};

/// Append the next version for (key, environment)
/// (thread-safe: holds write lock during entire operation, hook included)
pub fn set<F>(
    store: &VersionStore,
    key: &str,
    value: Value,
    environment: &str,
    actor: &str,
    on_commit: F,
) -> WriteOutcome
where
    F: FnOnce(&WriteOutcome),
{
    let mut configs = store.configs.write();
    let config = configs
        .entry(key.to_string())
        .or_insert_with(|| Config::new(key.to_string()));

    let latest = config.latest(environment);
    let latest_version = latest.map_or(0, |v| v.version);
    let previous = latest.map(|v| v.value.clone());

    let version = ConfigVersion::new(
        latest_version + 1,
        value,
        environment.to_string(),
        actor.to_string(),
    );
    config.versions.push(version.clone());

    let outcome = WriteOutcome {
        key: key.to_string(),
        action: if latest_version == 0 {
            AuditAction::Created
        } else {
            AuditAction::Updated
        },
        version,
        previous,
    };

    on_commit(&outcome);
    outcome
}

/// Remove one environment's versions, or the whole key when `environment` is `None`
/// (thread-safe: holds write lock during entire operation, hook included)
pub fn delete<F>(
    store: &VersionStore,
    key: &str,
    environment: Option<&str>,
    on_commit: F,
) -> Option<DeleteOutcome>
where
    F: FnOnce(&DeleteOutcome),
{
    let mut configs = store.configs.write();

    let outcome = match environment {
        Some(env) => {
            let config = configs.get_mut(key)?;
            if config.in_environment(env).next().is_none() {
                return None;
            }

            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut config.versions)
                .into_iter()
                .partition(|v| v.environment == env);
            config.versions = kept;

            let key_removed = config.is_empty();
            if key_removed {
                configs.remove(key);
            }

            DeleteOutcome {
                key: key.to_string(),
                environment: Some(env.to_string()),
                removed,
                key_removed,
            }
        }
        None => {
            let config = configs.remove(key)?;
            DeleteOutcome {
                key: key.to_string(),
                environment: None,
                removed: config.versions,
                key_removed: true,
            }
        }
    };

    on_commit(&outcome);
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_versions_increase_per_pair() {
        let store = VersionStore::new();
        let first = store.set("timeout", json!(30), "production", "ops");
        let second = store.set("timeout", json!(60), "production", "ops");

        assert_eq!(first.version.version, 1);
        assert_eq!(first.action, AuditAction::Created);
        assert_eq!(first.previous, None);

        assert_eq!(second.version.version, 2);
        assert_eq!(second.action, AuditAction::Updated);
        assert_eq!(second.previous, Some(json!(30)));
    }

    #[test]
    fn test_environments_have_independent_counters() {
        let store = VersionStore::new();
        store.set("log-level", json!("debug"), "staging", "ops");
        let prod = store.set("log-level", json!("error"), "production", "ops");

        assert_eq!(prod.version.version, 1);
        assert_eq!(prod.action, AuditAction::Created);
    }

    #[test]
    fn test_environment_match_is_case_sensitive() {
        let store = VersionStore::new();
        store.set("k", json!(1), "production", "ops");
        let other = store.set("k", json!(2), "Production", "ops");
        assert_eq!(other.version.version, 1);
    }

    #[test]
    fn test_commit_hook_sees_outcome() {
        let store = VersionStore::new();
        let mut seen = None;
        store.set_with("k", json!(1), "production", "ops", |o| {
            seen = Some(o.version.version)
        });
        assert_eq!(seen, Some(1));
    }

    #[test]
    fn test_delete_environment_keeps_others() {
        let store = VersionStore::new();
        store.set("k", json!(1), "production", "ops");
        store.set("k", json!(2), "staging", "ops");

        let outcome = store.delete("k", Some("production")).unwrap();
        assert_eq!(outcome.removed.len(), 1);
        assert!(!outcome.key_removed);
        assert_eq!(store.list_keys(), vec!["k".to_string()]);
        assert!(store.get("k", "staging", None).is_ok());
    }

    #[test]
    fn test_delete_last_environment_removes_key() {
        let store = VersionStore::new();
        store.set("flag", json!(true), "production", "ops");

        let outcome = store.delete("flag", Some("production")).unwrap();
        assert!(outcome.key_removed);
        assert!(store.list_keys().is_empty());
    }

    #[test]
    fn test_delete_missing_environment_has_no_side_effects() {
        let store = VersionStore::new();
        store.set("k", json!(1), "production", "ops");

        let mut called = false;
        let outcome = store.delete_with("k", Some("staging"), |_| called = true);
        assert!(outcome.is_none());
        assert!(!called);
        assert_eq!(store.get_all_versions("k", None).len(), 1);
    }

    #[test]
    fn test_delete_whole_key() {
        let store = VersionStore::new();
        store.set("k", json!(1), "production", "ops");
        store.set("k", json!(2), "staging", "ops");

        let outcome = store.delete("k", None).unwrap();
        assert_eq!(outcome.removed.len(), 2);
        assert!(outcome.environment.is_none());
        assert!(store.delete("k", None).is_none());
    }

    #[test]
    fn test_rewrite_after_delete_restarts_at_one() {
        let store = VersionStore::new();
        store.set("k", json!(1), "production", "ops");
        store.delete("k", Some("production"));
        let again = store.set("k", json!(2), "production", "ops");
        assert_eq!(again.version.version, 1);
        assert_eq!(again.action, AuditAction::Created);
    }
}
