//! In-memory audit log

use parking_lot::RwLock;

use super::{AuditSink, AuditStats};
use crate::types::{AuditChange, AuditEntry};

/// Unbounded append-only log held in memory
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, change: AuditChange) -> AuditEntry {
        let entry = AuditEntry::from(change);
        self.entries.write().push(entry.clone());

        tracing::debug!(
            id = %entry.id,
            action = %entry.action,
            key = %entry.key,
            environment = %entry.environment,
            actor = %entry.actor,
            "audit entry recorded"
        );
        entry
    }

    fn query(&self, key: Option<&str>) -> Vec<AuditEntry> {
        let entries = self.entries.read();
        match key {
            Some(key) => entries.iter().filter(|e| e.key == key).cloned().collect(),
            None => entries.clone(),
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn stats(&self) -> AuditStats {
        AuditStats::from_entries(self.entries.read().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditAction, AuditDiff};
    use serde_json::json;

    fn change(action: AuditAction, key: &str, version: Option<u64>) -> AuditChange {
        AuditChange {
            action,
            key: key.to_string(),
            environment: "production".to_string(),
            version,
            actor: "tester".to_string(),
            diff: AuditDiff {
                before: None,
                after: Some(json!(version)),
            },
        }
    }

    #[test]
    fn test_record_and_query_in_order() {
        let log = MemoryAuditLog::new();
        log.record(change(AuditAction::Created, "a", Some(1)));
        log.record(change(AuditAction::Created, "b", Some(1)));
        log.record(change(AuditAction::Updated, "a", Some(2)));

        assert_eq!(log.len(), 3);

        let a = log.query(Some("a"));
        let versions: Vec<Option<u64>> = a.iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![Some(1), Some(2)]);

        let all = log.query(None);
        let keys: Vec<&str> = all.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_query_returns_independent_copy() {
        let log = MemoryAuditLog::new();
        log.record(change(AuditAction::Created, "a", Some(1)));

        let snapshot = log.query(None);
        log.record(change(AuditAction::Updated, "a", Some(2)));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.query(None).len(), 2);
    }

    #[test]
    fn test_unknown_key_is_empty() {
        let log = MemoryAuditLog::new();
        assert!(log.is_empty());
        assert!(log.query(Some("nothing")).is_empty());
    }

    #[test]
    fn test_stats() {
        let log = MemoryAuditLog::new();
        log.record(change(AuditAction::Created, "a", Some(1)));
        log.record(change(AuditAction::Updated, "a", Some(2)));
        log.record(change(AuditAction::Deleted, "a", None));

        let stats = log.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats, AuditStats::from_entries(&log.query(None)));
    }

    #[test]
    fn test_stats_track_appends() {
        let log = MemoryAuditLog::new();
        assert_eq!(log.stats(), AuditStats::default());

        for version in 1..=50 {
            let action = if version == 1 {
                AuditAction::Created
            } else {
                AuditAction::Updated
            };
            log.record(change(action, "hot", Some(version)));
        }

        let stats = log.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.updated, 49);
        assert_eq!(stats.total(), log.len());
    }
}
