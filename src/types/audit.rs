//! Audit trail types
//!
//! Audit entries are immutable records of state changes. They are appended
//! once and never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ConfigVersion;

/// Environment label recorded when a whole key is deleted
pub const ALL_ENVIRONMENTS: &str = "*";

/// Kind of mutation an audit entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// First version of a (key, environment) pair
    Created,
    /// Any later version of a (key, environment) pair
    Updated,
    /// Versions removed, either one environment or the whole key
    Deleted,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Created => write!(f, "created"),
            AuditAction::Updated => write!(f, "updated"),
            AuditAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// State captured on the `before` side of a diff
///
/// Writes keep the previous value of the environment; deletes keep every
/// version they removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditSnapshot {
    Versions(Vec<ConfigVersion>),
    Value(Value),
}

/// Value state before and after a mutation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditDiff {
    pub before: Option<AuditSnapshot>,
    pub after: Option<Value>,
}

/// Description of a mutation, before it is stamped with an id and time
#[derive(Debug, Clone, PartialEq)]
pub struct AuditChange {
    pub action: AuditAction,
    pub key: String,
    pub environment: String,
    pub version: Option<u64>,
    pub actor: String,
    pub diff: AuditDiff,
}

/// An immutable record in the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: AuditAction,
    pub key: String,
    /// Environment affected, or [`ALL_ENVIRONMENTS`] for whole-key deletes
    pub environment: String,
    /// Version written; `None` for deletes
    pub version: Option<u64>,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub diff: AuditDiff,
}

impl From<AuditChange> for AuditEntry {
    fn from(change: AuditChange) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: change.action,
            key: change.key,
            environment: change.environment,
            version: change.version,
            actor: change.actor,
            timestamp: Utc::now(),
            diff: change.diff,
        }
    }
}
