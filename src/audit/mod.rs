//! Audit Trail - immutable, ordered record of every mutation
//!
//! The trail is reached through the [`AuditSink`] trait so a different
//! backend (a durable append log, for instance) can replace the in-memory
//! one without touching the store.
//!
//! # Ordering
//!
//! ```text
//! store write lock held
//!   ├─ append version / remove versions
//!   ├─ AuditSink::record()      <- exactly one per mutation
//!   └─ NotificationHub::broadcast()
//! lock released -> caller sees success
//! ```

mod memory;

pub use memory::MemoryAuditLog;

use crate::types::{AuditAction, AuditChange, AuditEntry};

/// Append-only sink for audit entries
pub trait AuditSink: Send + Sync {
    /// Stamp `change` with an id and timestamp, append it, and return the entry
    fn record(&self, change: AuditChange) -> AuditEntry;

    /// Entries for `key` (or all entries) in append order
    fn query(&self, key: Option<&str>) -> Vec<AuditEntry>;

    /// Total number of entries
    fn len(&self) -> usize;

    /// Per-action counts over every entry
    fn stats(&self) -> AuditStats;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts of recorded actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct AuditStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl AuditStats {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a AuditEntry>,
    {
        entries.into_iter().fold(Self::default(), |mut stats, entry| {
            match entry.action {
                AuditAction::Created => stats.created += 1,
                AuditAction::Updated => stats.updated += 1,
                AuditAction::Deleted => stats.deleted += 1,
            }
            stats
        })
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}
