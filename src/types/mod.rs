//! Data types for the Config Registry
//!
//! This module contains the core data structures shared by the store, the
//! audit trail and the notification hub.

mod audit;
mod error;
mod event;
mod version;

pub use audit::{
    AuditAction, AuditChange, AuditDiff, AuditEntry, AuditSnapshot, ALL_ENVIRONMENTS,
};
pub use error::{RegistryError, RegistryResult};
pub use event::{HubMessage, Notice, ReloadEvent};
pub use version::{Config, ConfigVersion};
