//! Config Registry
//!
//! A versioned configuration registry with an audit trail and live reload
//! notifications over Server-Sent Events.
//!
//! # Features
//!
//! - **Versioned Store**: per (key, environment) version numbers 1, 2, 3, …
//! - **Audit Trail**: one immutable entry for every write and delete
//! - **Live Reload**: subscribers get a push notification for every write
//! - **Thread-Safe**: version assignment runs in an explicit critical section
//!
//! # Modules
//!
//! - `types`: Core data structures (ConfigVersion, AuditEntry, ReloadEvent)
//! - `store`: Version store with CRUD and queries
//! - `audit`: Append-only audit trail
//! - `hub`: Subscriber registry and broadcast
//! - `registry`: Orchestrates store, audit and hub per request
//! - `validation`: Write request shape and key checks
//! - `settings`: Runtime settings from the environment
//! - `api`: HTTP and SSE endpoints
//!
//! # Example
//!
//! ```
//! use config_registry::{ConfigRegistry, WriteRequest};
//! use serde_json::json;
//!
//! let registry = ConfigRegistry::new();
//! let v1 = registry.set("timeout", WriteRequest::new(json!(30))).unwrap();
//! let v2 = registry.set("timeout", WriteRequest::new(json!(60))).unwrap();
//! assert_eq!((v1.version, v2.version), (1, 2));
//! assert_eq!(registry.get("timeout", None, Some(1)).unwrap().value, json!(30));
//! ```

pub mod api;
pub mod audit;
pub mod hub;
pub mod registry;
pub mod settings;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use audit::{AuditSink, AuditStats, MemoryAuditLog};
pub use hub::{NotificationHub, SubscriberState, Subscription};
pub use registry::ConfigRegistry;
pub use settings::Settings;
pub use store::VersionStore;
pub use types::{
    AuditAction, AuditDiff, AuditEntry, AuditSnapshot, Config, ConfigVersion, HubMessage, Notice,
    RegistryError, RegistryResult, ReloadEvent,
};
pub use validation::WriteRequest;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
