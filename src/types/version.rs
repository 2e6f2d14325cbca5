//! Versioned configuration types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One immutable snapshot of a key's value in a single environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigVersion {
    /// Position in the (key, environment) history, starting at 1
    pub version: u64,
    /// Opaque value; the registry never inspects it
    pub value: Value,
    pub environment: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl ConfigVersion {
    /// Create a version stamped with the current time
    pub fn new(version: u64, value: Value, environment: String, created_by: String) -> Self {
        Self {
            version,
            value,
            environment,
            created_at: Utc::now(),
            created_by,
        }
    }
}

/// Full history of one key across every environment, in write order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub key: String,
    pub versions: Vec<ConfigVersion>,
}

impl Config {
    pub fn new(key: String) -> Self {
        Self {
            key,
            versions: Vec::new(),
        }
    }

    /// Versions recorded under `environment`, oldest first
    pub fn in_environment<'a>(
        &'a self,
        environment: &'a str,
    ) -> impl Iterator<Item = &'a ConfigVersion> + 'a {
        self.versions
            .iter()
            .filter(move |v| v.environment == environment)
    }

    /// Highest version recorded under `environment`
    pub fn latest(&self, environment: &str) -> Option<&ConfigVersion> {
        self.versions
            .iter()
            .filter(|v| v.environment == environment)
            .max_by_key(|v| v.version)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
