//! Error taxonomy for registry operations

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outcomes a caller can observe as a negative result.
///
/// Neither variant is fatal: the registry state is untouched when one is
/// returned, and no audit entry is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The key, key+environment or key+environment+version does not exist
    #[error("config '{key}' not found in environment '{environment}'{}", version_suffix(.version))]
    NotFound {
        key: String,
        environment: String,
        version: Option<u64>,
    },

    /// The request is missing a required part or carries a malformed one
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn version_suffix(version: &Option<u64>) -> String {
    match version {
        Some(v) => format!(" at version {}", v),
        None => String::new(),
    }
}

impl RegistryError {
    pub fn not_found(key: &str, environment: &str, version: Option<u64>) -> Self {
        RegistryError::NotFound {
            key: key.to_string(),
            environment: environment.to_string(),
            version,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        RegistryError::InvalidInput(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}
