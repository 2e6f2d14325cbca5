//! Write request shape and key/label validation

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{RegistryError, RegistryResult};

/// Body of a write: `value` is required, everything else falls back to
/// the registry defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteRequest {
    /// `Some(Value::Null)` when the client sent an explicit `null`
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

impl WriteRequest {
    pub fn new(value: Value) -> Self {
        Self {
            value: Some(value),
            environment: None,
            actor: None,
        }
    }

    pub fn in_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Distinguishes a missing field from an explicit `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reject keys the registry cannot address
pub fn validate_key(key: &str) -> RegistryResult<()> {
    if key.trim().is_empty() {
        return Err(RegistryError::invalid("key must not be empty"));
    }
    Ok(())
}

/// Use `label` when given and non-empty, otherwise `default`.
///
/// Labels are compared exactly elsewhere, so no case folding or trimming
/// happens here.
pub fn resolve_label(label: Option<&str>, default: &str) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_value_is_none() {
        let req: WriteRequest = serde_json::from_str(r#"{"environment":"staging"}"#).unwrap();
        assert!(req.value.is_none());
        assert_eq!(req.environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_explicit_null_value_is_present() {
        let req: WriteRequest = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert_eq!(req.value, Some(Value::Null));
    }

    #[test]
    fn test_structured_value() {
        let req: WriteRequest =
            serde_json::from_str(r#"{"value":{"retries":3},"actor":"alice"}"#).unwrap();
        assert_eq!(req.value, Some(json!({"retries": 3})));
        assert_eq!(req.actor.as_deref(), Some("alice"));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("timeout").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("   ").is_err());
    }

    #[test]
    fn test_resolve_label() {
        assert_eq!(resolve_label(None, "production"), "production");
        assert_eq!(resolve_label(Some(""), "production"), "production");
        assert_eq!(resolve_label(Some("Staging"), "production"), "Staging");
    }
}
