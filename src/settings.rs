//! Runtime settings read from the environment
//!
//! | Variable | Default |
//! |---|---|
//! | `CONFIG_REGISTRY_BIND` | `0.0.0.0:3000` |
//! | `CONFIG_REGISTRY_DEFAULT_ENV` | `production` |
//! | `CONFIG_REGISTRY_DEFAULT_ACTOR` | `anonymous` |
//! | `CONFIG_REGISTRY_SUBSCRIBER_BUFFER` | `1024` |
//! | `CONFIG_REGISTRY_KEEPALIVE_SECS` | `30` |

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::hub::{DEFAULT_SUBSCRIBER_BUFFER, MAX_SUBSCRIBER_BUFFER};

pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_ACTOR: &str = "anonymous";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_KEEPALIVE_SECS: u64 = 30;
pub const MAX_KEEPALIVE_SECS: u64 = 86_400;

/// Errors raised while reading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{name} must be an integer between 1 and {max}, got '{value}'")]
    InvalidNumber {
        name: &'static str,
        max: u64,
        value: String,
    },
}

/// Registry and server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Environment used when a request names none
    pub default_environment: String,
    /// Actor recorded when a request names none
    pub default_actor: String,
    /// Per-subscriber queue depth
    pub subscriber_buffer: usize,
    /// Interval between keep-alive comments on the live stream
    pub keepalive: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND.to_string(),
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            default_actor: DEFAULT_ACTOR.to_string(),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            keepalive: Duration::from_secs(DEFAULT_KEEPALIVE_SECS),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or(default)
        };

        Ok(Self {
            bind_address: text("CONFIG_REGISTRY_BIND", defaults.bind_address),
            default_environment: text("CONFIG_REGISTRY_DEFAULT_ENV", defaults.default_environment),
            default_actor: text("CONFIG_REGISTRY_DEFAULT_ACTOR", defaults.default_actor),
            subscriber_buffer: number(
                &lookup,
                "CONFIG_REGISTRY_SUBSCRIBER_BUFFER",
                defaults.subscriber_buffer as u64,
                MAX_SUBSCRIBER_BUFFER as u64,
            )? as usize,
            keepalive: Duration::from_secs(number(
                &lookup,
                "CONFIG_REGISTRY_KEEPALIVE_SECS",
                DEFAULT_KEEPALIVE_SECS,
                MAX_KEEPALIVE_SECS,
            )?),
        })
    }
}

/// Parse `name` as an integer in `1..=max`, or return `default` when unset
fn number<F>(lookup: &F, name: &'static str, default: u64, max: u64) -> Result<u64, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if (1..=max).contains(&n) => Ok(n),
            _ => Err(SettingsError::InvalidNumber {
                name,
                max,
                value: raw,
            }),
        },
    }
}
