//! Live notification payloads

use serde::{Deserialize, Serialize};

/// Which (key, environment) changed and the version it now holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadEvent {
    pub key: String,
    pub environment: String,
    pub version: u64,
}

/// Control notices interleaved with reload events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notice {
    /// First message on every subscription
    Connected,
    /// Events were dropped because the subscriber's queue was full
    Lagged { missed: u64 },
}

/// A message delivered to one subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HubMessage {
    Notice(Notice),
    Reload(ReloadEvent),
}

impl From<ReloadEvent> for HubMessage {
    fn from(event: ReloadEvent) -> Self {
        HubMessage::Reload(event)
    }
}

impl From<Notice> for HubMessage {
    fn from(notice: Notice) -> Self {
        HubMessage::Notice(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_marker_wire_format() {
        let json = serde_json::to_string(&HubMessage::from(Notice::Connected)).unwrap();
        assert_eq!(json, r#"{"event":"connected"}"#);
    }

    #[test]
    fn test_reload_event_wire_format() {
        let msg = HubMessage::from(ReloadEvent {
            key: "live-key".to_string(),
            environment: "production".to_string(),
            version: 1,
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"key":"live-key","environment":"production","version":1}"#
        );
    }

    #[test]
    fn test_lagged_notice_parsing() {
        let msg: HubMessage = serde_json::from_str(r#"{"event":"lagged","missed":3}"#).unwrap();
        assert_eq!(msg, HubMessage::Notice(Notice::Lagged { missed: 3 }));
    }
}
