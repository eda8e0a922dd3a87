//! Realtime Event Types
//!
//! Wire-shaped DTOs for presence records and collaboration events relayed
//! through room channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Presence Status ==
/// A user's announced availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Away,
    Offline,
}

// == Presence Record ==
/// One user's presence state as shared with a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// The user this record describes
    pub user_id: String,
    /// Announced availability
    pub status: PresenceStatus,
    /// Last heartbeat or explicit update (wall clock)
    pub last_seen: DateTime<Utc>,
    /// Page/view the user is currently on, if any
    pub page: Option<String>,
    /// Arbitrary caller-supplied profile data
    pub metadata: Value,
}

impl PresenceRecord {
    /// Creates an online record with a fresh `last_seen`.
    pub fn online(user_id: impl Into<String>, metadata: Value, page: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            status: PresenceStatus::Online,
            last_seen: Utc::now(),
            page,
            metadata,
        }
    }

    /// Refreshes `last_seen` to now.
    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }
}

// == Presence Update ==
/// Notifications delivered to presence subscribers of a room.
///
/// The full roster snapshot is handed to a joiner directly at subscribe
/// time rather than arriving as a message; the channel only carries deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresenceUpdate {
    /// A user joined the room
    Join(PresenceRecord),
    /// A user's record changed (status, heartbeat, metadata)
    Update(PresenceRecord),
    /// A user left the room
    Leave { user_id: String },
}

// == Collaboration Event ==
/// Ad-hoc collaboration events relayed between room participants.
///
/// The set of kinds is closed; payload-bearing variants carry opaque JSON
/// the way the backing store returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollaborationEvent {
    CursorMove {
        user_id: String,
        x: f64,
        y: f64,
    },
    SelectionChange {
        user_id: String,
        selection: Value,
    },
    ContentChange {
        user_id: String,
        content_id: String,
        payload: Value,
    },
    Join {
        user_id: String,
    },
    Leave {
        user_id: String,
    },
    Broadcast {
        user_id: String,
        payload: Value,
    },
}

impl CollaborationEvent {
    /// The id of the user that produced this event.
    pub fn user_id(&self) -> &str {
        match self {
            Self::CursorMove { user_id, .. }
            | Self::SelectionChange { user_id, .. }
            | Self::ContentChange { user_id, .. }
            | Self::Join { user_id }
            | Self::Leave { user_id }
            | Self::Broadcast { user_id, .. } => user_id,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(PresenceStatus::Online).unwrap(), json!("online"));
        assert_eq!(serde_json::to_value(PresenceStatus::Away).unwrap(), json!("away"));
        assert_eq!(serde_json::to_value(PresenceStatus::Offline).unwrap(), json!("offline"));
    }

    #[test]
    fn test_online_record_defaults() {
        let record = PresenceRecord::online("u1", json!({"name": "Ada"}), Some("ideas".to_string()));

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.status, PresenceStatus::Online);
        assert_eq!(record.page.as_deref(), Some("ideas"));
        assert_eq!(record.metadata["name"], "Ada");
    }

    #[test]
    fn test_touch_advances_last_seen() {
        let mut record = PresenceRecord::online("u1", Value::Null, None);
        let before = record.last_seen;

        std::thread::sleep(std::time::Duration::from_millis(5));
        record.touch();

        assert!(record.last_seen > before);
    }

    #[test]
    fn test_event_tagged_serialization() {
        let event = CollaborationEvent::CursorMove {
            user_id: "u1".to_string(),
            x: 10.0,
            y: 20.5,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cursor_move");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["y"], 20.5);

        let back: CollaborationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.user_id(), "u1");
    }

    #[test]
    fn test_event_user_id_accessor() {
        let event = CollaborationEvent::Broadcast {
            user_id: "u9".to_string(),
            payload: json!({"msg": "hi"}),
        };
        assert_eq!(event.user_id(), "u9");
    }
}
