//! Room Bus Module
//!
//! In-process pub/sub rooms carrying presence updates and collaboration
//! events. The bus is the boundary that would be backed by the managed
//! backend's channel primitive in a deployed system; services treat it as
//! an opaque collaborator.
//!
//! Each room owns two broadcast channels (presence, collaboration events)
//! plus the authoritative presence roster. Rooms are created lazily on
//! first touch and live for the bus lifetime.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::debug;

use crate::realtime::{CollaborationEvent, PresenceRecord, PresenceUpdate};

/// Buffered messages per room channel before slow receivers start lagging.
const CHANNEL_CAPACITY: usize = 64;

struct Room {
    presence_tx: broadcast::Sender<PresenceUpdate>,
    events_tx: broadcast::Sender<CollaborationEvent>,
    roster: HashMap<String, PresenceRecord>,
}

impl Room {
    fn new() -> Self {
        Self {
            presence_tx: broadcast::channel(CHANNEL_CAPACITY).0,
            events_tx: broadcast::channel(CHANNEL_CAPACITY).0,
            roster: HashMap::new(),
        }
    }
}

// == Room Bus ==
/// Named rooms relaying presence and collaboration traffic between
/// participants in one process.
#[derive(Default)]
pub struct RoomBus {
    rooms: Mutex<HashMap<String, Room>>,
}

impl RoomBus {
    // == Constructor ==
    /// Creates a bus with no rooms.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    // == Join Presence ==
    /// Adds `record` to the room roster and subscribes to its presence
    /// channel.
    ///
    /// Returns the roster snapshot (including the joiner) and a receiver of
    /// subsequent updates. Peers already in the room observe a `Join`; the
    /// joiner's receiver starts after that, so it does not see its own join.
    pub fn join_presence(
        &self,
        room_id: &str,
        record: PresenceRecord,
    ) -> (Vec<PresenceRecord>, broadcast::Receiver<PresenceUpdate>) {
        let mut rooms = self.rooms.lock().expect("room registry poisoned");
        let room = rooms.entry(room_id.to_string()).or_insert_with(Room::new);

        room.roster.insert(record.user_id.clone(), record.clone());
        let _ = room.presence_tx.send(PresenceUpdate::Join(record.clone()));
        let receiver = room.presence_tx.subscribe();

        let snapshot = room.roster.values().cloned().collect();
        debug!(room = %room_id, user = %record.user_id, occupants = room.roster.len(), "presence join");

        (snapshot, receiver)
    }

    // == Leave Presence ==
    /// Removes a user from the room roster and notifies subscribers.
    pub fn leave_presence(&self, room_id: &str, user_id: &str) {
        let mut rooms = self.rooms.lock().expect("room registry poisoned");
        if let Some(room) = rooms.get_mut(room_id) {
            if room.roster.remove(user_id).is_some() {
                let _ = room.presence_tx.send(PresenceUpdate::Leave {
                    user_id: user_id.to_string(),
                });
                debug!(room = %room_id, user = %user_id, "presence leave");
            }
        }
    }

    // == Announce ==
    /// Replaces a user's roster record and notifies subscribers with an
    /// `Update`. Used for heartbeats and explicit status changes.
    pub fn announce(&self, room_id: &str, record: PresenceRecord) {
        let mut rooms = self.rooms.lock().expect("room registry poisoned");
        if let Some(room) = rooms.get_mut(room_id) {
            room.roster.insert(record.user_id.clone(), record.clone());
            let _ = room.presence_tx.send(PresenceUpdate::Update(record));
        }
    }

    // == Subscribe Events ==
    /// Subscribes to the room's collaboration event channel.
    pub fn subscribe_events(&self, room_id: &str) -> broadcast::Receiver<CollaborationEvent> {
        let mut rooms = self.rooms.lock().expect("room registry poisoned");
        let room = rooms.entry(room_id.to_string()).or_insert_with(Room::new);
        room.events_tx.subscribe()
    }

    // == Publish Event ==
    /// Fans an event out to the room's collaboration subscribers.
    ///
    /// Returns the number of receivers the event reached; zero when the
    /// room has no live subscribers (not an error at this level).
    pub fn publish_event(&self, room_id: &str, event: CollaborationEvent) -> usize {
        let mut rooms = self.rooms.lock().expect("room registry poisoned");
        let room = rooms.entry(room_id.to_string()).or_insert_with(Room::new);
        room.events_tx.send(event).unwrap_or(0)
    }

    // == Occupants ==
    /// Current roster of a room; empty for unknown rooms.
    pub fn occupants(&self, room_id: &str) -> Vec<PresenceRecord> {
        let rooms = self.rooms.lock().expect("room registry poisoned");
        rooms
            .get(room_id)
            .map(|room| room.roster.values().cloned().collect())
            .unwrap_or_default()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record(user: &str) -> PresenceRecord {
        PresenceRecord::online(user, Value::Null, None)
    }

    #[tokio::test]
    async fn test_join_returns_roster_including_self() {
        let bus = RoomBus::new();

        let (roster, _rx) = bus.join_presence("room1", record("u1"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user_id, "u1");

        let (roster, _rx2) = bus.join_presence("room1", record("u2"));
        assert_eq!(roster.len(), 2);
    }

    #[tokio::test]
    async fn test_peer_observes_join_but_not_own() {
        let bus = RoomBus::new();

        let (_, mut rx1) = bus.join_presence("room1", record("u1"));
        let (_, mut rx2) = bus.join_presence("room1", record("u2"));

        // u1's receiver sees u2's join
        match rx1.recv().await.unwrap() {
            PresenceUpdate::Join(r) => assert_eq!(r.user_id, "u2"),
            other => panic!("expected Join, got {other:?}"),
        }

        // u2's receiver starts after its own join, so it sees nothing yet
        assert!(matches!(
            rx2.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_leave_removes_from_roster_and_notifies() {
        let bus = RoomBus::new();

        let (_, mut rx1) = bus.join_presence("room1", record("u1"));
        bus.join_presence("room1", record("u2"));
        let _ = rx1.recv().await; // u2 join

        bus.leave_presence("room1", "u2");

        match rx1.recv().await.unwrap() {
            PresenceUpdate::Leave { user_id } => assert_eq!(user_id, "u2"),
            other => panic!("expected Leave, got {other:?}"),
        }
        assert_eq!(bus.occupants("room1").len(), 1);
    }

    #[tokio::test]
    async fn test_leave_unknown_user_is_silent() {
        let bus = RoomBus::new();
        let (_, mut rx) = bus.join_presence("room1", record("u1"));

        bus.leave_presence("room1", "ghost");
        bus.leave_presence("no_such_room", "u1");

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_announce_updates_roster() {
        let bus = RoomBus::new();

        let (_, mut rx1) = bus.join_presence("room1", record("u1"));
        bus.join_presence("room1", record("u2"));
        let _ = rx1.recv().await; // u2 join

        let mut updated = record("u2");
        updated.status = crate::realtime::PresenceStatus::Away;
        bus.announce("room1", updated);

        match rx1.recv().await.unwrap() {
            PresenceUpdate::Update(r) => {
                assert_eq!(r.user_id, "u2");
                assert_eq!(r.status, crate::realtime::PresenceStatus::Away);
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_event_fanout_reaches_all_subscribers() {
        let bus = RoomBus::new();

        let mut rx_a = bus.subscribe_events("room1");
        let mut rx_b = bus.subscribe_events("room1");
        let mut rx_other = bus.subscribe_events("room2");

        let reached = bus.publish_event(
            "room1",
            CollaborationEvent::Join {
                user_id: "u1".to_string(),
            },
        );
        assert_eq!(reached, 2);

        assert_eq!(rx_a.recv().await.unwrap().user_id(), "u1");
        assert_eq!(rx_b.recv().await.unwrap().user_id(), "u1");
        assert!(matches!(
            rx_other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_reaches_zero() {
        let bus = RoomBus::new();
        let reached = bus.publish_event(
            "empty_room",
            CollaborationEvent::Leave {
                user_id: "u1".to_string(),
            },
        );
        assert_eq!(reached, 0);
    }

    #[tokio::test]
    async fn test_occupants_unknown_room_is_empty() {
        let bus = RoomBus::new();
        assert!(bus.occupants("nowhere").is_empty());
    }
}
