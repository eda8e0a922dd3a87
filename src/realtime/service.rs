//! Realtime Service Module
//!
//! Tracks the local user's presence and relays it, plus ad-hoc
//! collaboration events, through per-room channels. Heartbeats run on an
//! injected [`TimerManager`] so one `clear_all` during teardown cancels
//! everything the service scheduled.
//!
//! The service is an explicitly constructed, cheaply cloneable handle;
//! lifecycle is caller-owned, there is no process-wide instance.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::realtime::{
    CollaborationEvent, PresenceRecord, PresenceStatus, PresenceUpdate, RoomBus,
};
use crate::timer::{IntervalOptions, TimerManager};

/// Timer id of the presence heartbeat interval.
const HEARTBEAT_TIMER_ID: &str = "presence_heartbeat";

// == Realtime Config ==
/// Tunables for a realtime service instance.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// How often the heartbeat refreshes and re-announces presence
    pub heartbeat_interval: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
        }
    }
}

impl RealtimeConfig {
    /// Derives realtime tunables from the runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            heartbeat_interval: config.heartbeat_interval(),
        }
    }
}

// == Presence Subscription ==
/// What a presence subscriber gets back: the roster as of joining, plus a
/// live feed of subsequent updates.
pub struct PresenceSubscription {
    /// Room roster at join time, including the local user
    pub roster: Vec<PresenceRecord>,
    /// Join/leave/update notifications from this point on
    pub updates: broadcast::Receiver<PresenceUpdate>,
}

struct ServiceState {
    local: Option<PresenceRecord>,
    presence_rooms: HashSet<String>,
    collab_rooms: HashSet<String>,
}

// == Realtime Service ==
/// Presence and collaboration wrapper for one local user.
#[derive(Clone)]
pub struct RealtimeService {
    bus: Arc<RoomBus>,
    timers: TimerManager,
    config: RealtimeConfig,
    state: Arc<Mutex<ServiceState>>,
}

impl RealtimeService {
    // == Constructor ==
    /// Creates a service over the given bus and timer manager.
    pub fn new(bus: Arc<RoomBus>, timers: TimerManager, config: RealtimeConfig) -> Self {
        Self {
            bus,
            timers,
            config,
            state: Arc::new(Mutex::new(ServiceState {
                local: None,
                presence_rooms: HashSet::new(),
                collab_rooms: HashSet::new(),
            })),
        }
    }

    // == Initialize Presence ==
    /// Marks the local user online and starts the periodic heartbeat.
    ///
    /// Each beat refreshes `last_seen` and re-announces the record on every
    /// room with an active presence subscription. Heartbeat problems are
    /// logged and swallowed; they are never fatal.
    pub fn initialize_presence(
        &self,
        user_id: impl Into<String>,
        metadata: Value,
        page: Option<String>,
    ) {
        let record = PresenceRecord::online(user_id, metadata, page);
        debug!(user = %record.user_id, "presence initialized");

        {
            let mut state = self.state.lock().expect("service state poisoned");
            state.local = Some(record);
        }

        let bus = Arc::clone(&self.bus);
        let state = Arc::clone(&self.state);
        self.timers.set_interval(
            HEARTBEAT_TIMER_ID,
            move || {
                let beat = {
                    let mut guard = state.lock().expect("service state poisoned");
                    let state = &mut *guard;
                    match state.local.as_mut() {
                        Some(local) => {
                            local.touch();
                            let rooms: Vec<String> =
                                state.presence_rooms.iter().cloned().collect();
                            Some((local.clone(), rooms))
                        }
                        None => None,
                    }
                };

                match beat {
                    Some((record, rooms)) => {
                        for room in rooms {
                            bus.announce(&room, record.clone());
                        }
                    }
                    None => warn!("heartbeat tick without local presence"),
                }
                std::future::ready(Ok(()))
            },
            self.config.heartbeat_interval,
            IntervalOptions::default(),
        );
    }

    // == Local Presence ==
    /// The local user's current record, if presence is initialized.
    pub fn local_presence(&self) -> Option<PresenceRecord> {
        self.state
            .lock()
            .expect("service state poisoned")
            .local
            .clone()
    }

    // == Subscribe Presence ==
    /// Joins a room's presence channel and pushes the local record onto it.
    ///
    /// Re-subscribing to a room the service already joined first tears the
    /// prior membership down (leave, then rejoin), mirroring the timer
    /// manager's idempotent-replace semantics. Fails with
    /// [`Error::NotInitialized`] before `initialize_presence`.
    pub fn subscribe_presence(&self, room_id: &str) -> Result<PresenceSubscription> {
        let (record, rejoin) = {
            let mut state = self.state.lock().expect("service state poisoned");
            let local = state.local.clone().ok_or(Error::NotInitialized)?;
            let rejoin = !state.presence_rooms.insert(room_id.to_string());
            (local, rejoin)
        };

        if rejoin {
            self.bus.leave_presence(room_id, &record.user_id);
        }

        let (roster, updates) = self.bus.join_presence(room_id, record);
        Ok(PresenceSubscription { roster, updates })
    }

    // == Unsubscribe Presence ==
    /// Leaves a room's presence channel: the room comes out of the active
    /// set, the local user comes off the roster, and peers observe a
    /// `Leave`. Heartbeats stop re-announcing into the room. No-op for
    /// rooms never subscribed.
    pub fn unsubscribe_presence(&self, room_id: &str) {
        let user_id = {
            let mut state = self.state.lock().expect("service state poisoned");
            if !state.presence_rooms.remove(room_id) {
                return;
            }
            state.local.as_ref().map(|local| local.user_id.clone())
        };

        if let Some(user_id) = user_id {
            self.bus.leave_presence(room_id, &user_id);
            debug!(room = %room_id, user = %user_id, "presence unsubscribed");
        }
    }

    // == Subscribe Collaboration ==
    /// Joins a room's collaboration event channel.
    ///
    /// The subscription is registered so later broadcasts to this room are
    /// accepted.
    pub fn subscribe_collaboration(&self, room_id: &str) -> broadcast::Receiver<CollaborationEvent> {
        let mut state = self.state.lock().expect("service state poisoned");
        state.collab_rooms.insert(room_id.to_string());
        drop(state);
        self.bus.subscribe_events(room_id)
    }

    // == Broadcast Event ==
    /// Sends an event to the room's collaboration subscribers.
    ///
    /// Fails with [`Error::NotSubscribed`] when this service holds no
    /// collaboration subscription for the room.
    pub fn broadcast_event(&self, room_id: &str, event: CollaborationEvent) -> Result<()> {
        let subscribed = {
            let state = self.state.lock().expect("service state poisoned");
            state.collab_rooms.contains(room_id)
        };
        if !subscribed {
            return Err(Error::NotSubscribed(room_id.to_string()));
        }

        let reached = self.bus.publish_event(room_id, event);
        debug!(room = %room_id, reached, "collaboration event broadcast");
        Ok(())
    }

    // == Update Status ==
    /// Mutates local presence and re-announces it on every active presence
    /// room. Returns the number of rooms notified.
    pub fn update_status(&self, status: PresenceStatus, metadata: Option<Value>) -> Result<usize> {
        let (record, rooms) = {
            let mut guard = self.state.lock().expect("service state poisoned");
            let state = &mut *guard;
            let local = state.local.as_mut().ok_or(Error::NotInitialized)?;
            local.status = status;
            local.touch();
            if let Some(metadata) = metadata {
                local.metadata = metadata;
            }
            let rooms: Vec<String> = state.presence_rooms.iter().cloned().collect();
            (local.clone(), rooms)
        };

        for room in &rooms {
            self.bus.announce(room, record.clone());
        }
        Ok(rooms.len())
    }

    // == Cleanup ==
    /// The single teardown path: announces the local user offline, leaves
    /// every room, drops all subscriptions, and cancels all owned timers.
    pub fn cleanup(&self) {
        let (record, presence_rooms) = {
            let mut state = self.state.lock().expect("service state poisoned");
            let record = state.local.take().map(|mut local| {
                local.status = PresenceStatus::Offline;
                local.touch();
                local
            });
            let rooms: Vec<String> = state.presence_rooms.drain().collect();
            state.collab_rooms.clear();
            (record, rooms)
        };

        if let Some(record) = record {
            for room in &presence_rooms {
                self.bus.announce(room, record.clone());
                self.bus.leave_presence(room, &record.user_id);
            }
            debug!(user = %record.user_id, rooms = presence_rooms.len(), "presence cleaned up");
        }

        self.timers.clear_all();
    }
}
