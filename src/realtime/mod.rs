//! Realtime Module
//!
//! Room-based presence tracking and collaboration event relay. The
//! [`RoomBus`] is the channel boundary (backed in production by the managed
//! backend's pub/sub primitive); [`RealtimeService`] wraps it with one
//! local user's presence lifecycle.

mod bus;
mod events;
mod service;

// Re-export public types
pub use bus::RoomBus;
pub use events::{CollaborationEvent, PresenceRecord, PresenceStatus, PresenceUpdate};
pub use service::{PresenceSubscription, RealtimeConfig, RealtimeService};
