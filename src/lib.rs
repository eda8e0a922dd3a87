//! Collab Kit - client-side runtime for collaborative applications
//!
//! Provides a bounded TTL query cache with tag-based invalidation, a
//! get-or-fetch memoization helper, named timer management, and room-based
//! presence/collaboration relay.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod realtime;
pub mod tasks;
pub mod timer;

pub use cache::{CachedQuery, Invalidation, QueryCache, SetOptions, SharedQueryCache};
pub use config::Config;
pub use error::{Error, Result};
pub use realtime::{RealtimeService, RoomBus};
pub use tasks::spawn_cleanup_task;
pub use timer::TimerManager;
