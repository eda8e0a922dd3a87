//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of the
//! owning process.
//!
//! # Tasks
//! - TTL Cleanup: removes expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
