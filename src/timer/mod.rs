//! Timer Module
//!
//! Named timeout/interval management with idempotent replacement and bulk
//! teardown, so owning components can cancel everything they scheduled in
//! one call when they shut down.

mod manager;

pub use manager::{IntervalOptions, TimeoutOptions, TimerCounts, TimerManager};
