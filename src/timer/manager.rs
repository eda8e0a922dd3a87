//! Timer Manager Module
//!
//! Named, idempotent wrapper over tokio timers so callers can register,
//! replace, and bulk-cancel timers by string id instead of tracking raw
//! task handles. Registering under an id that is already live supersedes
//! the previous timer; clearing an unknown id is a no-op.
//!
//! Callback failures never escalate: a failed timeout callback is retried
//! up to its configured budget at a fixed delay, then logged and dropped.
//! A failed interval tick is logged and the interval keeps running.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

// == Timeout Options ==
/// Retry behavior for a named timeout.
#[derive(Debug, Clone)]
pub struct TimeoutOptions {
    /// Number of re-attempts after a failed callback
    pub max_retries: u32,
    /// Fixed delay between re-attempts (no backoff)
    pub retry_delay: Duration,
}

impl Default for TimeoutOptions {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

// == Interval Options ==
/// Scheduling behavior for a named interval.
#[derive(Debug, Clone, Default)]
pub struct IntervalOptions {
    /// Run the callback once immediately, before the first tick
    pub immediate: bool,
}

// == Timer Counts ==
/// Live timer counts, for observability and teardown verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerCounts {
    /// Outstanding timeouts (not yet fired or cancelled)
    pub timeouts: usize,
    /// Running intervals
    pub intervals: usize,
}

/// A registered timer: the spawned task plus the registration generation.
///
/// The generation lets a completed task unregister itself without racing a
/// newer registration under the same id: removal only happens when the
/// stored generation still matches the task's own.
struct TimerSlot {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerMaps {
    timeouts: HashMap<String, TimerSlot>,
    intervals: HashMap<String, TimerSlot>,
}

struct TimerInner {
    maps: Mutex<TimerMaps>,
    next_generation: AtomicU64,
}

// == Timer Manager ==
/// Cheaply cloneable handle owning a set of named timers.
///
/// Construct one per owning component and pass it where needed; dropping
/// the last clone does not cancel outstanding timers, so call
/// [`clear_all`](TimerManager::clear_all) on teardown.
#[derive(Clone)]
pub struct TimerManager {
    inner: Arc<TimerInner>,
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerManager {
    // == Constructor ==
    /// Creates a manager with no registered timers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TimerInner {
                maps: Mutex::new(TimerMaps::default()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    // == Set Timeout ==
    /// Schedules `callback` to run once after `delay`, replacing any timer
    /// already registered under `id`.
    ///
    /// On callback failure with retry budget remaining, the callback is
    /// re-invoked after `options.retry_delay`; once the budget is exhausted
    /// the failure is logged and dropped (fire-and-forget).
    pub fn set_timeout<F, Fut>(&self, id: &str, callback: F, delay: Duration, options: TimeoutOptions)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send,
    {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let task_id = id.to_string();

        // Holding the registry lock across spawn + insert means the task's
        // self-removal cannot observe the map before this slot is in it.
        let mut maps = self.inner.maps.lock().expect("timer registry poisoned");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut attempts_left = options.max_retries;
            loop {
                match callback().await {
                    Ok(()) => break,
                    Err(err) if attempts_left > 0 => {
                        attempts_left -= 1;
                        warn!(
                            id = %task_id,
                            error = %err,
                            remaining = attempts_left,
                            "timeout callback failed, retrying"
                        );
                        tokio::time::sleep(options.retry_delay).await;
                    }
                    Err(err) => {
                        error!(id = %task_id, error = %err, "timeout callback failed, retries exhausted");
                        break;
                    }
                }
            }

            // Unregister on completion, unless a newer timer took the id.
            let mut maps = inner.maps.lock().expect("timer registry poisoned");
            if maps
                .timeouts
                .get(&task_id)
                .is_some_and(|slot| slot.generation == generation)
            {
                maps.timeouts.remove(&task_id);
            }
        });

        if let Some(old) = maps
            .timeouts
            .insert(id.to_string(), TimerSlot { generation, handle })
        {
            old.handle.abort();
            debug!(id = %id, "superseded existing timeout");
        }
    }

    // == Set Interval ==
    /// Schedules `callback` to run every `period`, replacing any interval
    /// already registered under `id`.
    ///
    /// With `options.immediate`, the callback runs once up front before the
    /// first tick. Per-tick failures are logged and the interval continues.
    pub fn set_interval<F, Fut>(&self, id: &str, callback: F, period: Duration, options: IntervalOptions)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send,
    {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let task_id = id.to_string();

        let mut maps = self.inner.maps.lock().expect("timer registry poisoned");

        let handle = tokio::spawn(async move {
            if options.immediate {
                if let Err(err) = callback().await {
                    warn!(id = %task_id, error = %err, "interval callback failed");
                }
            }

            let mut ticker = tokio::time::interval(period);
            // The first interval tick completes immediately; consume it so
            // the first scheduled run lands one full period out.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(err) = callback().await {
                    warn!(id = %task_id, error = %err, "interval callback failed");
                }
            }
        });

        if let Some(old) = maps
            .intervals
            .insert(id.to_string(), TimerSlot { generation, handle })
        {
            old.handle.abort();
            debug!(id = %id, "superseded existing interval");
        }
    }

    // == Clear Timeout ==
    /// Cancels the timeout registered under `id`. No-op if unknown.
    pub fn clear_timeout(&self, id: &str) {
        let mut maps = self.inner.maps.lock().expect("timer registry poisoned");
        if let Some(slot) = maps.timeouts.remove(id) {
            slot.handle.abort();
        }
    }

    // == Clear Interval ==
    /// Cancels the interval registered under `id`. No-op if unknown.
    pub fn clear_interval(&self, id: &str) {
        let mut maps = self.inner.maps.lock().expect("timer registry poisoned");
        if let Some(slot) = maps.intervals.remove(id) {
            slot.handle.abort();
        }
    }

    // == Clear All ==
    /// Cancels every outstanding timeout and interval.
    pub fn clear_all(&self) {
        let mut maps = self.inner.maps.lock().expect("timer registry poisoned");
        for (_, slot) in maps.timeouts.drain() {
            slot.handle.abort();
        }
        for (_, slot) in maps.intervals.drain() {
            slot.handle.abort();
        }
        debug!("cleared all timers");
    }

    // == Active Counts ==
    /// Returns how many timeouts and intervals are currently live.
    ///
    /// Completed timeouts unregister themselves, so they stop counting
    /// once their callback (including retries) has finished.
    pub fn active_counts(&self) -> TimerCounts {
        let maps = self.inner.maps.lock().expect("timer registry poisoned");
        TimerCounts {
            timeouts: maps.timeouts.len(),
            intervals: maps.intervals.len(),
        }
    }
}
