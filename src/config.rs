//! Configuration Module
//!
//! Handles loading and managing runtime configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS};

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the query cache can hold
    pub max_entries: usize,
    /// Default TTL in milliseconds for cache entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval_secs: u64,
    /// Presence heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 60000)
    /// - `CACHE_CLEANUP_INTERVAL_SECS` - Cleanup frequency in seconds (default: 300)
    /// - `PRESENCE_HEARTBEAT_SECS` - Heartbeat frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            default_ttl_ms: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            cleanup_interval_secs: env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            heartbeat_interval_secs: env::var("PRESENCE_HEARTBEAT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Default TTL as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    /// Cleanup interval as a `Duration`.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Heartbeat interval as a `Duration`.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL_MS,
            cleanup_interval_secs: 300,
            heartbeat_interval_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.default_ttl_ms, 60_000);
        assert_eq!(config.cleanup_interval_secs, 300);
        assert_eq!(config.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_DEFAULT_TTL_MS");
        env::remove_var("CACHE_CLEANUP_INTERVAL_SECS");
        env::remove_var("PRESENCE_HEARTBEAT_SECS");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.default_ttl_ms, 60_000);
        assert_eq!(config.cleanup_interval_secs, 300);
        assert_eq!(config.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_config_durations() {
        let config = Config::default();
        assert_eq!(config.default_ttl(), Duration::from_millis(60_000));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(30));
    }
}
