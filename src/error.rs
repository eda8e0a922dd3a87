//! Error types for the realtime layer
//!
//! Provides unified error handling using thiserror.
//!
//! The cache and timer layers deliberately raise no errors of their own:
//! cache operations are infallible and timer callback failures are caught,
//! logged, and optionally retried rather than escalated. Only the realtime
//! presence/collaboration layer surfaces failures to callers.

use thiserror::Error;

// == Realtime Error Enum ==
/// Unified error type for realtime presence and collaboration operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Presence operation attempted before `initialize_presence`
    #[error("Presence not initialized")]
    NotInitialized,

    /// Broadcast attempted on a room with no active collaboration subscription
    #[error("No active subscription for room: {0}")]
    NotSubscribed(String),
}

// == Result Type Alias ==
/// Convenience Result type for the realtime layer.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotSubscribed("idea_42".to_string());
        assert_eq!(err.to_string(), "No active subscription for room: idea_42");

        let err = Error::NotInitialized;
        assert_eq!(err.to_string(), "Presence not initialized");
    }
}
