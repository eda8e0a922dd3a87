//! Logging Module
//!
//! Installs the global tracing subscriber. Production deployments emit
//! structured JSON lines for log collection; development gets human-readable
//! tagged lines. Level filtering follows `RUST_LOG` with a crate-level
//! default of `info`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// == Log Format ==
/// Output format for emitted log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable tagged lines (development)
    Pretty,
    /// Structured JSON lines (production)
    Json,
}

/// Installs the global tracing subscriber with the given output format.
///
/// Filtering defaults to `collab_kit=info` and can be overridden with the
/// `RUST_LOG` environment variable. Calling this more than once is a no-op;
/// the first subscriber wins (keeps tests that each call `init` from
/// panicking).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "collab_kit=info".into());

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    // A subscriber set earlier in the process keeps precedence.
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(LogFormat::Pretty);
        init(LogFormat::Json);
        // Second call must not panic even though a subscriber is installed.
    }
}
